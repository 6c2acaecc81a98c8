//! Business logic services.

pub mod comparison;
pub mod identity;
pub mod media;
pub mod rating;

pub use comparison::{ComparisonService, CreateComparisonInput};
pub use identity::{IdentityService, SessionInput};
pub use media::{MediaService, MAX_UPLOAD_SIZE};
pub use rating::{
    BulkEntry, ComparisonAverages, OwnRatings, RatingService, SubmitRatingInput, Variant,
    VariantAverage, FACTOR_COUNT,
};
