//! Repository layer.
//!
//! Thin, clonable wrappers around the shared connection pool. All query
//! construction lives here; services above never touch sea-orm directly.

mod comparison;
mod rating;
mod user;

pub use comparison::ComparisonRepository;
pub use rating::RatingRepository;
pub use user::UserRepository;
