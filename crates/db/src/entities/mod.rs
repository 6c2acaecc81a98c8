//! Database entities.

pub mod comparison;
pub mod rating;
pub mod user;

pub use comparison::Entity as Comparison;
pub use rating::Entity as Rating;
pub use user::Entity as User;
