//! Common utilities and shared types for imgarena.
//!
//! This crate provides foundational components used across all imgarena crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Session tokens**: JWT issuance and verification via [`TokenService`]
//! - **Storage**: Object storage backends (local, S3-compatible) with
//!   time-limited signed download URLs
//!
//! # Example
//!
//! ```no_run
//! use imgarena_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{
    DEFAULT_SIGNED_URL_EXPIRY, LocalStorage, Storage, StorageBackend, UploadedFile,
    generate_storage_key,
};
pub use token::{SessionClaims, TokenService};
