//! # jobfill Config
//!
//! Engine configuration (`config.toml`) and applicant profile loading.

mod applicant;
mod error;
mod loader;
mod schema;
mod validator;

pub use applicant::ApplicantLoader;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
