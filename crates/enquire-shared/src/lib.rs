//! # enquire-shared
//!
//! Types shared by the store and the server: the unified field validators,
//! field tags and verdicts, the notification wire protocol, and the fixed
//! denylists the validators consult.

pub mod constants;
pub mod error;
pub mod protocol;
pub mod types;
pub mod validate;

pub use error::ValidationError;
pub use types::{Field, FormScope, InquiryCategory, Outcome, ValidationRequest, ValidationResult};
pub use validate::{validate, Directory};
