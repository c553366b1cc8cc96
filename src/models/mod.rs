//! Data models for the team roster form.
//!
//! Field names serialize in camelCase to match the form's frontend contract.

mod draft;
mod form;
mod member;

pub use draft::*;
pub use form::*;
pub use member::*;
