//! Field-level cleaning for contact records.
//!
//! This module provides:
//! - Normalizers that canonicalise name, email, company and phone values
//! - Validators that classify a normalized value and give a reason code
//! - The [`RecordProcessor`] that applies both to a whole row

pub mod normalizers;
mod processor;
pub mod validators;

pub use normalizers::{
    normalize_company, normalize_email, normalize_name, normalize_phone, normalize_text,
};
pub use processor::RecordProcessor;
pub use validators::{validate_company, validate_email, validate_phone, validate_required};
