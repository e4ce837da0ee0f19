// Public API exports
pub mod creator;
pub mod entry;
pub mod error;
mod staged;
pub mod validator;

// Re-export main types for convenience
pub use error::ArchiveError;

pub use entry::{CLASS_SUFFIX, class_name_for, entry_name_for, is_class_entry, matches_any_prefix};

pub use creator::{CreateSummary, create, create_from_args};

pub use validator::{SUCCESS_MARKER, ValidationReport, scan, validate, validate_from_args};
