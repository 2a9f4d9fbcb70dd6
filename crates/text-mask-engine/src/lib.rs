pub mod error;
pub mod field;
pub mod masking;
pub mod value;

// Re-export key types for easier usage
pub use error::MaskError;
pub use field::{MaskOptions, MaskPatch, MaskedInput};
pub use masking::*;
pub use value::RawValue;
