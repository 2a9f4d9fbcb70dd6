//! # Masking core
//!
//! Three pure steps turn a keystroke into a new field value and caret:
//!
//! ```text
//! mask ──► placeholder ──┐
//!                        ▼
//! raw input + previous ──► conform ──► ConformResult ──► caret
//! ```
//!
//! - **`token`**: the mask alphabet (`1 A ? U L *`, `\` escapes)
//! - **`placeholder`**: mask to placeholder string, e.g. `(111)` to `(___)`
//! - **`conform`**: lays raw input over the placeholder
//! - **`caret`**: works out where the caret goes after the edit
//!
//! Nothing here holds state between calls. The caller keeps the previous
//! conformed value and passes it back in on the next edit; see
//! [`MaskedInput`](crate::field::MaskedInput) for a controller that does
//! this bookkeeping.
//!
//! ```rust
//! use text_mask_engine::masking::*;
//!
//! let config = ConformConfig::default();
//! let result = conform_to_mask("4", "(111) 111-1111", &config).unwrap();
//! assert_eq!(result.output, "(4__) ___-____");
//!
//! let caret = adjust_caret_position("", &result, 1);
//! assert_eq!(caret, 2);
//! ```

pub mod caret;
pub mod conform;
pub mod placeholder;
pub mod token;

pub use caret::adjust_caret_position;
pub use conform::{
    ConformConfig, ConformMeta, ConformResult, Validator, conform_to_mask, index_of_first_change,
};
pub use placeholder::{build_placeholder, unescape_mask};
pub use token::{CharClass, DEFAULT_PLACEHOLDER_CHAR, ESCAPE_CHAR, MaskToken, tokenize_mask};
