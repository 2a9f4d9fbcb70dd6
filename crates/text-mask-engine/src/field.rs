use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::MaskError;
use crate::masking::{
    ConformConfig, DEFAULT_PLACEHOLDER_CHAR, Validator, adjust_caret_position, build_placeholder,
    conform_to_mask,
};
use crate::value::RawValue;

/// Per-field settings for a [`MaskedInput`].
#[derive(Clone)]
pub struct MaskOptions {
    pub guide: bool,
    pub placeholder_char: char,
    pub validator: Option<Validator>,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            guide: true,
            placeholder_char: DEFAULT_PLACEHOLDER_CHAR,
            validator: None,
        }
    }
}

impl fmt::Debug for MaskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskOptions")
            .field("guide", &self.guide)
            .field("placeholder_char", &self.placeholder_char)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl MaskOptions {
    pub fn with_validator(mut self, validator: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

/// What the caller should write back into its text widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskPatch {
    pub value: String,
    pub caret: usize,
    pub version: u64,
}

/// Masking state for one text field.
///
/// Holds the previous conformed value between edits so the caller only has
/// to forward the widget's current text and caret. Edits for a field must
/// be fed in the order they happen.
///
/// ```rust
/// use text_mask_engine::{MaskOptions, MaskedInput};
///
/// let mut field = MaskedInput::new("(111) 111-1111", MaskOptions::default()).unwrap();
/// assert_eq!(field.placeholder(), "(___) ___-____");
///
/// let patch = field.update("5", 1).unwrap().unwrap();
/// assert_eq!(patch.value, "(5__) ___-____");
/// assert_eq!(patch.caret, 2);
///
/// // feeding the same value again is a no-op
/// assert!(field.update("(5__) ___-____", 2).unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MaskedInput {
    mask: String,
    placeholder: String,
    options: MaskOptions,
    previous_conformed_input: String,
    version: u64,
}

impl MaskedInput {
    /// Fails with [`MaskError::InvalidMask`] if the placeholder character
    /// occurs in `mask`.
    pub fn new(mask: impl Into<String>, options: MaskOptions) -> Result<Self, MaskError> {
        let mask = mask.into();
        let placeholder = build_placeholder(&mask, options.placeholder_char)?;
        Ok(Self {
            mask,
            placeholder,
            options,
            previous_conformed_input: String::new(),
            version: 0,
        })
    }

    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Hint text for an empty widget.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Current conformed value of the field.
    pub fn value(&self) -> &str {
        &self.previous_conformed_input
    }

    /// Number of updates that produced a patch.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Runs the initial value through the mask with the caret at the start.
    pub fn prime(&mut self, initial: impl Into<RawValue>) -> Result<Option<MaskPatch>, MaskError> {
        self.update(initial, 0)
    }

    /// Conforms the widget's current text and resolves the caret.
    ///
    /// Returns `None` when `value` already equals the conformed value, so
    /// writing a patch back into the widget and receiving the resulting
    /// change event does not loop.
    pub fn update(
        &mut self,
        value: impl Into<RawValue>,
        caret: usize,
    ) -> Result<Option<MaskPatch>, MaskError> {
        let raw = value.into().into_text()?;
        if raw == self.previous_conformed_input {
            return Ok(None);
        }

        let config = ConformConfig {
            guide: self.options.guide,
            previous_conformed_input: self.previous_conformed_input.clone(),
            placeholder_char: self.options.placeholder_char,
            validator: self.options.validator.clone(),
        };
        let result = conform_to_mask(&raw, &self.mask, &config)?;
        let caret = adjust_caret_position(&self.previous_conformed_input, &result, caret);

        // An untouched placeholder with the caret at the start means the
        // field is really empty.
        let value = if result.output == self.placeholder && caret == 0 {
            String::new()
        } else {
            result.output
        };

        self.previous_conformed_input = value.clone();
        self.version += 1;

        Ok(Some(MaskPatch {
            value,
            caret,
            version: self.version,
        }))
    }

    /// Forgets the current value.
    pub fn reset(&mut self) {
        self.previous_conformed_input.clear();
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn phone() -> MaskedInput {
        MaskedInput::new("(111) 111-1111", MaskOptions::default()).unwrap()
    }

    #[test]
    fn invalid_mask_fails_at_construction() {
        let err = MaskedInput::new("11_11", MaskOptions::default()).unwrap_err();
        assert!(matches!(err, MaskError::InvalidMask { .. }));
    }

    #[test]
    fn update_tracks_previous_value_and_version() {
        let mut field = phone();

        let patch = field.update("5", 1).unwrap().unwrap();
        assert_eq!(patch.value, "(5__) ___-____");
        assert_eq!(patch.version, 1);
        assert_eq!(field.value(), "(5__) ___-____");

        let patch = field.update("(55__) ___-____", 3).unwrap().unwrap();
        assert_eq!(patch.value, "(55_) ___-____");
        assert_eq!(patch.caret, 3);
        assert_eq!(field.version(), 2);
    }

    #[test]
    fn unchanged_value_yields_no_patch() {
        let mut field = phone();
        field.update("5", 1).unwrap();
        assert_eq!(field.update("(5__) ___-____", 2).unwrap(), None);
        assert_eq!(field.version(), 1);
    }

    #[test]
    fn prime_with_empty_value_leaves_field_empty() {
        let mut field = phone();
        // "" equals the initial previous value
        assert_eq!(field.prime(None::<&str>).unwrap(), None);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn prime_conforms_initial_number() {
        let mut field = phone();
        let patch = field.prime(5551234567_u64).unwrap().unwrap();
        assert_eq!(patch.value, "(555) 123-4567");
        assert_eq!(patch.caret, 0);
    }

    #[test]
    fn deleting_everything_empties_the_field() {
        let mut field = phone();
        field.update("5", 1).unwrap();

        // backspace over the only digit
        let patch = field.update("(__) ___-____", 1).unwrap().unwrap();
        assert_eq!(patch.caret, 0);
        assert_eq!(patch.value, "");
        assert_eq!(field.value(), "");
    }

    #[test]
    fn select_all_and_delete_empties_the_field() {
        let mut field = phone();
        field.prime("5551234567").unwrap();
        assert_eq!(field.value(), "(555) 123-4567");

        let patch = field.update("", 0).unwrap().unwrap();
        assert_eq!(patch.value, "");
        assert_eq!(patch.caret, 0);
    }

    #[test]
    fn validator_rejection_keeps_value() {
        let options = MaskOptions::default().with_validator(|value| !value.starts_with("(0"));
        let mut field = MaskedInput::new("(111) 111-1111", options).unwrap();

        let patch = field.update("0", 1).unwrap().unwrap();
        assert_eq!(patch.value, "");
        assert_eq!(field.value(), "");
    }

    #[test]
    fn no_guide_field_grows_with_input() {
        let options = MaskOptions {
            guide: false,
            ..MaskOptions::default()
        };
        let mut field = MaskedInput::new("11/11/1111", options).unwrap();

        assert_eq!(field.update("1", 1).unwrap().unwrap().value, "1");
        assert_eq!(field.update("12", 2).unwrap().unwrap().value, "12/");
        assert_eq!(field.update("12/3", 4).unwrap().unwrap().value, "12/3");
    }

    #[test]
    fn non_finite_number_is_rejected() {
        let mut field = phone();
        field.update("5", 1).unwrap();

        let err = field.update(f64::NAN, 0).unwrap_err();
        assert_eq!(err, MaskError::InvalidInput("NaN".to_string()));
        assert_eq!(field.value(), "(5__) ___-____");
        assert_eq!(field.version(), 1);
    }

    #[test]
    fn reset_clears_value() {
        let mut field = phone();
        field.update("5", 1).unwrap();
        field.reset();
        assert_eq!(field.value(), "");
        assert!(field.update("5", 1).unwrap().is_some());
    }
}
