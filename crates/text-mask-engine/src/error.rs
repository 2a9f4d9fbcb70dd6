#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaskError {
    #[error(
        "Placeholder character {placeholder_char:?} must not be used as part of the mask {mask:?}. \
         Please specify a character that is not present in your mask as your placeholder character."
    )]
    InvalidMask { placeholder_char: char, mask: String },
    #[error("The value provided to the mask needs to be a string or a number. The value received was: {0}")]
    InvalidInput(String),
}
