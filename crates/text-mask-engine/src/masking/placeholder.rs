use std::sync::LazyLock;

use regex::Regex;

use super::token::{MaskToken, tokenize_mask};
use crate::error::MaskError;

static ESCAPED_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\.").expect("escaped literal pattern is valid"));

/// Renders `mask` as the string shown before anything is typed.
///
/// Class positions become `placeholder_char`, literals are copied and
/// escape markers are dropped, so `"+\\1 (111)"` with `_` gives `"+1 (___)"`.
///
/// Fails with [`MaskError::InvalidMask`] when `placeholder_char` appears
/// anywhere in the raw mask text.
pub fn build_placeholder(mask: &str, placeholder_char: char) -> Result<String, MaskError> {
    if mask.contains(placeholder_char) {
        log::warn!("rejecting mask {mask:?}: contains placeholder character {placeholder_char:?}");
        return Err(MaskError::InvalidMask {
            placeholder_char,
            mask: mask.to_string(),
        });
    }

    Ok(tokenize_mask(mask)
        .into_iter()
        .map(|token| match token {
            MaskToken::Literal(c) => c,
            MaskToken::Class(_) => placeholder_char,
        })
        .collect())
}

/// Replaces every escaped literal (`\X`) with a single space.
///
/// The result lines up with the placeholder position for position, and an
/// escaped token character can no longer be mistaken for a class.
pub fn unescape_mask(mask: &str) -> String {
    ESCAPED_LITERAL.replace_all(mask, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("(111) 111-1111", '_', "(___) ___-____")]
    #[case("\\1111", '_', "1___")]
    #[case("+\\1 (111)", '_', "+1 (___)")]
    #[case("UU-LL", '#', "##-##")]
    #[case("A?*", '•', "•••")]
    #[case("\\\\1", '_', "\\_")]
    #[case("", '_', "")]
    fn builds_placeholder(#[case] mask: &str, #[case] placeholder_char: char, #[case] expected: &str) {
        assert_eq!(build_placeholder(mask, placeholder_char).unwrap(), expected);
    }

    #[test]
    fn placeholder_char_in_mask_is_rejected() {
        let err = build_placeholder("111_1", '_').unwrap_err();
        assert_eq!(
            err,
            MaskError::InvalidMask {
                placeholder_char: '_',
                mask: "111_1".to_string(),
            }
        );
        assert!(err.to_string().contains("must not be used as part of the mask"));
    }

    #[test]
    fn escaped_placeholder_char_is_still_rejected() {
        assert!(build_placeholder("11\\#", '#').is_err());
    }

    #[rstest]
    #[case("(111) 111-1111")]
    #[case("+\\1 (111) \\A\\*")]
    #[case("\\\\\\\\11")]
    #[case("UUU LLL ???")]
    fn placeholder_and_unescaped_mask_have_equal_length(#[case] mask: &str) {
        let placeholder = build_placeholder(mask, '_').unwrap();
        assert_eq!(
            placeholder.chars().count(),
            unescape_mask(mask).chars().count()
        );
    }

    #[test]
    fn unescape_blanks_escaped_literals() {
        assert_eq!(unescape_mask("+\\1 (111)"), "+  (111)");
        assert_eq!(unescape_mask("\\\\1"), " 1");
        assert_eq!(unescape_mask("111"), "111");
    }
}
