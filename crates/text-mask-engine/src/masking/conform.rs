use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::placeholder::{build_placeholder, unescape_mask};
use super::token::{CharClass, DEFAULT_PLACEHOLDER_CHAR};
use crate::error::MaskError;

/// Predicate over a proposed conformed string; `false` rejects the edit.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// How a single call to [`conform_to_mask`] should behave.
#[derive(Clone)]
pub struct ConformConfig {
    /// Pad unfilled positions with the placeholder (`true`) or stop at the
    /// last filled position (`false`).
    pub guide: bool,
    /// Output of the previous conform call for the same field.
    pub previous_conformed_input: String,
    pub placeholder_char: char,
    pub validator: Option<Validator>,
}

impl Default for ConformConfig {
    fn default() -> Self {
        Self {
            guide: true,
            previous_conformed_input: String::new(),
            placeholder_char: DEFAULT_PLACEHOLDER_CHAR,
            validator: None,
        }
    }
}

impl fmt::Debug for ConformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConformConfig")
            .field("guide", &self.guide)
            .field("previous_conformed_input", &self.previous_conformed_input)
            .field("placeholder_char", &self.placeholder_char)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl ConformConfig {
    pub fn with_previous(mut self, previous: impl Into<String>) -> Self {
        self.previous_conformed_input = previous.into();
        self
    }

    pub fn with_guide(mut self, guide: bool) -> Self {
        self.guide = guide;
        self
    }

    pub fn with_placeholder_char(mut self, placeholder_char: char) -> Self {
        self.placeholder_char = placeholder_char;
        self
    }

    pub fn with_validator(mut self, validator: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

/// Everything the caret resolver needs to know about a conform call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformMeta {
    /// The raw input as received, before conforming.
    pub input: String,
    pub mask: String,
    pub guide: bool,
    pub placeholder_char: char,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformResult {
    pub output: String,
    pub meta: ConformMeta,
}

/// Index of the first position where `a` and `b` differ, comparing up to
/// the longer of the two. `None` when they are identical.
pub fn index_of_first_change(a: &[char], b: &[char]) -> Option<usize> {
    (0..a.len().max(b.len())).find(|&i| a.get(i) != b.get(i))
}

/// Lays `user_input` over `mask`.
///
/// Characters already sitting on unchanged mask literals are discarded, the
/// remaining ones fill class positions left to right (skipping anything a
/// position rejects), and the rest of the placeholder is appended in guide
/// mode. When the validator rejects the result the previous conformed input
/// is returned unchanged.
pub fn conform_to_mask(
    user_input: &str,
    mask: &str,
    config: &ConformConfig,
) -> Result<ConformResult, MaskError> {
    let placeholder_char = config.placeholder_char;
    let placeholder_str = build_placeholder(mask, placeholder_char)?;
    let placeholder: Vec<char> = placeholder_str.chars().collect();

    let previous: Vec<char> = config.previous_conformed_input.chars().collect();
    let input: Vec<char> = user_input.chars().collect();

    let suppress_guide = !config.guide;
    let first_change = index_of_first_change(&previous, &input).unwrap_or(0);
    let edited_chars = input.len() as isize - previous.len() as isize;
    let is_addition = suppress_guide && input.len() >= previous.len();
    let unescaped: Vec<char> = unescape_mask(mask).chars().collect();

    let mut queue: VecDeque<char> = input.iter().copied().collect();

    // Drop input characters that sit on unchanged mask literals; only the
    // characters meant for class positions stay in the queue.
    let mut splices = 0isize;
    for (i, &slot) in placeholder.iter().enumerate() {
        if queue.is_empty() {
            break;
        }
        let i = i as isize;
        let jump_ahead = i >= first_change as isize && !previous.is_empty();
        let pointer = (if jump_ahead { i + edited_chars } else { i }) - splices;
        let Ok(pointer) = usize::try_from(pointer) else {
            continue;
        };
        if queue.get(pointer) == Some(&slot) && slot != placeholder_char {
            queue.remove(pointer);
            splices += 1;
        }
    }

    let mut conformed = String::with_capacity(placeholder_str.len());
    'placeholder: for (i, &slot) in placeholder.iter().enumerate() {
        if slot != placeholder_char {
            conformed.push(slot);
            continue;
        }

        let class = unescaped.get(i).copied().and_then(CharClass::from_token);
        while let Some(c) = queue.pop_front() {
            if c == placeholder_char && !suppress_guide {
                conformed.push(placeholder_char);
                continue 'placeholder;
            } else if let Some(class) = class
                && class.accepts(c)
            {
                conformed.push(class.transform(c));
                continue 'placeholder;
            }
            log::trace!("position {i} rejected {c:?}");
        }

        if !suppress_guide {
            conformed.extend(&placeholder[i..]);
        }
        break;
    }

    // Deleting in no-guide mode: cut everything after the last class
    // position that received a character, so no trailing literals remain.
    if suppress_guide && !is_addition {
        let filled = conformed.chars().count();
        let last_filled = (0..filled).rev().find(|&i| placeholder[i] == placeholder_char);
        conformed = match last_filled {
            Some(i) => conformed.chars().take(i + 1).collect(),
            None => String::new(),
        };
    }

    let accepted = config
        .validator
        .as_ref()
        .is_none_or(|validator| validator(&conformed));
    let output = if accepted {
        conformed
    } else {
        log::debug!("validator rejected {conformed:?}, keeping previous value");
        config.previous_conformed_input.clone()
    };

    log::debug!("conformed {user_input:?} to {output:?} with mask {mask:?}");

    Ok(ConformResult {
        output,
        meta: ConformMeta {
            input: user_input.to_string(),
            mask: mask.to_string(),
            guide: config.guide,
            placeholder_char,
            placeholder: placeholder_str,
        },
    })
}
