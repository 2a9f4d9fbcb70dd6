use serde::Serialize;

/// Marks the next mask character as a literal.
pub const ESCAPE_CHAR: char = '\\';

/// Filler used for unfilled class positions unless the caller picks another.
pub const DEFAULT_PLACEHOLDER_CHAR: char = '_';

/// Character class a mask position accepts.
///
/// Each class is written in a mask with a single token character:
///
/// | token | class          | accepts               |
/// |-------|----------------|-----------------------|
/// | `1`   | `Numeric`      | `0-9`                 |
/// | `A`   | `Alphabetic`   | `a-z`, `A-Z`          |
/// | `?`   | `Alphanumeric` | letters or digits     |
/// | `U`   | `Uppercase`    | letters, upper-cased  |
/// | `L`   | `Lowercase`    | letters, lower-cased  |
/// | `*`   | `Any`          | anything              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CharClass {
    Numeric,
    Alphabetic,
    Alphanumeric,
    Uppercase,
    Lowercase,
    Any,
}

impl CharClass {
    /// Maps a mask character to its class, `None` for literals.
    pub fn from_token(token: char) -> Option<Self> {
        match token {
            '1' => Some(CharClass::Numeric),
            'A' => Some(CharClass::Alphabetic),
            '?' => Some(CharClass::Alphanumeric),
            'U' => Some(CharClass::Uppercase),
            'L' => Some(CharClass::Lowercase),
            '*' => Some(CharClass::Any),
            _ => None,
        }
    }

    pub fn token(self) -> char {
        match self {
            CharClass::Numeric => '1',
            CharClass::Alphabetic => 'A',
            CharClass::Alphanumeric => '?',
            CharClass::Uppercase => 'U',
            CharClass::Lowercase => 'L',
            CharClass::Any => '*',
        }
    }

    /// Whether `c` may be placed in a position of this class.
    pub fn accepts(self, c: char) -> bool {
        match self {
            CharClass::Numeric => c.is_ascii_digit(),
            CharClass::Alphabetic | CharClass::Uppercase | CharClass::Lowercase => {
                c.is_ascii_alphabetic()
            }
            CharClass::Alphanumeric => c.is_ascii_alphanumeric(),
            CharClass::Any => true,
        }
    }

    /// Case conversion applied to an accepted character.
    pub fn transform(self, c: char) -> char {
        match self {
            CharClass::Uppercase => c.to_ascii_uppercase(),
            CharClass::Lowercase => c.to_ascii_lowercase(),
            _ => c,
        }
    }
}

/// One position of a parsed mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskToken {
    Literal(char),
    Class(CharClass),
}

/// Splits a mask pattern into positions, resolving `\` escapes.
///
/// An escaped character is always a literal, even a token character or
/// another backslash. A trailing lone escape is dropped.
pub fn tokenize_mask(mask: &str) -> Vec<MaskToken> {
    let mut tokens = Vec::with_capacity(mask.len());
    let mut escaping = false;

    for c in mask.chars() {
        if escaping {
            escaping = false;
            tokens.push(MaskToken::Literal(c));
            continue;
        }
        if c == ESCAPE_CHAR {
            escaping = true;
            continue;
        }
        tokens.push(match CharClass::from_token(c) {
            Some(class) => MaskToken::Class(class),
            None => MaskToken::Literal(c),
        });
    }

    tokens
}
