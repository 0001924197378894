use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How the `WWW-Authenticate` header is taken apart
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseMode {
    /// Comma-split tokens, matched by substring and read from their first quoted part.
    ///
    /// Tolerates sloppy servers, but a value (or another field name) containing
    /// "realm", "nonce", "opaque" or "qop" can be picked up for the wrong field.
    Lenient,
    /// Proper `key=value` tokenization with exact, case-insensitive key names
    Strict,
}

impl Default for ParseMode {
    fn default() -> Self {
        ParseMode::Lenient
    }
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(ParseMode::Lenient),
            "strict" => Ok(ParseMode::Strict),
            _ => Err(format!("Unknown parse mode: {}", s)),
        }
    }
}

impl Display for ParseMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseMode::Lenient => "lenient",
            ParseMode::Strict => "strict",
        })
    }
}
