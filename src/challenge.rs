use crate::{MalformedChallenge, ParseMode};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const REALM: &str = "realm";
const NONCE: &str = "nonce";
const OPAQUE: &str = "opaque";
const QOP: &str = "qop";

/// Fields picked out of the challenge, in the order they are looked up
const WANTED: [&str; 4] = [NONCE, OPAQUE, QOP, REALM];

/// Digest challenge as sent by the server in `WWW-Authenticate`.
///
/// All four fields are mandatory; a header lacking any of them never produces a `Challenge`.
#[derive(Debug, PartialEq, Clone)]
pub struct Challenge {
    /// Authorization realm (i.e. hostname, serial number...)
    pub realm: String,
    /// Server nonce
    pub nonce: String,
    /// Server opaque string, echoed back verbatim
    pub opaque: String,
    /// Quality of protection, sent back unquoted
    pub qop: String,
}

impl Challenge {
    /// Parse a `WWW-Authenticate` value using the given mode
    ///
    /// # Errors
    /// If any of realm, nonce, opaque or qop could not be extracted
    pub fn parse(input: &str, mode: ParseMode) -> Result<Self, MalformedChallenge> {
        let parts = match mode {
            ParseMode::Lenient => parse_lenient(input),
            ParseMode::Strict => parse_strict(input)?,
        };

        Self::from_parts(input, parts)
    }

    fn from_parts(input: &str, mut parts: HashMap<String, String>) -> Result<Self, MalformedChallenge> {
        if WANTED.iter().any(|w| !parts.contains_key(*w)) {
            return Err(MalformedChallenge {
                header: input.to_string(),
                parsed: parts.into_iter().collect(),
            });
        }

        let mut take = |key: &str| parts.remove(key).unwrap_or_default();
        Ok(Self {
            realm: take(REALM),
            nonce: take(NONCE),
            opaque: take(OPAQUE),
            qop: take(QOP),
        })
    }
}

impl FromStr for Challenge {
    type Err = MalformedChallenge;

    /// Parse HTTP header leniently
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input, ParseMode::Lenient)
    }
}

impl Display for Challenge {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Digest realm=\"{}\", nonce=\"{}\", qop=\"{}\", opaque=\"{}\"",
            self.realm, self.nonce, self.qop, self.opaque
        )
    }
}

/// Comma-split the header and pull the first quoted substring out of every token
/// that mentions a wanted field name.
///
/// Later tokens win, and one token can feed several fields if it mentions more than one name.
/// Tokens without a quote are ignored.
pub fn parse_lenient(input: &str) -> HashMap<String, String> {
    let mut parts = HashMap::with_capacity(WANTED.len());

    for token in input.split(',') {
        for wanted in WANTED.iter() {
            if !token.contains(wanted) {
                continue;
            }
            if let Some(value) = token.split('"').nth(1) {
                parts.insert(wanted.to_string(), value.to_string());
            }
        }
    }

    parts
}

/// Tokenize into key/value pairs, then keep the wanted keys (compared case-insensitively).
///
/// A qop list has "auth" chosen out of it.
pub fn parse_strict(input: &str) -> Result<HashMap<String, String>, MalformedChallenge> {
    let mut rest = input.trim();
    if rest.get(..6).map_or(false, |scheme| scheme.eq_ignore_ascii_case("Digest")) {
        rest = &rest[6..];
    }

    match parse_header_map(rest) {
        Ok(map) => Ok(wanted_parts(map)),
        Err(partial) => Err(MalformedChallenge {
            header: input.to_string(),
            parsed: wanted_parts(partial).into_iter().collect::<BTreeMap<_, _>>(),
        }),
    }
}

/// Lowercase the keys and drop everything but realm, nonce, opaque and qop
fn wanted_parts(map: HashMap<String, String>) -> HashMap<String, String> {
    let mut parts = HashMap::with_capacity(WANTED.len());
    for (key, value) in map {
        let key = key.to_ascii_lowercase();
        if !WANTED.iter().any(|w| *w == key) {
            continue;
        }
        let value = if key == QOP { select_qop(&value) } else { value };
        parts.insert(key, value);
    }

    parts
}

fn select_qop(offered: &str) -> String {
    let options: Vec<&str> = offered
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect();

    if options.contains(&"auth") {
        "auth".to_string()
    } else {
        options.first().copied().unwrap_or_default().to_string()
    }
}

/// Helper func that parses the key-value string received from server.
///
/// On a truncated input (e.g. an unterminated quote) the pairs read so far are returned as the error.
pub fn parse_header_map(input: &str) -> Result<HashMap<String, String>, HashMap<String, String>> {
    #[derive(Debug)]
    #[allow(non_camel_case_types)]
    enum ParserState {
        P_WHITE,
        P_NAME(usize),
        P_VALUE_BEGIN,
        P_VALUE_QUOTED,
        P_VALUE_QUOTED_NEXTLITERAL,
        P_VALUE_PLAIN,
    }

    let mut state = ParserState::P_WHITE;

    let mut parsed = HashMap::<String, String>::new();
    let mut current_token = "";
    let mut current_value = String::new();

    for (pos, c) in input.char_indices() {
        match state {
            ParserState::P_WHITE => {
                if c.is_alphabetic() {
                    state = ParserState::P_NAME(pos);
                }
            }
            ParserState::P_NAME(name_start) => {
                if c == '=' {
                    current_token = input[name_start..pos].trim();
                    state = ParserState::P_VALUE_BEGIN;
                }
            }
            ParserState::P_VALUE_BEGIN => {
                current_value.clear();
                state = match c {
                    '"' => ParserState::P_VALUE_QUOTED,
                    _ => {
                        current_value.push(c);
                        ParserState::P_VALUE_PLAIN
                    }
                };
            }
            ParserState::P_VALUE_QUOTED => {
                match c {
                    '"' => {
                        parsed.insert(current_token.to_string(), std::mem::take(&mut current_value));
                        state = ParserState::P_WHITE;
                    }
                    '\\' => {
                        state = ParserState::P_VALUE_QUOTED_NEXTLITERAL;
                    }
                    _ => {
                        current_value.push(c);
                    }
                };
            }
            ParserState::P_VALUE_PLAIN => {
                if c == ',' || c.is_ascii_whitespace() {
                    parsed.insert(current_token.to_string(), std::mem::take(&mut current_value));
                    state = ParserState::P_WHITE;
                } else {
                    current_value.push(c);
                }
            }
            ParserState::P_VALUE_QUOTED_NEXTLITERAL => {
                current_value.push(c);
                state = ParserState::P_VALUE_QUOTED
            }
        }
    }

    match state {
        ParserState::P_VALUE_PLAIN => {
            parsed.insert(current_token.to_string(), current_value); // consume the value here
            Ok(parsed)
        }
        ParserState::P_WHITE => Ok(parsed),
        _ => Err(parsed),
    }
}
