use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::result;

/// Challenge header that did not yield all four required fields.
#[derive(Debug, PartialEq, Clone)]
pub struct MalformedChallenge {
    /// The raw `WWW-Authenticate` value as received
    pub header: String,
    /// Whatever was extracted before giving up
    pub parsed: BTreeMap<String, String>,
}

impl Display for MalformedChallenge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "header is invalid: {:?} (parsed: {:?})", self.header, self.parsed)
    }
}

impl std::error::Error for MalformedChallenge {}

/// Failure of a digest-authenticated request.
///
/// `E` is the error type of the transport in use; it is passed through untouched.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    Transport(E),
    MissingChallengeHeader,
    MalformedChallenge(MalformedChallenge),
    InvalidHeaderValue(String),
}

pub type Result<T, E> = result::Result<T, Error<E>>;

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::MissingChallengeHeader => write!(f, "Headers do not have WWW-Authenticate"),
            Error::MalformedChallenge(ctx) => write!(f, "Malformed challenge: {}", ctx),
            Error::InvalidHeaderValue(ctx) => write!(f, "Invalid header value: {}", ctx),
        }
    }
}

impl<E> From<MalformedChallenge> for Error<E> {
    fn from(e: MalformedChallenge) -> Self {
        Error::MalformedChallenge(e)
    }
}

impl<E> std::error::Error for Error<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            Error::MalformedChallenge(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, MalformedChallenge};
    use std::collections::BTreeMap;
    use std::error::Error as _;
    use std::fmt;

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl std::error::Error for Refused {}

    #[test]
    fn test_display() {
        let e: Error<Refused> = Error::Transport(Refused);
        assert_eq!(e.to_string(), "Transport error: connection refused");
        assert!(e.source().is_some());

        let e: Error<Refused> = Error::MissingChallengeHeader;
        assert_eq!(e.to_string(), "Headers do not have WWW-Authenticate");
        assert!(e.source().is_none());

        let mut parsed = BTreeMap::new();
        parsed.insert("realm".to_string(), "test".to_string());
        let e: Error<Refused> = MalformedChallenge {
            header: r#"Digest realm="test""#.to_string(),
            parsed,
        }
        .into();
        assert_eq!(
            e.to_string(),
            r#"Malformed challenge: header is invalid: "Digest realm=\"test\"" (parsed: {"realm": "test"})"#
        );
    }
}
