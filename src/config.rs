use crate::{Credentials, ParseMode};
use std::time::Duration;

/// Time allowed to establish the TCP (and TLS) connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time allowed for the exchange once connected
pub const DEFAULT_READ_WRITE_TIMEOUT: Duration = Duration::from_millis(2500);

/// Client settings.
///
/// The timeouts are only consulted when the client builds its own transport
/// (see `DigestClient::with_default_transport`); an injected transport brings its own.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub connect_timeout: Duration,
    pub read_write_timeout: Duration,
    pub parse_mode: ParseMode,
}

impl Config {
    /// Default timeouts and lenient challenge parsing
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Config {
            credentials: Credentials::new(username, password),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_write_timeout: DEFAULT_READ_WRITE_TIMEOUT,
            parse_mode: ParseMode::default(),
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_write_timeout(mut self, timeout: Duration) -> Self {
        self.read_write_timeout = timeout;
        self
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_WRITE_TIMEOUT};
    use crate::ParseMode;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = Config::new("john", "hello");
        assert_eq!(config.credentials.username, "john");
        assert_eq!(config.credentials.password, "hello");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.read_write_timeout, Duration::from_millis(2500));
        assert_eq!(config.parse_mode, ParseMode::Lenient);
    }

    #[test]
    fn test_setters() {
        let config = Config::new("john", "hello")
            .connect_timeout(Duration::from_secs(1))
            .read_write_timeout(Duration::from_millis(100))
            .parse_mode(ParseMode::Strict);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.read_write_timeout, Duration::from_millis(100));
        assert_eq!(config.parse_mode, ParseMode::Strict);
        assert_ne!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_ne!(config.read_write_timeout, DEFAULT_READ_WRITE_TIMEOUT);
    }
}
