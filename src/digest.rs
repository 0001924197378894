use crate::utils::QuoteForDigest;
use crate::Challenge;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};

use ::digest::Digest;
use md5::Md5;

/// MD5 over the colon-joined fields, lowercase hex
pub fn md5_hex(fields: &[&str]) -> String {
    let mut hash = Md5::new();
    hash.update(fields.join(":").as_bytes());
    hex::encode(hash.finalize())
}

//region Credentials

/// Login name and plain password
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

//endregion

//region NonceCount

/// Value of the `nc` field; formats as 8 lowercase hex digits
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct NonceCount(pub u32);

impl Display for NonceCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Per-client request counter. Starts at zero, so the first value handed out is 1.
///
/// The count wraps after `ffffffff` back to `00000000`, so values repeat once 2^32
/// headers have been produced by the same client.
#[derive(Debug, Default)]
pub struct NonceCounter(AtomicU32);

impl NonceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the new value
    pub fn next(&self) -> NonceCount {
        NonceCount(self.0.fetch_add(1, Ordering::SeqCst).wrapping_add(1))
    }

    /// Last value handed out (0 if none yet)
    pub fn current(&self) -> NonceCount {
        NonceCount(self.0.load(Ordering::SeqCst))
    }
}

//endregion

//region AuthorizationHeader

/// Header sent back to the server, including password hashes.
///
/// Built fresh for every attempt; the string form is obtained through `Display`.
#[derive(Debug, PartialEq, Clone)]
pub struct AuthorizationHeader {
    pub username: String,
    pub realm: String,
    pub nonce: String,
    /// Requested URI, exactly as used in HA2
    pub uri: String,
    pub qop: String,
    pub nc: NonceCount,
    /// Client nonce
    pub cnonce: String,
    /// Computed digest
    pub response: String,
    pub opaque: String,
}

impl AuthorizationHeader {
    /// Compute the digest response for a challenge.
    ///
    /// ```text
    /// HA1 = MD5(username:realm:password)
    /// HA2 = MD5(method:uri)
    /// response = MD5(HA1:nonce:nc:cnonce:qop:HA2)
    /// ```
    pub fn new(
        credentials: &Credentials,
        challenge: &Challenge,
        method: &str,
        uri: &str,
        cnonce: String,
        nc: NonceCount,
    ) -> Self {
        let ha1 = md5_hex(&[
            credentials.username.as_str(),
            challenge.realm.as_str(),
            credentials.password.as_str(),
        ]);
        let ha2 = md5_hex(&[method, uri]);

        let nc_str = nc.to_string();
        let response = md5_hex(&[
            ha1.as_str(),
            challenge.nonce.as_str(),
            nc_str.as_str(),
            cnonce.as_str(),
            challenge.qop.as_str(),
            ha2.as_str(),
        ]);

        AuthorizationHeader {
            username: credentials.username.clone(),
            realm: challenge.realm.clone(),
            nonce: challenge.nonce.clone(),
            uri: uri.to_string(),
            qop: challenge.qop.clone(),
            nc,
            cnonce,
            response,
            opaque: challenge.opaque.clone(),
        }
    }
}

impl Display for AuthorizationHeader {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", qop={}, nc={}, cnonce=\"{}\", response=\"{}\", opaque=\"{}\"",
            self.username.quote_for_digest(),
            self.realm.quote_for_digest(),
            self.nonce.quote_for_digest(),
            self.uri.quote_for_digest(),
            self.qop,
            self.nc,
            self.cnonce.quote_for_digest(),
            self.response,
            self.opaque.quote_for_digest(),
        )
    }
}

//endregion

#[cfg(test)]
mod tests {
    use super::{md5_hex, AuthorizationHeader, Credentials, NonceCount, NonceCounter};
    use crate::Challenge;
    use std::str::FromStr;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(&["test"]), "098f6bcd4621d373cade4e832627b4f6");
        assert_eq!(
            md5_hex(&["john", "test", "hello"]),
            "3ec9561b971fa739ca56ec90ca6264ba"
        );
    }

    #[test]
    fn test_nonce_count() {
        assert_eq!(NonceCount(1).to_string(), "00000001");
        assert_eq!(NonceCount(0x1a).to_string(), "0000001a");
        assert_eq!(NonceCount(u32::MAX).to_string(), "ffffffff");

        let counter = NonceCounter::new();
        assert_eq!(counter.current(), NonceCount(0));
        assert_eq!(counter.next(), NonceCount(1));
        assert_eq!(counter.next(), NonceCount(2));
        assert_eq!(counter.current(), NonceCount(2));
    }

    #[test]
    fn test_nonce_count_wraps() {
        let counter = NonceCounter(AtomicU32::new(u32::MAX - 1));
        assert_eq!(counter.next().to_string(), "ffffffff");
        assert_eq!(counter.next().to_string(), "00000000");
        assert_eq!(counter.next().to_string(), "00000001");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("john", "hello");
        let dbg = format!("{:?}", creds);
        assert!(dbg.contains("john"));
        assert!(!dbg.contains("hello"));
    }

    #[test]
    fn test_rfc2617() {
        let src = r#"
    Digest
        realm="testrealm@host.com",
        qop="auth",
        nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093",
        opaque="5ccc069c403ebaf9f0171e9517f40e41"
    "#;

        let challenge = Challenge::from_str(src).unwrap();
        let creds = Credentials::new("Mufasa", "Circle Of Life");
        let answer = AuthorizationHeader::new(
            &creds,
            &challenge,
            "GET",
            "/dir/index.html",
            "0a4f113b".to_string(),
            NonceCount(1),
        );

        let str = answer.to_string().replace(", ", ",\n  ");

        assert_eq!(
            str,
            r#"
Digest username="Mufasa",
  realm="testrealm@host.com",
  nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093",
  uri="/dir/index.html",
  qop=auth,
  nc=00000001,
  cnonce="0a4f113b",
  response="6629fae49393a05397450978507c4ef1",
  opaque="5ccc069c403ebaf9f0171e9517f40e41"
"#
            .trim()
        );
    }

    #[test]
    fn test_response_depends_on_nc() {
        let challenge =
            Challenge::from_str(r#"Digest realm="test", nonce="abc123", qop="auth", opaque="xyz""#)
                .unwrap();
        let creds = Credentials::new("john", "hello");
        let make = |nc| {
            AuthorizationHeader::new(
                &creds,
                &challenge,
                "GET",
                "http://example.com/",
                "aaaaaaaaaaaaaaaa".to_string(),
                NonceCount(nc),
            )
        };

        let first = make(1);
        assert_eq!(first, make(1));
        assert_eq!(first.response, "3c1126bad18c0dc19a62365306a2100a");
        assert_eq!(make(2).response, "fb3553785cc0d201585f81cca75f99bb");
    }

    #[test]
    fn test_quoting() {
        let challenge = Challenge {
            realm: r#"a "quoted" realm"#.to_string(),
            nonce: "n".to_string(),
            opaque: "o".to_string(),
            qop: "auth".to_string(),
        };
        let answer = AuthorizationHeader::new(
            &Credentials::new("us\\er", "pw"),
            &challenge,
            "GET",
            "/",
            "c".to_string(),
            NonceCount(3),
        );
        let str = answer.to_string();
        assert!(str.starts_with(r#"Digest username="us\\er", realm="a \"quoted\" realm", "#));
        assert!(str.contains("nc=00000003"));
    }
}
