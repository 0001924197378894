//! This crate wraps an HTTP client so that resources protected by Digest Auth (RFC 2617,
//! MD5 with `qop=auth`) can be requested as if they were open. It was written for talking
//! to IP cameras and similar embedded servers.
//!
//! Each request is first sent without a body or credentials. If the server answers
//! `401 Unauthorized` with a `WWW-Authenticate: Digest ...` challenge, the digest response is
//! computed and the original request is sent once more, with an `Authorization` header.
//! Anything other than a 401 to the probe is handed back untouched.
//!
//! The HTTP side is pluggable through the [`Transport`](trait.Transport.html) trait; with the
//! `reqwest` feature a blocking reqwest transport is available as
//! [`DigestClient::with_default_transport`](struct.DigestClient.html#method.with_default_transport).
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use digest_request::{Config, DigestClient, Transport};
//! use digest_request::http::{header, HeaderValue, Request, Response, StatusCode};
//! use std::convert::Infallible;
//!
//! // A stand-in for the network: challenges every request that has no credentials
//! struct Camera;
//!
//! impl Transport<()> for Camera {
//!     type Body = &'static str;
//!     type Error = Infallible;
//!
//!     fn send(&self, request: Request<()>) -> Result<Response<&'static str>, Infallible> {
//!         let mut response = Response::new("snapshot");
//!         if !request.headers().contains_key(header::AUTHORIZATION) {
//!             *response.status_mut() = StatusCode::UNAUTHORIZED;
//!             *response.body_mut() = "";
//!             response.headers_mut().insert(
//!                 header::WWW_AUTHENTICATE,
//!                 HeaderValue::from_static(r#"Digest realm="test", nonce="abc123", qop="auth", opaque="xyz""#),
//!             );
//!         }
//!         Ok(response)
//!     }
//! }
//!
//! let client = DigestClient::new(Config::new("john", "hello"), Camera);
//!
//! let request = Request::get("http://example.com/").body(()).unwrap();
//! let response = client.perform(request).unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(*response.body(), "snapshot");
//!
//! // one Authorization header was produced; the next one will carry nc=00000002
//! assert_eq!(client.nonce_count(), 1);
//! ```
//!
//! The digest itself can also be computed without any transport:
//!
//! ```
//! use digest_request::{AuthorizationHeader, Credentials, NonceCount};
//!
//! let challenge = digest_request::parse(r#"Digest realm="test", nonce="abc123", qop="auth", opaque="xyz""#).unwrap();
//! let answer = AuthorizationHeader::new(
//!     &Credentials::new("john", "hello"),
//!     &challenge,
//!     "GET",
//!     "http://example.com/",
//!     "aaaaaaaaaaaaaaaa".to_string(),
//!     NonceCount(1),
//! );
//! assert_eq!(answer.response, "3c1126bad18c0dc19a62365306a2100a");
//! ```

mod challenge;
mod client;
mod config;
mod digest;
mod enums;
mod error;
mod transport;
mod utils;

pub use http;

pub use error::{Error, MalformedChallenge, Result};

pub use crate::challenge::Challenge;
pub use crate::client::DigestClient;
pub use crate::config::{Config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_WRITE_TIMEOUT};
pub use crate::digest::{AuthorizationHeader, Credentials, NonceCount, NonceCounter};
pub use crate::transport::Transport;

#[cfg(feature = "reqwest")]
pub use crate::transport::ReqwestTransport;

pub use crate::enums::*;

/// Parse the WWW-Authenticate header value leniently.
/// It's just a convenience method to call [`Challenge::parse()`](struct.Challenge.html#method.parse).
pub fn parse(www_authenticate: &str) -> std::result::Result<Challenge, MalformedChallenge> {
    Challenge::parse(www_authenticate, ParseMode::Lenient)
}

#[test]
fn test_parse_respond() {
    let src = r#"Digest realm="test", nonce="abc123", qop="auth", opaque="xyz""#;

    let challenge = crate::parse(src).unwrap();
    let answer = AuthorizationHeader::new(
        &Credentials::new("john", "hello"),
        &challenge,
        "GET",
        "http://example.com/",
        "aaaaaaaaaaaaaaaa".to_string(),
        NonceCount(1),
    );

    let str = answer.to_string().replace(", ", ",\n  ");

    assert_eq!(
        str,
        r#"
Digest username="john",
  realm="test",
  nonce="abc123",
  uri="http://example.com/",
  qop=auth,
  nc=00000001,
  cnonce="aaaaaaaaaaaaaaaa",
  response="3c1126bad18c0dc19a62365306a2100a",
  opaque="xyz"
"#
        .trim()
    );
}
