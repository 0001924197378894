use crate::utils::random_token;
use crate::{
    AuthorizationHeader, Challenge, Config, Credentials, Error, NonceCount, NonceCounter, ParseMode,
    Result, Transport,
};
use http::header::{HeaderValue, AUTHORIZATION, WWW_AUTHENTICATE};
use http::{Request, Response, StatusCode};
use tracing::{debug, warn};

/// Length of the generated client nonce
const CNONCE_LEN: usize = 16;

/// HTTP client wrapper that answers Digest challenges on its own.
///
/// Every call to [`perform`](#method.perform) first sends a bodiless probe; only when that
/// comes back `401 Unauthorized` is the real request sent, with an `Authorization` header.
///
/// The nonce counter is atomic, so a client can be shared between threads if its transport allows it.
#[derive(Debug)]
pub struct DigestClient<T> {
    credentials: Credentials,
    transport: T,
    parse_mode: ParseMode,
    nonce_count: NonceCounter,
    /// Spoofed client nonce (use only for tests; a random nonce is generated automatically)
    cnonce: Option<String>,
}

impl<T> DigestClient<T> {
    /// Construct a client sending everything through `transport`
    pub fn new(config: Config, transport: T) -> Self {
        Self {
            credentials: config.credentials,
            transport,
            parse_mode: config.parse_mode,
            nonce_count: NonceCounter::new(),
            cnonce: None,
        }
    }

    pub fn set_custom_cnonce(&mut self, cnonce: impl Into<String>) {
        self.cnonce = Some(cnonce.into());
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// How many Authorization headers this client has produced so far
    pub fn nonce_count(&self) -> u32 {
        self.nonce_count.current().0
    }

    /// Send `request`, authenticating if the server asks for it.
    ///
    /// A response that is not a 401 to the probe is returned as is. After a 401 the request is
    /// sent exactly once more with credentials, and whatever comes back (even another 401)
    /// is the result.
    ///
    /// # Errors
    /// - [`Error::Transport`](enum.Error.html#variant.Transport) if either round trip fails
    /// - [`Error::MissingChallengeHeader`](enum.Error.html#variant.MissingChallengeHeader) on a 401 without `WWW-Authenticate`
    /// - [`Error::MalformedChallenge`](enum.Error.html#variant.MalformedChallenge) if realm, nonce, opaque or qop is missing
    /// - [`Error::InvalidHeaderValue`](enum.Error.html#variant.InvalidHeaderValue) if a header is not representable as text
    pub fn perform<B>(&self, mut request: Request<B>) -> Result<Response<T::Body>, T::Error>
    where
        T: Transport<B>,
        B: Default,
    {
        let challenge = match self.challenge_for(&request)? {
            Ok(challenge) => challenge,
            Err(response) => return Ok(response),
        };

        let authorization = self.authorization(&request, &challenge);
        debug!(
            method = %request.method(),
            uri = %request.uri(),
            nc = %authorization.nc,
            "sending authenticated request"
        );

        let value = match HeaderValue::from_str(&authorization.to_string()) {
            Ok(value) => value,
            Err(e) => return Err(Error::InvalidHeaderValue(e.to_string())),
        };
        request.headers_mut().insert(AUTHORIZATION, value);

        self.transport.send(request).map_err(Error::Transport)
    }

    /// Build the Authorization header answering `challenge` for this request.
    ///
    /// Consumes the next nonce count.
    pub fn authorization<B>(&self, request: &Request<B>, challenge: &Challenge) -> AuthorizationHeader {
        let cnonce = match &self.cnonce {
            Some(cnonce) => cnonce.clone(),
            None => random_token(CNONCE_LEN),
        };
        let nc: NonceCount = self.nonce_count.next();

        AuthorizationHeader::new(
            &self.credentials,
            challenge,
            request.method().as_str(),
            &request.uri().to_string(),
            cnonce,
            nc,
        )
    }

    /// Probe the resource without a body or credentials.
    ///
    /// Yields the parsed challenge, or the probe's own response when it wasn't a 401.
    fn challenge_for<B>(
        &self,
        request: &Request<B>,
    ) -> Result<std::result::Result<Challenge, Response<T::Body>>, T::Error>
    where
        T: Transport<B>,
        B: Default,
    {
        let mut probe = Request::new(B::default());
        *probe.method_mut() = request.method().clone();
        *probe.uri_mut() = request.uri().clone();
        *probe.version_mut() = request.version();

        debug!(method = %request.method(), uri = %request.uri(), "sending probe");
        let response = self.transport.send(probe).map_err(Error::Transport)?;

        if response.status() != StatusCode::UNAUTHORIZED {
            debug!(status = %response.status(), "probe not challenged");
            return Ok(Err(response));
        }

        let header = match response.headers().get(WWW_AUTHENTICATE) {
            Some(header) => header,
            None => {
                warn!(uri = %request.uri(), "401 without a WWW-Authenticate header");
                return Err(Error::MissingChallengeHeader);
            }
        };
        let header = match header.to_str() {
            Ok(header) => header,
            Err(e) => return Err(Error::InvalidHeaderValue(e.to_string())),
        };

        let challenge = match Challenge::parse(header, self.parse_mode) {
            Ok(challenge) => challenge,
            Err(e) => {
                warn!(header = %header, parsed = ?e.parsed, "malformed digest challenge");
                return Err(e.into());
            }
        };

        debug!(realm = %challenge.realm, qop = %challenge.qop, "got digest challenge");
        Ok(Ok(challenge))
    }
}

#[cfg(feature = "reqwest")]
impl DigestClient<crate::ReqwestTransport> {
    /// Client with its own blocking reqwest transport, using the configured timeouts
    pub fn with_default_transport(config: Config) -> reqwest::Result<Self> {
        let transport =
            crate::ReqwestTransport::new(config.connect_timeout, config.read_write_timeout)?;
        Ok(Self::new(config, transport))
    }
}
