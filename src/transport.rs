use http::{Request, Response};
use std::sync::Arc;

/// Anything that can carry one HTTP request and hand back the response.
///
/// `B` is the request body type. The unauthenticated probe is sent with `B::default()`,
/// so the original body is only ever sent once.
pub trait Transport<B> {
    /// Response body type
    type Body;
    /// Network-level failure; passed through to the caller untouched
    type Error;

    fn send(&self, request: Request<B>) -> Result<Response<Self::Body>, Self::Error>;
}

impl<'a, B, T: Transport<B> + ?Sized> Transport<B> for &'a T {
    type Body = T::Body;
    type Error = T::Error;

    fn send(&self, request: Request<B>) -> Result<Response<Self::Body>, Self::Error> {
        (**self).send(request)
    }
}

impl<B, T: Transport<B> + ?Sized> Transport<B> for Box<T> {
    type Body = T::Body;
    type Error = T::Error;

    fn send(&self, request: Request<B>) -> Result<Response<Self::Body>, Self::Error> {
        (**self).send(request)
    }
}

impl<B, T: Transport<B> + ?Sized> Transport<B> for Arc<T> {
    type Body = T::Body;
    type Error = T::Error;

    fn send(&self, request: Request<B>) -> Result<Response<Self::Body>, Self::Error> {
        (**self).send(request)
    }
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_impl::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::Transport;
    use http::{Request, Response};
    use reqwest::blocking::{Body, Client};
    use std::time::Duration;

    /// Blocking reqwest client with the connect and read/write timeouts applied.
    ///
    /// reqwest has no deadline that starts at connection establishment, so the total
    /// per-request timeout is connect + read/write.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new(connect_timeout: Duration, read_write_timeout: Duration) -> reqwest::Result<Self> {
            let client = Client::builder()
                .connect_timeout(connect_timeout)
                .timeout(connect_timeout + read_write_timeout)
                .no_proxy()
                .build()?;

            Ok(Self { client })
        }

        /// Wrap an already configured client
        pub fn from_client(client: Client) -> Self {
            Self { client }
        }
    }

    impl<B: Into<Body>> Transport<B> for ReqwestTransport {
        type Body = Vec<u8>;
        type Error = reqwest::Error;

        fn send(&self, request: Request<B>) -> Result<Response<Vec<u8>>, reqwest::Error> {
            let (parts, body) = request.into_parts();

            let reply = self
                .client
                .request(parts.method, parts.uri.to_string())
                .headers(parts.headers)
                .body(body)
                .send()?;

            let status = reply.status();
            let version = reply.version();
            let headers = reply.headers().clone();
            let body = reply.bytes()?.to_vec();

            let mut response = Response::new(body);
            *response.status_mut() = status;
            *response.version_mut() = version;
            *response.headers_mut() = headers;
            Ok(response)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transport;
    use http::{Request, Response, StatusCode};
    use std::convert::Infallible;
    use std::sync::Arc;

    struct Teapot;

    impl Transport<()> for Teapot {
        type Body = ();
        type Error = Infallible;

        fn send(&self, _request: Request<()>) -> Result<Response<()>, Infallible> {
            let mut response = Response::new(());
            *response.status_mut() = StatusCode::IM_A_TEAPOT;
            Ok(response)
        }
    }

    fn status_of<T: Transport<(), Body = (), Error = Infallible>>(transport: T) -> StatusCode {
        match transport.send(Request::new(())) {
            Ok(response) => response.status(),
            Err(e) => match e {},
        }
    }

    #[test]
    fn test_forwarding_impls() {
        assert_eq!(status_of(&Teapot), StatusCode::IM_A_TEAPOT);
        assert_eq!(status_of(Box::new(Teapot)), StatusCode::IM_A_TEAPOT);
        assert_eq!(status_of(Arc::new(Teapot)), StatusCode::IM_A_TEAPOT);

        let dynamic: Box<dyn Transport<(), Body = (), Error = Infallible>> = Box::new(Teapot);
        assert_eq!(status_of(dynamic), StatusCode::IM_A_TEAPOT);
    }
}
