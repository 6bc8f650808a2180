use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::ProxyConfig;

/// A boxed stream type for HTTP response bodies.
///
/// The stream yields `Result<Bytes, E>` where E is the error type from the HTTP client.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Request body in one of the two shapes the API accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireBody {
    /// `application/json` body, used by fetch jobs.
    Json(String),
    /// `multipart/form-data` body with a `file` part and a `data` part, used by uploads.
    Multipart {
        file_name: String,
        file:      Vec<u8>,
        data:      String,
    },
}

/// One fully described POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub url:     String,
    /// Basic auth user name; the password is always empty.
    pub api_key: String,
    pub headers: Vec<(String, String)>,
    pub body:    WireBody,
    /// `None` disables the request timeout.
    pub timeout: Option<Duration>,
    pub proxy:   Option<ProxyConfig>,
}

impl WireRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response headers plus a streaming body.
pub struct WireResponse<E> {
    pub status:         u16,
    pub headers:        Vec<(String, String)>,
    pub content_length: Option<u64>,
    pub body:           BoxStream<'static, Result<Bytes, E>>,
}

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface needed to send a job. HTTP
/// status codes are not treated as errors; implementations only fail on
/// transport problems (DNS, connection, TLS, timeout).
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + 'static;

    /// Send `request` and return the response once its headers arrive.
    fn execute(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<WireResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use futures_util::StreamExt;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::multipart::{Form, Part};

    /// Production HTTP client implementation using reqwest.
    ///
    /// A fresh connection pool is built for every request so that the job's
    /// timeout and proxy apply and nothing outlives the send.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        system_proxy: bool,
    }

    impl Default for ReqwestClient {
        fn default() -> Self { Self::new() }
    }

    impl ReqwestClient {
        pub fn new() -> Self { Self { system_proxy: true } }

        /// Whether `HTTP_PROXY`-style environment variables are honored when
        /// the job has no explicit proxy. Enabled by default.
        #[must_use]
        pub fn system_proxy(mut self, enabled: bool) -> Self {
            self.system_proxy = enabled;
            self
        }

        fn client_for(&self, request: &WireRequest) -> reqwest::Result<reqwest::Client> {
            let mut builder = reqwest::Client::builder();

            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            match &request.proxy {
                Some(proxy) => {
                    let mut http_proxy = reqwest::Proxy::all(proxy.url())?;
                    if proxy.has_credentials() {
                        http_proxy = http_proxy.basic_auth(
                            proxy.user.as_deref().unwrap_or_default(),
                            proxy.pass.as_deref().unwrap_or_default(),
                        );
                    }
                    builder = builder.proxy(http_proxy);
                }
                None if !self.system_proxy => builder = builder.no_proxy(),
                None => {}
            }

            builder.build()
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn execute(
            &self,
            request: WireRequest,
        ) -> Result<WireResponse<Self::Error>, Self::Error> {
            let client = self.client_for(&request)?;

            let mut builder = client
                .post(&request.url)
                .basic_auth(&request.api_key, None::<&str>);

            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }

            builder = match request.body {
                WireBody::Json(body) => builder.header(CONTENT_TYPE, "application/json").body(body),
                WireBody::Multipart {
                    file_name,
                    file,
                    data,
                } => {
                    let form = Form::new()
                        .part("file", Part::bytes(file).file_name(file_name))
                        .text("data", data);
                    builder.multipart(form)
                }
            };

            let response = builder.send().await?;

            let status = response.status().as_u16();
            // `HeaderValue::to_str` rejects non-ASCII bytes, and the meta
            // header routinely carries UTF-8 JSON.
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let content_length = response.content_length();
            let body = response.bytes_stream().map(|chunk| chunk.map(Bytes::from));

            Ok(WireResponse {
                status,
                headers,
                content_length,
                body: Box::pin(body),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
