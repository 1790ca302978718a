//! Existence probes against candidate server roots

use std::time::Duration;

use url::Url;

/// Probes are reachability checks, not requests; anything slower than this
/// means the candidate is misconfigured.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result type for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// How a probe can fail.
///
/// "Connection refused" means "no server here" and lets environment
/// discovery move on to the next candidate; every other transport failure
/// indicates misconfiguration and aborts discovery.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connection refused")]
    Refused,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Status and content type of a successful probe.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub content_type: Option<String>,
}

/// Lightweight existence probe against a URL.
pub trait ProbeClient {
    fn probe(&self, url: &Url) -> Result<ProbeResponse>;
}

/// [`ProbeClient`] issuing blocking HTTP HEAD requests.
pub struct HttpProbe {
    client: reqwest::blocking::Client,
}

impl HttpProbe {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ProbeClient for HttpProbe {
    fn probe(&self, url: &Url) -> Result<ProbeResponse> {
        let response = self.client.head(url.as_str()).send().map_err(|e| {
            if is_connection_refused(&e) {
                ProbeError::Refused
            } else {
                ProbeError::Transport(e.to_string())
            }
        })?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type,
        })
    }
}

/// Walk the error source chain looking for ECONNREFUSED.
fn is_connection_refused(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = cause.source();
    }
    false
}
