//! The remote modulation exchange: the `interact` loop's only
//! suspension point (spec: "the only operation that can block").
//!
//! [`Remote`] is the injection seam — the driver is tested against
//! [`StubRemote`] and runs in production against [`HttpRemote`], with
//! no other code path distinguishing the two.

use std::fmt;
use std::time::Duration;

/// Default timeout for a single remote exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from a remote modulation exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote responded with a non-200 status.
    Status { code: u16, message: String },
    /// A transport-level failure: DNS, connection refused, TLS, or a
    /// timed-out request (`ureq` reports timeouts as transport errors,
    /// not a distinct status).
    Network(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Status { code, message } => {
                write!(f, "server returned {}: {}", code, message)
            }
            RemoteError::Network(msg) => write!(f, "network error: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

impl RemoteError {
    pub fn kind(&self) -> galaxy_base::ErrorKind {
        galaxy_base::ErrorKind::Remote
    }
}

/// One round of the wire protocol: send a modulated bit-string, get
/// one back. No retry lives behind this trait — the driver calls it
/// at most once per `flag = 1` step and propagates whatever it returns.
pub trait Remote {
    fn exchange(&mut self, bits: &str) -> Result<String, RemoteError>;
}

/// Talks to a real alien server over HTTP, in the same style as this
/// workspace's registry client: `ureq`, a `Bearer`-less API key on the
/// query string (the ICFP2020 proxy convention), and a status-code
/// match mapping non-2xx responses to a typed error rather than a
/// blanket network failure.
pub struct HttpRemote {
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl HttpRemote {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        HttpRemote {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Remote for HttpRemote {
    fn exchange(&mut self, bits: &str) -> Result<String, RemoteError> {
        let url = format!("{}?apiKey={}", self.endpoint, self.api_key);
        let response = ureq::post(&url)
            .timeout(self.timeout)
            .send_string(bits)
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => RemoteError::Status {
                    code,
                    message: resp.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(t) => RemoteError::Network(t.to_string()),
            })?;
        response
            .into_string()
            .map_err(|e| RemoteError::Network(e.to_string()))
    }
}

/// An in-memory responder for tests: either echoes the request back
/// (the common "round-trip" shape used by spec §8's sharing test) or
/// replays a fixed script of responses, one per call.
pub enum StubRemote {
    Echo,
    Scripted {
        responses: Vec<String>,
        calls: usize,
    },
}

impl StubRemote {
    pub fn echo() -> Self {
        StubRemote::Echo
    }

    pub fn scripted(responses: impl IntoIterator<Item = String>) -> Self {
        StubRemote::Scripted {
            responses: responses.into_iter().collect(),
            calls: 0,
        }
    }

    /// Number of exchanges performed so far.
    pub fn call_count(&self) -> usize {
        match self {
            StubRemote::Echo => 0,
            StubRemote::Scripted { calls, .. } => *calls,
        }
    }
}

impl Remote for StubRemote {
    fn exchange(&mut self, bits: &str) -> Result<String, RemoteError> {
        match self {
            StubRemote::Echo => Ok(bits.to_string()),
            StubRemote::Scripted { responses, calls } => {
                let response = responses.get(*calls).cloned().ok_or_else(|| {
                    RemoteError::Network("stub exhausted its scripted responses".into())
                })?;
                *calls += 1;
                Ok(response)
            }
        }
    }
}
