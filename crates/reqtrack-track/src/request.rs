//! Per-request capture types.
//!
//! The web layer converts its native request/response types into these
//! before handing them to the pipeline, keeping the pipeline itself free
//! of any HTTP framework dependency.

use std::collections::BTreeMap;

use uuid::Uuid;

/// The principal a request was made as.
///
/// Authentication itself is an external collaborator; the web layer
/// resolves whatever credential scheme it uses into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Principal {
    /// No authenticated identity.
    #[default]
    Anonymous,
    /// An authenticated principal with a stable identifier.
    User(Uuid),
}

impl Principal {
    /// Whether this request carried an authenticated identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// The stable identifier, `None` for anonymous requests.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }
}

/// Request metadata captured before the handler runs.
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path (no query string).
    pub path: String,
    /// Raw encoded query string, empty when absent.
    pub query: String,
    /// Request headers, keyed by lowercase name. Headers with non-UTF-8
    /// values are dropped at capture time.
    pub headers: BTreeMap<String, String>,
    /// Direct connection peer address, when known.
    pub remote_addr: Option<String>,
}

impl CapturedRequest {
    /// Look up a header by its lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
