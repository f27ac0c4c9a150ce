use reqwest::StatusCode;

#[derive(Debug)]
pub enum FetchError {
    Http { status: StatusCode, url: String },
    Transport(reqwest::Error),
    Timeout,
    Decode(serde_json::Error),
    /// A `Link` header we cannot read; treating it as "no next page" would
    /// silently truncate the catalog.
    InvalidLink { url: String },
}

impl FetchError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http { status, url } => write!(f, "catalog returned {status} for {url}"),
            FetchError::Transport(err) => write!(f, "transport error: {err}"),
            FetchError::Timeout => write!(f, "catalog request timed out"),
            FetchError::Decode(err) => write!(f, "decode error: {err}"),
            FetchError::InvalidLink { url } => write!(f, "unreadable Link header on {url}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(err) => Some(err),
            FetchError::Decode(err) => Some(err),
            _ => None,
        }
    }
}
