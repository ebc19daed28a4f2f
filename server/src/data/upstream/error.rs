use thiserror::Error;

/// Failure fetching flow records, from the upstream API or the fallback file
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Upstream returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Upstream configuration error: {0}")]
    Config(String),

    #[error("Failed to read fallback data {path}: {source}")]
    FallbackRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fallback data {path}: {source}")]
    FallbackParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    pub fn status(status: reqwest::StatusCode, url: impl Into<String>) -> Self {
        Self::Status {
            status: status.as_u16(),
            url: url.into(),
        }
    }
}
