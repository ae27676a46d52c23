#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("No element matches `{selector}` in {url}")]
    MissingElement { selector: &'static str, url: String },

    #[error("Invalid date `{value}`")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}
