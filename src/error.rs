use thiserror::Error;

/// Errors surfaced by the quiz builder.
///
/// Network, file and parsing failures wrap their source error. The remaining
/// variants are validation failures that callers turn into a status message.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("HTTP error while fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Penalty must parse as a number between 0 and 1.
    #[error("Pénalité invalide. Il faut entrer une pénalité entre 0 et 1 (reçu {0:?})")]
    InvalidPenalty(String),

    #[error("Question {0} absente du catalogue")]
    UnknownQuestion(usize),

    #[error("Aucune question sélectionnée")]
    EmptySelection,

    #[error("QR code error: {0}")]
    Qr(String),
}

pub type Result<T> = std::result::Result<T, QuizError>;
