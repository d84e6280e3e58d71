use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("model returned no answer")]
    EmptyResponse,

    #[error("could not decode model answer: {0}")]
    Decode(#[from] serde_json::Error),
}
