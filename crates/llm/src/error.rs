/// Errors from the text-generation layer.
///
/// None of these reach HTTP callers; the counsellor logs them and answers
/// with a fallback reply instead.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API key was configured.
    #[error("Text generation is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout). The
    /// URL is stripped before wrapping.
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Generation API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered but produced no text.
    #[error("Generation API returned no text")]
    EmptyResponse,

    /// The generated text could not be interpreted.
    #[error("Malformed generation output: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}
