//! Errors from the language-model provider.

/// Errors from advisor calls.
///
/// Handlers map every variant except `Unauthorized`/`RateLimited` to an
/// upstream-failure response; the deposit calculator additionally falls back
/// to a rule-based plan on any advisor error.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Transport-level failure talking to the provider.
    #[error("request to language-model provider failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a structured error.
    #[error("language-model provider error ({error_type}): {message}")]
    Api {
        error_type: String,
        message: String,
    },

    /// HTTP 429 from the provider, with the advertised retry delay.
    #[error("language-model provider rate limit exceeded, retry after {0}s")]
    RateLimited(u64),

    /// HTTP 401 from the provider, usually a bad API key.
    #[error("language-model provider rejected the API key")]
    Unauthorized,

    /// The completion could not be interpreted as the expected shape.
    #[error("could not parse language-model response: {0}")]
    Parse(String),
}
