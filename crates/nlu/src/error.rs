use thiserror::Error;

pub type Result<T> = std::result::Result<T, NluError>;

#[derive(Error, Debug)]
pub enum NluError {
    #[error("Request to {0} failed: {1}")]
    Transport(&'static str, #[source] reqwest::Error),

    #[error("Unexpected {provider} response shape: {source}")]
    UnexpectedShape {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Runtime(#[from] carelens_runtime::RuntimeError),
}

impl NluError {
    pub(crate) fn shape(provider: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::UnexpectedShape { provider, source }
    }
}
