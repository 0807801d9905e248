use thiserror::Error;

pub type Result<T> = std::result::Result<T, FhirError>;

#[derive(Error, Debug)]
pub enum FhirError {
    #[error("Invalid filter options: {}", .0.join("; "))]
    InvalidFilters(Vec<String>),

    #[error("Invalid FHIR endpoint {0}: {1}")]
    Endpoint(String, #[source] url::ParseError),

    #[error("Request to FHIR store failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected FHIR response shape: {0}")]
    UnexpectedShape(#[source] serde_json::Error),

    #[error(transparent)]
    Runtime(#[from] carelens_runtime::RuntimeError),
}
