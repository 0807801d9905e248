pub mod client;
pub mod error;
pub mod options;
pub mod query;
pub mod resource;

pub use client::{FhirService, ManagedFhirClient, RestFhirClient};
pub use error::{FhirError, Result};
pub use options::ParsedOptions;
pub use query::SearchQuery;
pub use resource::{Bundle, Patient};
