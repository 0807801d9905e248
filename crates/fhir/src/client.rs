use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use url::Url;

use carelens_runtime::{Config, ConfigTokenProvider, TokenProvider};

use crate::error::{FhirError, Result};
use crate::query::SearchQuery;
use crate::resource::{Bundle, Patient};

const FHIR_JSON: &str = "application/fhir+json";

/// What the rest of the program needs from a FHIR store.
#[async_trait]
pub trait FhirService: Send + Sync {
    async fn search_patients(&self, query: &SearchQuery) -> Result<Bundle>;
    async fn create_patient(&self, patient: &Patient) -> Result<()>;
}

/// Plain REST client against an open FHIR endpoint.
#[derive(Debug, Clone)]
pub struct RestFhirClient {
    client: Client,
    base: Url,
}

impl RestFhirClient {
    /// The base URL is normalized to end with a slash so resource paths
    /// join below it instead of replacing the last segment.
    pub fn new(client: Client, base: Url) -> Self {
        let mut base = base;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Self { client, base }
    }

    /// Build from configuration, reading the `FHIR_ENDPOINT` key.
    pub fn from_config(client: Client, config: &Config) -> Result<Self> {
        let endpoint = config.require("FHIR_ENDPOINT")?;
        let base = Url::parse(endpoint)
            .map_err(|e| FhirError::Endpoint(endpoint.to_string(), e))?;
        Ok(Self::new(client, base))
    }

    fn resource_url(&self, resource: &str) -> Url {
        // The base is slash-terminated, so join cannot fail for a bare
        // resource name.
        self.base.join(resource).expect("resource path joins")
    }

    pub(crate) async fn search_patients_with(
        &self,
        query: &SearchQuery,
        token: Option<&str>,
    ) -> Result<Bundle> {
        let mut url = self.resource_url("Patient");
        query.apply(&mut url);
        debug!("GET {url}");
        let mut request = self.client.get(url).header(reqwest::header::ACCEPT, FHIR_JSON);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let raw = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(FhirError::Transport)?
            .text()
            .await
            .map_err(FhirError::Transport)?;
        serde_json::from_str(&raw).map_err(FhirError::UnexpectedShape)
    }

    pub(crate) async fn create_patient_with(
        &self,
        patient: &Patient,
        token: Option<&str>,
    ) -> Result<()> {
        let url = self.resource_url("Patient");
        debug!("POST {url}");
        let mut request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, FHIR_JSON)
            .header(reqwest::header::ACCEPT, FHIR_JSON)
            .json(patient);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(FhirError::Transport)?;
        Ok(())
    }
}

#[async_trait]
impl FhirService for RestFhirClient {
    async fn search_patients(&self, query: &SearchQuery) -> Result<Bundle> {
        self.search_patients_with(query, None).await
    }

    async fn create_patient(&self, patient: &Patient) -> Result<()> {
        self.create_patient_with(patient, None).await
    }
}

/// Wraps [`RestFhirClient`] for stores behind short-lived credentials. A
/// fresh access token is fetched before every request so an expired one is
/// never reused.
pub struct ManagedFhirClient {
    inner: RestFhirClient,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for ManagedFhirClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedFhirClient")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl ManagedFhirClient {
    pub fn new(inner: RestFhirClient, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { inner, tokens }
    }

    /// Build a client for a Healthcare API FHIR store. `GOOGLE_PROJECT_ID`,
    /// `GOOGLE_DATASET` and `GOOGLE_FHIR_STORE` name the store,
    /// `GOOGLE_LOCATION` defaults to `us-central1`, and `GOOGLE_TOKEN` is
    /// re-read on every request.
    pub fn from_config(client: Client, config: &Config) -> Result<Self> {
        let project = config.require("GOOGLE_PROJECT_ID")?;
        let location = config.get("GOOGLE_LOCATION").unwrap_or("us-central1");
        let dataset = config.require("GOOGLE_DATASET")?;
        let store = config.require("GOOGLE_FHIR_STORE")?;
        if config.get("GOOGLE_TOKEN").is_none() {
            return Err(carelens_runtime::RuntimeError::NotInitialized("Healthcare FHIR").into());
        }
        info!("using Healthcare API FHIR store {store} in project {project}");
        let endpoint = store_endpoint(project, location, dataset, store);
        let base = Url::parse(&endpoint).map_err(|e| FhirError::Endpoint(endpoint.clone(), e))?;
        let tokens = Arc::new(ConfigTokenProvider::new(config.clone(), "GOOGLE_TOKEN"));
        Ok(Self::new(RestFhirClient::new(client, base), tokens))
    }
}

fn store_endpoint(project: &str, location: &str, dataset: &str, store: &str) -> String {
    format!(
        "https://healthcare.googleapis.com/v1/projects/{project}/locations/{location}/datasets/{dataset}/fhirStores/{store}/fhir/"
    )
}

#[async_trait]
impl FhirService for ManagedFhirClient {
    async fn search_patients(&self, query: &SearchQuery) -> Result<Bundle> {
        let token = self.tokens.access_token().await?;
        self.inner.search_patients_with(query, Some(&token)).await
    }

    async fn create_patient(&self, patient: &Patient) -> Result<()> {
        let token = self.tokens.access_token().await?;
        self.inner.create_patient_with(patient, Some(&token)).await
    }
}
