use reqwest::Client;

pub const USER_AGENT: &str = concat!("carelens/", env!("CARGO_PKG_VERSION"));

/// Build the process-wide HTTP client. Constructed once in `main` and shared
/// by every provider shim; reqwest clients are cheap to clone.
pub fn client() -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).build()
}
