#[cfg(not(target_arch = "wasm32"))]
use crate::core::constants::REQUEST_TIMEOUT_SECS;
use once_cell::sync::Lazy;
use reqwest::Client;

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("suitmap/", env!("CARGO_PKG_VERSION"));

/// Client shared by every transport so connections are pooled
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    build_client().unwrap_or_else(|e| {
        log::warn!("falling back to a default HTTP client: {}", e);
        Client::new()
    })
});

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

// The browser owns the user agent and request timeouts
#[cfg(target_arch = "wasm32")]
fn build_client() -> reqwest::Result<Client> {
    Client::builder().build()
}

/// Maps a non-2xx response to `MapError::HttpStatus`
pub(crate) fn check_status(response: reqwest::Response) -> crate::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(crate::MapError::HttpStatus(status.as_u16()))
    }
}
