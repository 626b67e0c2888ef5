//! WebDriver session plumbing: connect, fetch the form page, close.

use crate::error::FillError;
use fantoccini::{Client, ClientBuilder};

/// Alternative WebDriver URLs tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Connect to a WebDriver server, walking the fallback URLs if the
/// configured one does not answer.
pub async fn connect(webdriver_url: &str) -> Result<Client, FillError> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == webdriver_url {
            continue; // Skip if it's the same as the one we already tried
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
        // Don't log errors for fallbacks to avoid log spam
    }

    ::log::error!("Failed to connect to any WebDriver server");
    ::log::error!(
        "Make sure a WebDriver server is running or set the webdriver_url configuration"
    );
    Err(FillError::WebDriverUnavailable)
}

/// Navigate to the form and return the rendered page source
pub async fn page_source(client: &Client, url: &str) -> Result<String, FillError> {
    ::log::info!("Loading form page: {}", url);
    client.goto(url).await?;
    let html = client.source().await?;
    ::log::debug!("Fetched {} bytes of page source", html.len());
    Ok(html)
}

/// Close the WebDriver session, logging rather than failing on error
pub async fn close(client: Client) {
    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }
}
