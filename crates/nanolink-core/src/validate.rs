use crate::error::ShortenError;
use url::Url;

/// Validates that a submitted URL is syntactically well formed.
///
/// A valid URL parses, uses the http or https scheme, and has a host.
/// Rejection happens before any store access.
pub fn validate_url(url: &str) -> Result<(), ShortenError> {
    if url.is_empty() {
        return Err(ShortenError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| ShortenError::InvalidUrl(format!("failed to parse '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ShortenError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                other
            )))
        }
    }

    if !parsed.has_host() {
        return Err(ShortenError::InvalidUrl(format!(
            "URL must have a host: {}",
            url
        )));
    }

    Ok(())
}
