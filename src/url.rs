//! URL join helper for resolved base URLs
//!
//! Base URLs carry the API path prefix (e.g. `http://host:5000/api`) while
//! callers often spell the prefix again in the endpoint path. Joining has to
//! collapse the duplicate prefix and the duplicate separator.

use crate::error::{Result, UrlError};

/// Join a resolved base URL and a relative endpoint path into a full URL.
///
/// Collapses a doubled `/` between the parts and strips the endpoint's
/// leading path segment when it repeats the base's trailing segment, so
/// `("http://h:5000/api", "/api/auth/login")` yields a single `/api`.
///
/// An empty endpoint returns the base unchanged (the bare-root health probe
/// relies on this). An empty base is rejected.
pub fn build_url(base: &str, endpoint: &str) -> Result<String> {
    let base = base.trim();
    if base.is_empty() {
        return Err(UrlError::EmptyBase.into());
    }
    let base = base.trim_end_matches('/');

    let endpoint = endpoint.trim();
    if endpoint.is_empty() || endpoint == "/" {
        return Ok(base.to_string());
    }

    let mut path = if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{}", endpoint)
    };

    if let Some(prefix) = trailing_segment(base) {
        if path == prefix {
            path.clear();
        } else if let Some(rest) = path.strip_prefix(&format!("{}/", prefix)) {
            path = format!("/{}", rest);
        }
    }

    Ok(format!("{}{}", base, path))
}

/// Trailing path segment of a base URL (e.g. `/api`), if it has a path
/// component beyond the authority.
fn trailing_segment(base: &str) -> Option<String> {
    let after_scheme = base.split_once("://").map(|(_, rest)| rest).unwrap_or(base);
    let slash = after_scheme.find('/')?;
    let path = &after_scheme[slash..];
    let segment = path.rsplit('/').next().filter(|s| !s.is_empty())?;
    Some(format!("/{}", segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_duplicate_api_prefix() {
        let url = build_url("http://host:5000/api", "/api/auth/login").unwrap();
        assert_eq!(url, "http://host:5000/api/auth/login");
    }

    #[test]
    fn test_collapses_trailing_slash() {
        let url = build_url("http://host:5000/api/", "/users").unwrap();
        assert_eq!(url, "http://host:5000/api/users");
    }

    #[test]
    fn test_base_without_path() {
        let url = build_url("http://host:5000", "/api/auth/login").unwrap();
        assert_eq!(url, "http://host:5000/api/auth/login");
    }

    #[test]
    fn test_endpoint_without_leading_slash() {
        let url = build_url("http://host:5000/api", "users").unwrap();
        assert_eq!(url, "http://host:5000/api/users");
    }

    #[test]
    fn test_empty_endpoint_returns_base() {
        let url = build_url("http://host:5000", "").unwrap();
        assert_eq!(url, "http://host:5000");
    }

    #[test]
    fn test_endpoint_equal_to_prefix() {
        let url = build_url("http://host:5000/api", "/api").unwrap();
        assert_eq!(url, "http://host:5000/api");
    }

    #[test]
    fn test_prefix_is_not_stripped_mid_word() {
        // "/apiary" shares only a textual prefix with "/api"
        let url = build_url("http://host:5000/api", "/apiary").unwrap();
        assert_eq!(url, "http://host:5000/api/apiary");
    }

    #[test]
    fn test_empty_base_rejected() {
        assert!(build_url("", "/users").is_err());
        assert!(build_url("   ", "/users").is_err());
    }
}
