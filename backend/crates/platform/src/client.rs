//! Client identification utilities
//!
//! Resolves the network address a request came from and derives the
//! stable digest used to key anonymous clients.

use axum::http::HeaderMap;
use std::net::IpAddr;

use crate::crypto::sha256_hex;

/// Stand-in digested when no peer address is known
const UNKNOWN_ADDRESS: &str = "unknown";

/// Extract client IP address
///
/// The direct connection address wins unless `trust_forwarded_for` is set,
/// in which case the first `X-Forwarded-For` entry is used when it parses.
/// Only enable forwarding behind a proxy that overwrites the header.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if forwarded.is_some() {
            return forwarded;
        }
    }
    direct_ip
}

/// Lowercase hex SHA-256 of the textual client address
///
/// Deterministic: the same address always yields the same digest.
pub fn address_digest(ip: Option<IpAddr>) -> String {
    match ip {
        Some(ip) => sha256_hex(ip.to_string().as_bytes()),
        None => sha256_hex(UNKNOWN_ADDRESS.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        headers
    }

    #[test]
    fn test_extract_client_ip_xff_trusted() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        let ip = extract_client_ip(&forwarded_headers(), Some(direct), true);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_xff_ignored_by_default() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        let ip = extract_client_ip(&forwarded_headers(), Some(direct), false);
        assert_eq!(ip, Some(direct));
    }

    #[test]
    fn test_extract_client_ip_bad_xff_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        let direct: IpAddr = "10.1.1.1".parse().unwrap();
        assert_eq!(extract_client_ip(&headers, Some(direct), true), Some(direct));
    }

    #[test]
    fn test_address_digest_is_deterministic() {
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        assert_eq!(address_digest(Some(ip)), address_digest(Some(ip)));
        assert_eq!(address_digest(Some(ip)), sha256_hex(b"203.0.113.7"));
        assert_ne!(
            address_digest(Some(ip)),
            address_digest(Some("203.0.113.8".parse().unwrap()))
        );
        assert_eq!(address_digest(None).len(), 64);
    }
}
