//! Cookie Management Infrastructure
//!
//! Builds and reads the session cookie.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie configuration
///
/// `Lax` is required for the OAuth callback: the provider redirects the
/// browser back cross-site and the session cookie must ride along.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    fn attributes(&self) -> String {
        let mut attrs = format!("; HttpOnly; Path={}; SameSite={}", self.path, self.same_site.as_str());
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str, max_age_secs: Option<i64>) -> String {
        let mut cookie = format!("{}={}{}", self.name, value, self.attributes());
        if let Some(max_age) = max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age.max(0)));
        }
        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    pub fn build_delete_cookie(&self) -> String {
        format!(
            "{}={}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.name,
            self.attributes()
        )
    }

    /// Set-Cookie as a header value
    pub fn set_cookie_header(&self, value: &str, max_age_secs: Option<i64>) -> HeaderValue {
        HeaderValue::from_str(&self.build_set_cookie(value, max_age_secs))
            .unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    /// Read this cookie from request headers
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.name)
    }
}

/// Extract a cookie value from headers
///
/// Every `Cookie` header is scanned; HTTP/2 clients may split cookies.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CookieConfig {
        CookieConfig {
            name: "vote_session".to_string(),
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }

    #[test]
    fn test_build_set_cookie() {
        let cookie = config().build_set_cookie("abc.def", Some(3600));
        assert!(cookie.starts_with("vote_session=abc.def"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_build_set_cookie_insecure_session_cookie() {
        let config = CookieConfig {
            secure: false,
            ..config()
        };
        let cookie = config.build_set_cookie("v", None);
        assert!(!cookie.contains("Secure"));
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_build_delete_cookie() {
        let cookie = config().build_delete_cookie();
        assert!(cookie.starts_with("vote_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; vote_session=abc123; other=xyz"),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("late=1"));

        assert_eq!(config().read(&headers), Some("abc123".to_string()));
        assert_eq!(extract_cookie(&headers, "late"), Some("1".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("vote_session="));
        assert_eq!(config().read(&headers), None);
    }
}
