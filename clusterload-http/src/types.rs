//! HTTP types and enums

use std::fmt;

/// HTTP method label. Simulated users only ever issue GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum HttpMethod {
    #[default]
    Get,
}

impl HttpMethod {
    /// Get the string representation of the HTTP method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
        }
    }
}

/// What is left of a response once the body has been drained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_length: usize,
}

impl HttpResponse {
    pub fn new(status: u16, content_length: usize) -> Self {
        Self {
            status,
            content_length,
        }
    }

    /// Status codes of 400 and above count as failed requests
    pub fn is_failure(&self) -> bool {
        self.status >= 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_into_reqwest() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }

    #[test]
    fn test_response_failure_threshold() {
        assert!(!HttpResponse::new(200, 0).is_failure());
        assert!(!HttpResponse::new(304, 0).is_failure());
        assert!(HttpResponse::new(404, 12).is_failure());
        assert!(HttpResponse::new(503, 0).is_failure());
    }
}
