//! Response types.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;

// ============================================================================
// Response Body
// ============================================================================

/// Response body, parsed as JSON when the whole payload is valid JSON.
///
/// Callers branch on the variant; neither shape is guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The payload parsed as a JSON document.
    Json(Value),
    /// Anything else, as received.
    Text(String),
}

impl ResponseBody {
    /// Parses opportunistically; falls back to the raw text.
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    /// Body as text. JSON bodies are re-serialised.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Json(value) => Cow::Owned(value.to_string()),
        }
    }

    /// Parsed JSON document, if the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

// ============================================================================
// Response Headers
// ============================================================================

/// Response headers keyed by lowercase name; multi-valued headers keep every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: BTreeMap<String, Vec<String>>,
}

impl ResponseHeaders {
    /// Converts a reqwest header map. Values that are not valid UTF-8 are skipped.
    pub fn from_header_map(map: &reqwest::header::HeaderMap) -> Self {
        let mut headers = Self::default();
        for (name, value) in map {
            if let Ok(value) = value.to_str() {
                headers.append(name.as_str(), value);
            }
        }
        headers
    }

    /// Appends a value for `name`.
    pub fn append(&mut self, name: &str, value: &str) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.to_string());
    }

    /// First value of a header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value of a header, in received order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ============================================================================
// Http Response
// ============================================================================

/// Final response of a request, after redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// URL that produced this response (last hop of any redirect chain).
    pub url: String,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Response body.
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text.
    pub fn text(&self) -> Cow<'_, str> {
        self.body.as_text()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_json_when_whole_payload_parses() {
        let body = ResponseBody::from_text(r#"{"ok":true}"#.to_string());
        assert_eq!(body.as_json().unwrap()["ok"], true);
    }

    #[test]
    fn test_body_text_when_not_json() {
        let html = "<html><body>{\"ok\":true}</body></html>".to_string();
        let body = ResponseBody::from_text(html.clone());
        assert_eq!(body, ResponseBody::Text(html));
    }

    #[test]
    fn test_body_text_for_empty_payload() {
        let body = ResponseBody::from_text(String::new());
        assert_eq!(body.as_text(), "");
        assert!(body.as_json().is_none());
    }

    #[test]
    fn test_headers_multi_valued_case_insensitive() {
        let mut headers = ResponseHeaders::default();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");
        assert_eq!(headers.get("SET-COOKIE"), Some("a=1"));
        assert_eq!(headers.get_all("set-cookie"), ["a=1", "b=2"]);
        assert!(headers.get_all("location").is_empty());
    }
}
