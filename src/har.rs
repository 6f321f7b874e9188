//! Typed HTTP Archive (HAR) document
//!
//! Only the parts the generator reads are modelled. Everything else in the
//! archive is ignored, and most fields are optional since capture tools
//! disagree on what they emit.

use crate::error::Har2OapiError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Har {
    pub log: Log,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Creator {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    pub request: Request,
    /// Absent when the request never completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_version: Option<String>,
    pub headers: Vec<Header>,
    pub query_string: Vec<QueryParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    /// Zero when the capture recorded no status (aborted, blocked)
    pub status: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    pub headers: Vec<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

impl Response {
    /// Whether the status is in the 2xx range
    #[must_use]
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Parse a HAR document from its JSON text
///
/// # Errors
///
/// Returns an input parse error if the text is not JSON or lacks a `log` object
#[inline]
pub fn parse_har(text: &str) -> Result<Har> {
    serde_json::from_str(text).map_err(|e| Har2OapiError::input_parse(e.to_string()).into())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "These are unit tests")]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_entry() {
        let json = r#"
        {
          "log": {
            "version": "1.2",
            "entries": [
              {
                "startedDateTime": "2024-01-15T10:30:00.000Z",
                "time": 150.5,
                "request": {
                  "method": "GET",
                  "url": "https://api.example.com/users?page=2",
                  "httpVersion": "HTTP/1.1",
                  "headers": [{ "name": "Accept", "value": "application/json" }],
                  "queryString": [{ "name": "page", "value": "2" }]
                },
                "response": {
                  "status": 200,
                  "statusText": "OK",
                  "headers": [],
                  "content": { "size": 2, "mimeType": "application/json", "text": "[]" }
                }
              }
            ]
          }
        }
        "#;

        let har = parse_har(json).unwrap();
        let entry = &har.log.entries[0];

        assert_eq!(entry.request.method, "GET");
        assert_eq!(entry.request.query_string[0].name, "page");
        assert!(entry.response.as_ref().unwrap().is_success());
    }

    #[test]
    fn empty_log_is_valid() {
        let har = parse_har(r#"{"log":{"entries":[]}}"#).unwrap();
        assert!(har.log.entries.is_empty());
    }

    #[test]
    fn entry_without_response_is_kept() {
        let har =
            parse_har(r#"{"log":{"entries":[{"request":{"method":"GET","url":"http://a/"}}]}}"#)
                .unwrap();
        assert_eq!(har.log.entries[0].response, None);
    }

    #[test]
    fn non_json_is_a_parse_error() {
        let err = parse_har("not a har").unwrap_err();
        assert!(err.to_string().starts_with("Input parse error"));
    }

    #[test]
    fn missing_log_is_a_parse_error() {
        assert!(parse_har(r#"{"entries":[]}"#).is_err());
    }
}
