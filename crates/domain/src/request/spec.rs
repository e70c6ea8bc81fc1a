//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{HttpMethod, QueryParam, QueryParams, RequestBody};
use crate::error::{DomainError, DomainResult};

/// A request against the API, expressed relative to the base URL.
///
/// `path` always starts with `/` and is appended verbatim to the base URL,
/// so a base of `https://host/api` and a path of `/goals` resolve to
/// `https://host/api/goals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL.
    pub path: String,
    /// Query string parameters.
    #[serde(default)]
    pub query: QueryParams,
    /// Request body.
    #[serde(default)]
    pub body: RequestBody,
}

impl RequestSpec {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            method,
            path,
            query: QueryParams::new(),
            body: RequestBody::none(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.add(QueryParam::new(key, value.to_string()));
        self
    }

    /// Sets a JSON body (builder pattern).
    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::json(body);
        self
    }

    /// Serializes `payload` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] if the payload cannot be encoded.
    pub fn with_payload<T: Serialize>(self, payload: &T) -> DomainResult<Self> {
        let value =
            serde_json::to_value(payload).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        Ok(self.with_json(value))
    }

    /// Resolves the full URL against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the result is not a valid URL.
    pub fn full_url(&self, base_url: &str) -> DomainResult<Url> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        Ok(url)
    }

    /// Short description used in log lines, e.g. `PUT /entries/2025-06-01/calls`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_full_url_keeps_base_path() {
        let request = RequestSpec::get("/goals");
        let url = request.full_url("https://kpi.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://kpi.example.com/api/goals");
    }

    #[test]
    fn test_full_url_with_trailing_slash_base() {
        let request = RequestSpec::get("/");
        let url = request.full_url("http://localhost:8001/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/api/");
    }

    #[test]
    fn test_full_url_with_query() {
        let request = RequestSpec::put("/entries/2025-06-01/calls").with_query("calls_received", 100);
        let url = request.full_url("http://localhost:8001/api").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8001/api/entries/2025-06-01/calls?calls_received=100"
        );
    }

    #[test]
    fn test_path_gets_leading_slash() {
        let request = RequestSpec::get("periods");
        assert_eq!(request.path, "/periods");
    }

    #[test]
    fn test_invalid_base_url() {
        let request = RequestSpec::get("/goals");
        assert!(matches!(
            request.full_url("not a url"),
            Err(DomainError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_with_payload() {
        #[derive(Serialize)]
        struct Payload {
            amount: f64,
        }

        let request = RequestSpec::post("/entries/2025-06-01/misc")
            .with_payload(&Payload { amount: 25.0 })
            .unwrap();
        assert_eq!(request.body, RequestBody::json(json!({"amount": 25.0})));
        assert_eq!(request.describe(), "POST /entries/2025-06-01/misc");
    }
}
