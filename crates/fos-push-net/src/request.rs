//! Request model

use std::collections::HashMap;

/// HTTP method used by the push service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request configuration
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a JSON body
    pub fn with_json(self, json: &serde_json::Value) -> Self {
        self.with_header("Content-Type", "application/json;charset=UTF-8")
            .with_body(json.to_string().into_bytes())
    }

    /// Decode the body back into JSON
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_slice(b).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_with_json() {
        let req = Request::new(Method::Post, "https://api.example.com/players")
            .with_json(&json!({"app_id": "a"}));

        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.headers.get("Content-Type").unwrap(),
            "application/json;charset=UTF-8"
        );
        assert_eq!(req.json_body().unwrap()["app_id"], "a");
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Put.to_string(), "PUT");
    }
}
