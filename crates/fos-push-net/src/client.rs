//! API Client
//!
//! Sends JSON to the push service and parses JSON replies. Any status outside
//! 2xx is a failure.

use std::rc::Rc;

use serde_json::Value;
use url::Url;

use crate::{HttpTransport, Method, NetError, Request};

/// Client for the push service REST API
pub struct ApiClient {
    base: Url,
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    /// Create a client rooted at `base`
    pub fn new(base: &str, transport: Rc<dyn HttpTransport>) -> Result<Self, NetError> {
        // Relative joins only keep the last segment when it ends in a slash
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&base).map_err(|e| NetError::InvalidUrl(format!("{}: {}", base, e)))?;
        Ok(Self { base, transport })
    }

    /// Base URL
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a resource path against the base URL
    pub fn url_for(&self, path: &str) -> Result<Url, NetError> {
        self.base
            .join(path)
            .map_err(|e| NetError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Send a request and parse the JSON reply
    pub async fn send(&self, path: &str, method: Method, body: Option<&Value>) -> Result<Value, NetError> {
        let url = self.url_for(path)?;
        let mut request = Request::new(method, url.as_str());
        if let Some(body) = body {
            request = request.with_json(body);
        }

        tracing::debug!("HTTP {} {}", method, url);

        let response = self.transport.send(request).await?;
        if !response.ok() {
            return Err(NetError::HttpError { status: response.status });
        }

        let json = response.json()?;
        tracing::debug!("HTTP {} {} -> {}", method, url, json);
        Ok(json)
    }

    /// Send a request, logging and dropping any failure
    pub async fn request(&self, path: &str, method: Method, body: Option<&Value>) -> Option<Value> {
        match self.send(path, method, body).await {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!("Request failed: {} {}: {}", method, path, e);
                None
            }
        }
    }
}
