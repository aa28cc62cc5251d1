//! Async HTTP client for the protogen web server.
//!
//! The client maps a small set of generic operations (list, get, set,
//! create, delete, trigger) onto the endpoint catalogue. Every call is a
//! single request with the configured timeout; nothing is retried here.
//! Retrying is the sync loop's job, on its next tick.

use super::decode::{body_to_string, decode_flag, decode_list, decode_number, decode_text};
use super::endpoints::{Endpoint, API_ROOT};
use crate::config::PanelConfig;
use crate::error::{PanelError, PanelResult};
use crate::resource::{ResourceCategory, ResourceId};
use reqwest::{Client, Method, Url};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ProtogenClient {
    client: Client,
    base_url: Url,
    pub(crate) sort_apps: bool,
}

impl ProtogenClient {
    pub fn new(config: &PanelConfig) -> PanelResult<Self> {
        let mut client = Self::with_base_url(&config.base_url, config.request_timeout())?;
        client.sort_apps = config.sort_apps;
        Ok(client)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> PanelResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PanelError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PanelError::Config(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PanelError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            sort_apps: true,
        })
    }

    /// Get the base URL of the protogen web server
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint, with identifier segments percent-encoded
    pub fn url_for(&self, endpoint: &Endpoint) -> PanelResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                PanelError::Config(format!("Base URL '{}' cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty().push(API_ROOT).extend(endpoint.segments());
            if let Some(file) = endpoint.file_name() {
                segments.push(&file);
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &Endpoint,
        body: Option<&str>,
    ) -> PanelResult<String> {
        let url = self.url_for(endpoint)?;
        let path = endpoint.display_path();
        tracing::debug!(%method, %path, "request");

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(|e| {
            tracing::debug!(%method, %path, error = %e, "request failed");
            PanelError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "backend error");
            return Err(PanelError::Backend {
                status: status.as_u16(),
                path,
            });
        }

        let bytes = response.bytes().await?;
        body_to_string(&bytes, &path)
    }

    /// GET a newline-delimited list of identifiers for a category
    pub async fn list_resources(&self, category: ResourceCategory) -> PanelResult<Vec<ResourceId>> {
        self.get_list(&Endpoint::list(category)).await
    }

    pub async fn get_list(&self, endpoint: &Endpoint) -> PanelResult<Vec<ResourceId>> {
        let body = self.send(Method::GET, endpoint, None).await?;
        Ok(decode_list(&body))
    }

    /// GET a field as text; the caller picks the decoding
    pub async fn get_field(&self, endpoint: &Endpoint) -> PanelResult<String> {
        let body = self.send(Method::GET, endpoint, None).await?;
        Ok(decode_text(&body))
    }

    pub async fn get_flag(&self, endpoint: &Endpoint) -> PanelResult<bool> {
        let body = self.send(Method::GET, endpoint, None).await?;
        Ok(decode_flag(&body))
    }

    pub async fn get_number(&self, endpoint: &Endpoint) -> PanelResult<f64> {
        let body = self.send(Method::GET, endpoint, None).await?;
        decode_number(&body)
    }

    /// PUT a raw value as the request body
    pub async fn set_field(&self, endpoint: &Endpoint, value: &str) -> PanelResult<()> {
        self.send(Method::PUT, endpoint, Some(value)).await?;
        Ok(())
    }

    pub async fn create_resource(&self, endpoint: &Endpoint) -> PanelResult<()> {
        self.send(Method::PUT, endpoint, None).await?;
        Ok(())
    }

    pub async fn delete_resource(&self, endpoint: &Endpoint) -> PanelResult<()> {
        self.send(Method::DELETE, endpoint, None).await?;
        Ok(())
    }

    /// POST a stateless command, optionally with a payload
    pub async fn trigger_action(
        &self,
        endpoint: &Endpoint,
        payload: Option<&str>,
    ) -> PanelResult<()> {
        self.send(Method::POST, endpoint, payload).await?;
        Ok(())
    }
}
