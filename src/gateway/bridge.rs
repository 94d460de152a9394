//! HTTP bridge gateway.
//!
//! Talks JSON to a sidecar process that owns the WhatsApp Web session.
//! The sidecar posts inbound events back to `/gateway/events`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{Gateway, GatewayError, GroupMetadata};

#[derive(Debug, Deserialize)]
struct SessionIdentity {
    id: Option<String>,
}

/// Gateway backed by the bridge REST API.
#[derive(Clone)]
pub struct BridgeGateway {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl BridgeGateway {
    /// Create a gateway for the bridge at `base_url`.
    ///
    /// # Errors
    /// Fails if the URL cannot carry path segments.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, GatewayError> {
        let base = Url::parse(base_url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, base, token })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Response, GatewayError> {
        let response = self.authorize(req).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::CONFLICT {
            return Err(GatewayError::NotConnected);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Gateway for BridgeGateway {
    async fn connect(&self) -> Result<(), GatewayError> {
        let url = self.endpoint(&["session", "connect"]);
        debug!("Requesting session connect at {}", url);
        self.execute(self.client.post(url)).await?;
        Ok(())
    }

    async fn send_text(
        &self,
        jid: &str,
        text: &str,
        quoted: Option<&str>,
        mentions: &[String],
    ) -> Result<(), GatewayError> {
        let body = json!({
            "jid": jid,
            "text": text,
            "quoted": quoted,
            "mentions": mentions,
        });
        let url = self.endpoint(&["messages", "text"]);
        self.execute(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn send_image(
        &self,
        jid: &str,
        image_url: &str,
        caption: Option<&str>,
        quoted: Option<&str>,
    ) -> Result<(), GatewayError> {
        let body = json!({
            "jid": jid,
            "imageUrl": image_url,
            "caption": caption,
            "quoted": quoted,
        });
        let url = self.endpoint(&["messages", "image"]);
        self.execute(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn group_metadata(&self, jid: &str) -> Result<GroupMetadata, GatewayError> {
        let url = self.endpoint(&["groups", jid]);
        let response = self.execute(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn self_id(&self) -> Result<String, GatewayError> {
        let url = self.endpoint(&["session", "me"]);
        let response = self.execute(self.client.get(url)).await?;
        let identity: SessionIdentity = response.json().await?;
        identity.id.ok_or(GatewayError::NotConnected)
    }
}
