use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Method, Request, StatusCode};
use hyper_tls::HttpsConnector;
use tokio::time::timeout;
use tracing::{debug, trace};

use airfog_domain::record::RelayRecord;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};

/// Transport seam between the coordinator and the backend. The real
/// implementation talks HTTP; tests substitute a recording double.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Authenticated read of the most recent record the backend holds.
    async fn fetch_latest(&self) -> Result<RelayRecord>;

    /// Authenticated write of one record. Single best-effort attempt,
    /// no caching, no retry.
    async fn submit(&self, record: &RelayRecord) -> Result<()>;
}

pub struct RelayClient {
    client: hyper::Client<HttpsConnector<HttpConnector>>,
    config: RelayConfig,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> RelayClient {
        let client = hyper::Client::builder().build(HttpsConnector::new());
        RelayClient { client, config }
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Vec<u8>)> {
        let response = timeout(self.config.timeout, self.client.request(request))
            .await
            .map_err(|_| RelayError::Timeout)?
            .map_err(|e| RelayError::Transport(Box::new(e)))?;
        let status = response.status();
        let body = timeout(self.config.timeout, hyper::body::to_bytes(response.into_body()))
            .await
            .map_err(|_| RelayError::Timeout)?
            .map_err(|e| RelayError::Transport(Box::new(e)))?;
        trace!(%status, bytes = body.len(), "relay response");
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl RelayTransport for RelayClient {
    async fn fetch_latest(&self) -> Result<RelayRecord> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.config.endpoint.clone())
            .header("x-api-key", &self.config.api_key)
            .body(Body::empty())
            .map_err(|e| RelayError::Transport(Box::new(e)))?;

        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(RelayError::RemoteRejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        serde_json::from_slice(&body).map_err(RelayError::Decode)
    }

    async fn submit(&self, record: &RelayRecord) -> Result<()> {
        let json = serde_json::to_vec(record).map_err(RelayError::Serialize)?;
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.config.endpoint.clone())
            .header("x-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .body(Body::from(json))
            .map_err(|e| RelayError::Transport(Box::new(e)))?;

        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(RelayError::RemoteRejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        debug!(device_id = %record.device_id, "record relayed");
        Ok(())
    }
}
