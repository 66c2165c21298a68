//! Management API implementation of [`HostControl`].
//!
//! Talks to the host's `/api/v2.0` REST surface with a bearer token on every
//! request and delegates waking to the [`crate::wol`] transport.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use powernap_core::{HostIdentity, Job};
use reqwest::{Client, StatusCode};

use crate::control::HostControl;
use crate::error::{QueryError, ShutdownError, WakeError};
use crate::wol;

/// Per-request timeout for the reachability probe. Kept short: the probe
/// runs inside the boot-wait loop and a hung probe would stall it.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Host controller backed by the management API.
#[derive(Debug, Clone)]
pub struct ApiHost {
    client: Client,
    base_url: String,
    identity: HostIdentity,
    broadcast: Option<Ipv4Addr>,
}

impl ApiHost {
    /// Create a controller for `identity`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn new(identity: HostIdentity) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(client, identity)
    }

    /// Create a controller with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client, identity: HostIdentity) -> Self {
        let base_url = format!("http://{}/api/v2.0", identity.address());
        Self {
            client,
            base_url,
            identity,
            broadcast: None,
        }
    }

    /// Override the broadcast address the magic packet is sent to.
    ///
    /// Needed when the monitor runs on a different segment than the host and
    /// the limited broadcast address would not be routed.
    #[must_use]
    pub fn with_broadcast(mut self, broadcast: Ipv4Addr) -> Self {
        self.broadcast = Some(broadcast);
        self
    }

    /// The API base URL this controller talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HostControl for ApiHost {
    async fn wake(&self) -> Result<(), WakeError> {
        tracing::info!(mac = %self.identity.mac(), "Broadcasting wake-on-lan magic packet");
        wol::send_magic_packet(self.identity.mac(), self.broadcast)
    }

    async fn probe_reachable(&self) -> bool {
        let url = format!("{}/system/info", self.base_url);

        let result = self
            .client
            .get(&url)
            .bearer_auth(self.identity.api_key())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::debug!(
                    status = %resp.status(),
                    "Reachability probe answered with non-success status"
                );
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "Reachability probe failed");
                false
            }
        }
    }

    async fn list_active_work(&self) -> Result<Vec<Job>, QueryError> {
        let url = format!("{}/core/get_jobs", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("state", "RUNNING")])
            .bearer_auth(self.identity.api_key())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(QueryError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(QueryError::Api {
                status: status.as_u16(),
            });
        }

        let jobs: Vec<Job> = response
            .json()
            .await
            .map_err(|e| QueryError::Parse(e.to_string()))?;

        Ok(jobs)
    }

    async fn request_shutdown(&self) -> Result<(), ShutdownError> {
        let url = format!("{}/system/shutdown", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.identity.api_key())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShutdownError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!("Shutdown request acknowledged by host");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powernap_core::MacAddr;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mac() -> MacAddr {
        "aa:bb:cc:00:11:22".parse().unwrap()
    }

    async fn host_for(server: &MockServer) -> ApiHost {
        let identity = HostIdentity::new(server.address().to_string(), mac(), "test-key").unwrap();
        ApiHost::new(identity)
    }

    #[test]
    fn base_url_includes_api_prefix() {
        let identity = HostIdentity::new("192.168.1.40", mac(), "test-key").unwrap();
        let host = ApiHost::new(identity);
        assert_eq!(host.base_url(), "http://192.168.1.40/api/v2.0");
    }

    #[tokio::test]
    async fn probe_true_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2.0/system/info"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "25.04"})))
            .mount(&server)
            .await;

        assert!(host_for(&server).await.probe_reachable().await);
    }

    #[tokio::test]
    async fn probe_false_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2.0/system/info"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!host_for(&server).await.probe_reachable().await);
    }

    #[tokio::test]
    async fn probe_false_when_unreachable() {
        // Port 1 on loopback; nothing listens there.
        let identity = HostIdentity::new("127.0.0.1:1", mac(), "test-key").unwrap();
        let host = ApiHost::new(identity);
        assert!(!host.probe_reachable().await);
    }

    #[tokio::test]
    async fn list_active_work_returns_jobs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2.0/core/get_jobs"))
            .and(query_param("state", "RUNNING"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "method": "pool.scrub.scrub", "state": "RUNNING"},
                {"id": 2, "method": "replication.run", "state": "RUNNING"}
            ])))
            .mount(&server)
            .await;

        let jobs = host_for(&server).await.list_active_work().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].method, "pool.scrub.scrub");
    }

    #[tokio::test]
    async fn list_active_work_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2.0/core/get_jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let jobs = host_for(&server).await.list_active_work().await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn list_active_work_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2.0/core/get_jobs"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = host_for(&server).await.list_active_work().await.unwrap_err();
        assert!(err.is_auth());
        assert!(matches!(err, QueryError::Auth { status: 401 }));
    }

    #[tokio::test]
    async fn list_active_work_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2.0/core/get_jobs"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = host_for(&server).await.list_active_work().await.unwrap_err();
        assert!(matches!(err, QueryError::Api { status: 500 }));
        assert!(!err.is_auth());
    }

    #[tokio::test]
    async fn list_active_work_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2.0/core/get_jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = host_for(&server).await.list_active_work().await.unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
    }

    #[tokio::test]
    async fn request_shutdown_acknowledged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2.0/system/shutdown"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        host_for(&server).await.request_shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn request_shutdown_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2.0/system/shutdown"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = host_for(&server).await.request_shutdown().await.unwrap_err();
        assert!(matches!(err, ShutdownError::Rejected { status: 503 }));
    }
}
