//! vCenter HTTP client with session-based authentication.
//!
//! Communicates with vCenter via `https://{host}/api/...`, manages the
//! session lifecycle (create / delete) and implements [`VimSession`]
//! over REST-style property-collector and container-view endpoints.

use crate::error::{VsphereError, VsphereErrorKind, VsphereResult};
use crate::session::*;
use crate::types::*;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// vCenter API client. One instance per authenticated session.
pub struct VsphereClient {
    client: Client,
    base_url: String,
    session_id: Option<String>,
    config: VsphereConfig,
}

impl VsphereClient {
    /// Build a new client from config (does NOT create a session yet).
    ///
    /// No global reqwest timeout is set: the update long-poll blocks
    /// until the server has data. `config.timeout_secs` is applied per
    /// request to everything else.
    pub fn new(config: &VsphereConfig) -> VsphereResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| VsphereError::connection(format!("Failed to build HTTP client: {e}")))?;

        let base_url = format!("https://{}:{}", config.host, config.port);

        Ok(Self {
            client,
            base_url,
            session_id: None,
            config: config.clone(),
        })
    }

    /// Whether we have an active session.
    pub fn is_connected(&self) -> bool {
        self.session_id.is_some()
    }

    /// Current session ID (if any).
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    // ── Session management ──────────────────────────────────────────

    /// Create a new API session (POST /api/session).
    pub async fn login(&mut self) -> VsphereResult<String> {
        let url = format!("{}/api/session", self.base_url);

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .timeout(self.request_timeout())
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(VsphereError::auth("Invalid credentials"));
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VsphereError::api(
                status.as_u16(),
                format!("Login failed: {body}"),
            ));
        }

        // Session ID comes back as a quoted JSON string
        let session_id: String = resp.json().await.map_err(|e| {
            VsphereError::parse(format!("Failed to parse session response: {e}"))
        })?;

        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    /// Delete the current session (DELETE /api/session).
    pub async fn logout(&mut self) -> VsphereResult<()> {
        if let Some(ref sid) = self.session_id {
            let url = format!("{}/api/session", self.base_url);
            let _ = self
                .client
                .delete(&url)
                .header("vmware-api-session-id", sid.as_str())
                .timeout(self.request_timeout())
                .send()
                .await;
        }
        self.session_id = None;
        Ok(())
    }

    // ── HTTP helpers ────────────────────────────────────────────────

    fn require_session(&self) -> VsphereResult<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| VsphereError::auth("Not logged in — no active session"))
    }

    /// GET a JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> VsphereResult<T> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header("vmware-api-session-id", sid)
            .timeout(self.request_timeout())
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_response(resp).await
    }

    /// POST with JSON body, return parsed response.
    pub async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> VsphereResult<T> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("vmware-api-session-id", sid)
            .timeout(self.request_timeout())
            .json(body)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_response(resp).await
    }

    /// POST with JSON body and no request timeout: suspends until the
    /// server responds. Used only for the update long-poll.
    async fn post_longpoll<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> VsphereResult<T> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("vmware-api-session-id", sid)
            .json(body)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_response(resp).await
    }

    /// DELETE, ignoring response body.
    pub async fn delete(&self, path: &str) -> VsphereResult<()> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .delete(&url)
            .header("vmware-api-session-id", sid)
            .timeout(self.request_timeout())
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn check_status(resp: Response) -> VsphereResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let code = status.as_u16();
        let body = resp.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => {
                Err(VsphereError::auth(format!("Session expired or invalid: {body}")))
            }
            StatusCode::FORBIDDEN => Err(VsphereError::new(
                VsphereErrorKind::Other,
                format!("Access denied: {body}"),
            )),
            StatusCode::NOT_FOUND => {
                Err(VsphereError::not_found(format!("Resource not found: {body}")))
            }
            _ => Err(VsphereError::api(code, format!("API error {code}: {body}"))),
        }
    }

    async fn parse_response<T: DeserializeOwned>(resp: Response) -> VsphereResult<T> {
        let text = resp.text().await.map_err(|e| {
            VsphereError::parse(format!("Failed to read response body: {e}"))
        })?;

        if text.is_empty() {
            // Some vCenter endpoints return empty body for success
            return serde_json::from_str("null").map_err(|e| {
                VsphereError::parse(format!("Cannot deserialise empty response: {e}"))
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            VsphereError::parse(format!(
                "JSON parse error: {e} — body: {}",
                &text[..text.len().min(500)]
            ))
        })
    }
}

// ── Wire bodies ─────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct CreateViewBody<'a> {
    r#type: &'a str,
    recursive: bool,
}

#[derive(serde::Serialize)]
struct CreateFilterBody<'a> {
    tasks: Vec<&'a str>,
}

#[derive(serde::Serialize)]
struct WaitBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct Created {
    value: String,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkDetail {
    #[serde(default)]
    opaque_network_id: Option<String>,
}

#[async_trait::async_trait]
impl VimSession for VsphereClient {
    async fn create_container_view(&self, kind: ObjectKind) -> VsphereResult<ViewHandle> {
        let body = CreateViewBody { r#type: kind.as_str(), recursive: true };
        let resp: Created = self.post("/api/vcenter/view/container", &body).await?;
        Ok(ViewHandle(resp.value))
    }

    async fn view_contents(&self, view: &ViewHandle) -> VsphereResult<Vec<InventoryItem>> {
        let path = format!("/api/vcenter/view/container/{}", view.0);
        self.get::<Vec<InventoryItem>>(&path).await
    }

    async fn destroy_view(&self, view: ViewHandle) -> VsphereResult<()> {
        let path = format!("/api/vcenter/view/container/{}", view.0);
        self.delete(&path).await
    }

    async fn create_task_filter(
        &self,
        tasks: &[ManagedObjectRef],
    ) -> VsphereResult<FilterHandle> {
        let body = CreateFilterBody { tasks: tasks.iter().map(|t| t.id.as_str()).collect() };
        let resp: Created = self
            .post("/api/vcenter/property-collector/filter", &body)
            .await?;
        Ok(FilterHandle(resp.value))
    }

    async fn wait_for_updates(&self, version: Option<&str>) -> VsphereResult<UpdateSet> {
        let body = WaitBody { version };
        self.post_longpoll("/api/vcenter/property-collector/update", &body)
            .await
    }

    async fn destroy_filter(&self, filter: FilterHandle) -> VsphereResult<()> {
        let path = format!("/api/vcenter/property-collector/filter/{}", filter.0);
        self.delete(&path).await
    }

    async fn opaque_network_id(&self, network: &ManagedObjectRef) -> VsphereResult<String> {
        let path = format!("/api/vcenter/network/{}", network.id);
        let detail: NetworkDetail = self.get(&path).await?;
        detail.opaque_network_id.ok_or_else(|| {
            VsphereError::not_found(format!(
                "network {} has no opaque network id (not an NSX logical switch)",
                network.id
            ))
        })
    }

    async fn vm_devices(&self, vm: &ManagedObjectRef) -> VsphereResult<Vec<VirtualDevice>> {
        let path = format!("/api/vcenter/vm/{}/hardware/device", vm.id);
        self.get::<Vec<VirtualDevice>>(&path).await
    }

    async fn reconfigure_vm(
        &self,
        vm: &ManagedObjectRef,
        spec: &ConfigChangeSpec,
    ) -> VsphereResult<ManagedObjectRef> {
        let path = format!("/api/vcenter/vm/{}?action=reconfigure", vm.id);
        let resp: Created = self.post(&path, spec).await?;
        Ok(ManagedObjectRef::new(ObjectKind::Task, resp.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_without_session_refuses_calls() {
        let client = VsphereClient::new(&VsphereConfig {
            host: "vcenter.lab.local".into(),
            username: "administrator@vsphere.local".into(),
            password: "secret".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(!client.is_connected());
        assert!(client.session_id().is_none());
        let err = client.require_session().unwrap_err();
        assert!(matches!(err.kind, VsphereErrorKind::AuthenticationError));
    }

    fn response_with_status(status: u16, body: &'static str) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn status_mapping_401_is_auth_error() {
        let err = VsphereClient::check_status(response_with_status(401, "expired"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, VsphereErrorKind::AuthenticationError));
        assert!(err.message.contains("expired"));
    }

    #[tokio::test]
    async fn status_mapping_404_is_not_found() {
        let err = VsphereClient::check_status(response_with_status(404, "no such vm"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, VsphereErrorKind::NotFound));
    }

    #[tokio::test]
    async fn status_mapping_other_carries_the_code() {
        let err = VsphereClient::check_status(response_with_status(500, "internal"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, VsphereErrorKind::ApiError(500)));
        assert!(err.message.contains("internal"));
    }

    #[tokio::test]
    async fn status_mapping_success_passes_through() {
        let resp = VsphereClient::check_status(response_with_status(200, "[]"))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
    }

    #[test]
    fn wire_bodies_serialize() {
        let body = CreateViewBody { r#type: ObjectKind::Network.as_str(), recursive: true };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "Network");
        assert_eq!(json["recursive"], true);

        let none = serde_json::to_value(WaitBody { version: None }).unwrap();
        assert!(none.get("version").is_none());
        let some = serde_json::to_value(WaitBody { version: Some("v7") }).unwrap();
        assert_eq!(some["version"], "v7");
    }
}
