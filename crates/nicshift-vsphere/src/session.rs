//! Session capability trait: everything the migration workflow needs
//! from a live vCenter connection.
//!
//! The concrete implementation is the HTTP client in [`crate::client`];
//! tests inject in-memory fakes. Implementations must be `Send + Sync`
//! so a session can be shared by reference across async calls.

use crate::error::VsphereResult;
use crate::types::*;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Server-side resource handles
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Handle to a server-side container view. Must be destroyed after use;
/// leaked views accumulate on vCenter across repeated invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewHandle(pub String);

/// Handle to a server-side property-collector filter (one per
/// `TaskMonitor::await_all` call). Same destroy-after-use discipline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterHandle(pub String);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Update feed
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One property change on one object: `(name, new value)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    pub name: String,
    pub value: serde_json::Value,
}

/// All changes for one object in an update batch. Changes are in-order
/// per object; the feed may also report objects outside any filter a
/// caller registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectUpdate {
    pub object: ManagedObjectRef,
    pub changes: Vec<PropertyChange>,
}

/// One batch from the change-notification feed. `version` is opaque and
/// passed back on the next wait call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSet {
    pub version: String,
    pub updates: Vec<ObjectUpdate>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Session trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Capability handle over an authenticated vCenter session.
#[async_trait::async_trait]
pub trait VimSession: Send + Sync {
    // ── Inventory views ────────────────────────────────────────────

    /// Create a recursive container view over all objects of `kind`,
    /// rooted at the inventory root.
    async fn create_container_view(&self, kind: ObjectKind) -> VsphereResult<ViewHandle>;

    /// Enumerate the contents of a view, in server enumeration order.
    async fn view_contents(&self, view: &ViewHandle) -> VsphereResult<Vec<InventoryItem>>;

    /// Destroy a container view.
    async fn destroy_view(&self, view: ViewHandle) -> VsphereResult<()>;

    // ── Task change-notification feed ──────────────────────────────

    /// Register a property-collector filter scoped to exactly `tasks`.
    /// The tracked set is fixed at creation time.
    async fn create_task_filter(&self, tasks: &[ManagedObjectRef]) -> VsphereResult<FilterHandle>;

    /// Block until the server has new data, then return the next update
    /// batch. `version` is the token from the previous batch (None on
    /// the first call). This call has no timeout.
    async fn wait_for_updates(&self, version: Option<&str>) -> VsphereResult<UpdateSet>;

    /// Destroy a property-collector filter.
    async fn destroy_filter(&self, filter: FilterHandle) -> VsphereResult<()>;

    // ── Object reads ───────────────────────────────────────────────

    /// Read the opaque network id of a resolved network object.
    async fn opaque_network_id(&self, network: &ManagedObjectRef) -> VsphereResult<String>;

    /// Read a VM's virtual hardware device list.
    async fn vm_devices(&self, vm: &ManagedObjectRef) -> VsphereResult<Vec<VirtualDevice>>;

    // ── Mutations ──────────────────────────────────────────────────

    /// Submit a reconfiguration and return the task tracking it.
    async fn reconfigure_vm(
        &self,
        vm: &ManagedObjectRef,
        spec: &ConfigChangeSpec,
    ) -> VsphereResult<ManagedObjectRef>;
}
