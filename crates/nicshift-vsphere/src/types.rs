//! Shared types for the vSphere NIC-migration crate.

use serde::{Deserialize, Serialize};

/// Device key assigned to the edited network adapter.
pub const NIC_DEVICE_KEY: i32 = 4000;

/// Backing type for an opaque (NSX logical switch) network.
pub const OPAQUE_NETWORK_TYPE: &str = "nsx.LogicalSwitch";

/// Address type set on the edited adapter.
pub const ADDRESS_TYPE_ASSIGNED: &str = "assigned";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Connection / Config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Top-level configuration for connecting to a vCenter host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereConfig {
    /// vCenter hostname / IP (e.g. "vcenter.lab.local")
    pub host: String,
    /// Port (default 443)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username (e.g. "administrator@vsphere.local")
    pub username: String,
    /// Password
    pub password: String,
    /// Skip TLS certificate verification (self-signed labs)
    #[serde(default)]
    pub insecure: bool,
    /// Request timeout in seconds; the update long-poll is exempt
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 { 443 }
fn default_timeout() -> u64 { 30 }

impl Default for VsphereConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            port: 443,
            insecure: false,
            timeout_secs: 30,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Managed objects
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Kinds of managed objects this crate resolves or tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    VirtualMachine,
    Network,
    Task,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::VirtualMachine => "VirtualMachine",
            ObjectKind::Network => "Network",
            ObjectKind::Task => "Task",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to a managed object on vCenter.
///
/// Identity is the platform-assigned id (e.g. "vm-42", "network-7",
/// "task-1001"), never the display name. The reference is only valid
/// within the session that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ManagedObjectRef {
    pub kind: ObjectKind,
    pub id: String,
}

impl ManagedObjectRef {
    pub fn new(kind: ObjectKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl std::fmt::Display for ManagedObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// One entry of a container-view enumeration: id + display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tasks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lifecycle states of a submitted vCenter task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Queued,
    Running,
    Success,
    Error,
}

impl TaskState {
    /// Success and Error are terminal; the task never transitions again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Success | TaskState::Error)
    }
}

/// Authoritative task snapshot delivered by an `"info"` notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub state: TaskState,
    #[serde(default)]
    pub error: Option<TaskFaultInfo>,
}

/// Fault reported by vCenter for a task in its Error terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFaultInfo {
    #[serde(default)]
    pub localized_message: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Virtual hardware
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Known virtual device kinds on a VM's hardware list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceKind {
    E1000,
    E1000e,
    Vmxnet3,
    Pcnet32,
    Disk,
    Cdrom,
    Floppy,
    ScsiController,
    SataController,
    UsbController,
    #[serde(other)]
    Unknown,
}

impl DeviceKind {
    /// Whether the device is a network-adapter variant. Concrete NIC
    /// models are interchangeable for migration purposes.
    pub fn is_network_adapter(&self) -> bool {
        matches!(
            self,
            DeviceKind::E1000 | DeviceKind::E1000e | DeviceKind::Vmxnet3 | DeviceKind::Pcnet32
        )
    }
}

/// One device on a VM's hardware list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDevice {
    pub key: i32,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    #[serde(default)]
    pub label: String,
}

impl VirtualDevice {
    pub fn is_network_adapter(&self) -> bool {
        self.kind.is_network_adapter()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Reconfiguration specs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Device-change operation selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceOperation {
    Add,
    Edit,
    Remove,
}

/// Opaque-network backing for an edited adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicBackingSpec {
    pub opaque_network_type: String,
    pub opaque_network_id: String,
}

/// Connectivity flags for an edited adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectableSpec {
    pub start_connected: bool,
    pub connected: bool,
    pub allow_guest_control: bool,
}

/// One edit to a VM's network adapter. Built fresh per VM, never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicChangeSpec {
    pub operation: DeviceOperation,
    pub device_key: i32,
    pub wake_on_lan_enabled: bool,
    pub address_type: String,
    pub backing: NicBackingSpec,
    pub connectable: ConnectableSpec,
    pub summary: String,
}

impl NicChangeSpec {
    /// Edit spec re-homing an adapter onto the opaque network `opaque_id`.
    /// The edited adapter always gets the fixed [`NIC_DEVICE_KEY`].
    pub fn edit_opaque_backing(opaque_id: &str) -> Self {
        Self {
            operation: DeviceOperation::Edit,
            device_key: NIC_DEVICE_KEY,
            wake_on_lan_enabled: true,
            address_type: ADDRESS_TYPE_ASSIGNED.to_string(),
            backing: NicBackingSpec {
                opaque_network_type: OPAQUE_NETWORK_TYPE.to_string(),
                opaque_network_id: opaque_id.to_string(),
            },
            connectable: ConnectableSpec {
                start_connected: true,
                connected: true,
                allow_guest_control: true,
            },
            summary: format!("{OPAQUE_NETWORK_TYPE}: {opaque_id}"),
        }
    }
}

/// Reconfiguration request body: the device-change list.
///
/// May legitimately be empty — a VM with no network adapter submits an
/// empty edit, which vCenter accepts as a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigChangeSpec {
    pub device_change: Vec<NicChangeSpec>,
}
