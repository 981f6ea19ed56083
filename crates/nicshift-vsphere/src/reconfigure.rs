//! NIC migration workflow: resolve, build the edit, submit, await.

use crate::error::{VsphereError, VsphereResult};
use crate::inventory::ObjectResolver;
use crate::session::VimSession;
use crate::task::TaskMonitor;
use crate::types::{ConfigChangeSpec, NicChangeSpec, ObjectKind};

/// Moves one VM's network adapter onto an NSX logical switch.
pub struct ReconfigureWorkflow<'a> {
    session: &'a dyn VimSession,
}

impl<'a> ReconfigureWorkflow<'a> {
    pub fn new(session: &'a dyn VimSession) -> Self {
        Self { session }
    }

    /// Re-home `vm_name`'s first network adapter onto the logical
    /// switch named `network_name`, blocking until the reconfiguration
    /// task is terminal.
    ///
    /// A VM with no network adapter submits an empty device-change
    /// list, which vCenter accepts as a no-op.
    pub async fn migrate_vm_network(
        &self,
        vm_name: &str,
        network_name: &str,
    ) -> VsphereResult<()> {
        let resolver = ObjectResolver::new(self.session);

        let network = resolver
            .find(ObjectKind::Network, network_name)
            .await?
            .ok_or_else(|| {
                VsphereError::not_found(format!("network '{network_name}' not found"))
            })?;
        let opaque_id = self.session.opaque_network_id(&network).await?;

        let vm = resolver
            .find(ObjectKind::VirtualMachine, vm_name)
            .await?
            .ok_or_else(|| VsphereError::not_found(format!("VM '{vm_name}' not found")))?;

        let devices = self.session.vm_devices(&vm).await?;
        let mut device_change = Vec::new();
        if let Some(nic) = devices.iter().find(|d| d.is_network_adapter()) {
            log::debug!("editing '{}' (key {}) on {vm}", nic.label, nic.key);
            device_change.push(NicChangeSpec::edit_opaque_backing(&opaque_id));
        } else {
            log::debug!("no network adapter on {vm}; submitting empty device change");
        }

        let spec = ConfigChangeSpec { device_change };
        let reconfigure = self.session.reconfigure_vm(&vm, &spec).await?;
        TaskMonitor::new(self.session).await_all(&[reconfigure]).await
    }
}
