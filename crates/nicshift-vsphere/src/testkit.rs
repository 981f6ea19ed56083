//! Scripted in-memory [`VimSession`] for unit tests.
//!
//! Inventory, opaque ids, device lists and update batches are seeded
//! up front with builder methods; server-side resource churn is
//! counted so tests can assert release discipline.

use crate::error::{VsphereError, VsphereResult};
use crate::session::*;
use crate::types::*;

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Update batch reporting `task_id` as succeeded.
pub fn success_update(task_id: &str) -> UpdateSet {
    UpdateSet {
        version: format!("v-{task_id}"),
        updates: vec![ObjectUpdate {
            object: ManagedObjectRef::new(ObjectKind::Task, task_id),
            changes: vec![PropertyChange {
                name: "info.state".into(),
                value: serde_json::json!("success"),
            }],
        }],
    }
}

/// Update batch reporting `task_id` as failed with `message`.
pub fn error_update(task_id: &str, message: &str) -> UpdateSet {
    UpdateSet {
        version: format!("v-{task_id}"),
        updates: vec![ObjectUpdate {
            object: ManagedObjectRef::new(ObjectKind::Task, task_id),
            changes: vec![PropertyChange {
                name: "info".into(),
                value: serde_json::json!({
                    "state": "error",
                    "error": { "localizedMessage": message },
                }),
            }],
        }],
    }
}

#[derive(Default)]
pub struct FakeSession {
    inventory: Mutex<HashMap<ObjectKind, Vec<InventoryItem>>>,
    opaque_ids: Mutex<HashMap<String, String>>,
    devices: Mutex<HashMap<String, Vec<VirtualDevice>>>,
    updates: Mutex<VecDeque<UpdateSet>>,
    submitted: Mutex<Vec<(String, ConfigChangeSpec)>>,

    open_views: Mutex<HashMap<String, ObjectKind>>,
    last_filter: Mutex<Vec<String>>,
    wait_versions: Mutex<Vec<Option<String>>>,

    view_contents_error: Mutex<Option<String>>,
    wait_error: Mutex<Option<String>>,

    views_created: AtomicUsize,
    views_destroyed: AtomicUsize,
    filters_created: AtomicUsize,
    filters_destroyed: AtomicUsize,
    waits_served: AtomicUsize,
    tasks_submitted: AtomicUsize,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ────────────────────────────────────────────────────

    pub fn with_inventory(self, kind: ObjectKind, items: &[(&str, &str)]) -> Self {
        self.inventory.lock().unwrap().entry(kind).or_default().extend(
            items
                .iter()
                .map(|(name, id)| InventoryItem { id: id.to_string(), name: name.to_string() }),
        );
        self
    }

    pub fn with_opaque_id(self, network_id: &str, opaque_id: &str) -> Self {
        self.opaque_ids
            .lock()
            .unwrap()
            .insert(network_id.to_string(), opaque_id.to_string());
        self
    }

    pub fn with_devices(self, vm_id: &str, devices: Vec<VirtualDevice>) -> Self {
        self.devices.lock().unwrap().insert(vm_id.to_string(), devices);
        self
    }

    pub fn with_updates(self, batch: UpdateSet) -> Self {
        self.updates.lock().unwrap().push_back(batch);
        self
    }

    pub fn fail_view_contents(self, message: &str) -> Self {
        *self.view_contents_error.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn fail_wait_for_updates(self, message: &str) -> Self {
        *self.wait_error.lock().unwrap() = Some(message.to_string());
        self
    }

    // ── Assertions ─────────────────────────────────────────────────

    pub fn views_created(&self) -> usize {
        self.views_created.load(Ordering::SeqCst)
    }

    pub fn views_destroyed(&self) -> usize {
        self.views_destroyed.load(Ordering::SeqCst)
    }

    pub fn filters_created(&self) -> usize {
        self.filters_created.load(Ordering::SeqCst)
    }

    pub fn filters_destroyed(&self) -> usize {
        self.filters_destroyed.load(Ordering::SeqCst)
    }

    pub fn waits_served(&self) -> usize {
        self.waits_served.load(Ordering::SeqCst)
    }

    pub fn last_filter_tasks(&self) -> Vec<String> {
        self.last_filter.lock().unwrap().clone()
    }

    pub fn wait_versions(&self) -> Vec<Option<String>> {
        self.wait_versions.lock().unwrap().clone()
    }

    pub fn submitted_specs(&self) -> Vec<(String, ConfigChangeSpec)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VimSession for FakeSession {
    async fn create_container_view(&self, kind: ObjectKind) -> VsphereResult<ViewHandle> {
        let n = self.views_created.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("view-{n}");
        self.open_views.lock().unwrap().insert(id.clone(), kind);
        Ok(ViewHandle(id))
    }

    async fn view_contents(&self, view: &ViewHandle) -> VsphereResult<Vec<InventoryItem>> {
        if let Some(msg) = self.view_contents_error.lock().unwrap().clone() {
            return Err(VsphereError::api(500, msg));
        }
        let kind = self
            .open_views
            .lock()
            .unwrap()
            .get(&view.0)
            .copied()
            .ok_or_else(|| VsphereError::not_found(format!("no such view {}", view.0)))?;
        Ok(self
            .inventory
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn destroy_view(&self, view: ViewHandle) -> VsphereResult<()> {
        self.open_views.lock().unwrap().remove(&view.0);
        self.views_destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_task_filter(
        &self,
        tasks: &[ManagedObjectRef],
    ) -> VsphereResult<FilterHandle> {
        let n = self.filters_created.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_filter.lock().unwrap() = tasks.iter().map(|t| t.id.clone()).collect();
        Ok(FilterHandle(format!("filter-{n}")))
    }

    async fn wait_for_updates(&self, version: Option<&str>) -> VsphereResult<UpdateSet> {
        if let Some(msg) = self.wait_error.lock().unwrap().clone() {
            return Err(VsphereError::connection(msg));
        }
        self.wait_versions
            .lock()
            .unwrap()
            .push(version.map(|v| v.to_string()));
        let batch = self
            .updates
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| VsphereError::connection("no scripted updates remaining"))?;
        self.waits_served.fetch_add(1, Ordering::SeqCst);
        Ok(batch)
    }

    async fn destroy_filter(&self, _filter: FilterHandle) -> VsphereResult<()> {
        self.filters_destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn opaque_network_id(&self, network: &ManagedObjectRef) -> VsphereResult<String> {
        self.opaque_ids
            .lock()
            .unwrap()
            .get(&network.id)
            .cloned()
            .ok_or_else(|| {
                VsphereError::not_found(format!("network {} has no opaque network id", network.id))
            })
    }

    async fn vm_devices(&self, vm: &ManagedObjectRef) -> VsphereResult<Vec<VirtualDevice>> {
        Ok(self
            .devices
            .lock()
            .unwrap()
            .get(&vm.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn reconfigure_vm(
        &self,
        vm: &ManagedObjectRef,
        spec: &ConfigChangeSpec,
    ) -> VsphereResult<ManagedObjectRef> {
        let n = self.tasks_submitted.fetch_add(1, Ordering::SeqCst) + 1;
        self.submitted
            .lock()
            .unwrap()
            .push((vm.id.clone(), spec.clone()));
        Ok(ManagedObjectRef::new(ObjectKind::Task, format!("task-{n}")))
    }
}
