//! Task-completion tracking over the change-notification feed.
//!
//! One property-collector filter is registered per wait, scoped to the
//! exact task set; the feed is then drained until every tracked task is
//! terminal. Success requires all of them; the first Error aborts the
//! wait immediately with that task's fault.

use crate::error::{VsphereError, VsphereResult};
use crate::session::VimSession;
use crate::types::{ManagedObjectRef, TaskInfo, TaskState};

use std::collections::HashMap;

/// Property carrying a full task snapshot.
const PROP_INFO: &str = "info";
/// Property carrying an incremental state delta.
const PROP_INFO_STATE: &str = "info.state";

/// Blocks on the change-notification feed until a set of submitted
/// tasks completes.
pub struct TaskMonitor<'a> {
    session: &'a dyn VimSession,
}

impl<'a> TaskMonitor<'a> {
    pub fn new(session: &'a dyn VimSession) -> Self {
        Self { session }
    }

    /// Wait until every task in `tasks` reaches a terminal state.
    ///
    /// Returns `Ok(())` once all tasks succeeded. The first task to
    /// report Error fails the wait immediately with that task's fault;
    /// still-running siblings are abandoned (their filter is torn down
    /// with everything else).
    ///
    /// The filter registered for this call is destroyed on every exit
    /// path; teardown failure is logged and never masks the primary
    /// result.
    pub async fn await_all(&self, tasks: &[ManagedObjectRef]) -> VsphereResult<()> {
        if tasks.is_empty() {
            return Ok(());
        }

        let filter = self.session.create_task_filter(tasks).await?;
        let outcome = self.drive(tasks).await;
        if let Err(e) = self.session.destroy_filter(filter).await {
            log::warn!("failed to destroy task filter: {e}");
        }
        outcome
    }

    /// The receive loop. Every fallible step funnels through here so
    /// `await_all` can release the filter unconditionally.
    async fn drive(&self, tasks: &[ManagedObjectRef]) -> VsphereResult<()> {
        // Explicit task-id → state map; the loop exits when no
        // non-terminal entries remain.
        let mut pending: HashMap<String, TaskState> = tasks
            .iter()
            .map(|t| (t.id.clone(), TaskState::Queued))
            .collect();
        // Fault messages seen in "info" snapshots, in case the terminal
        // Error arrives as a bare "info.state" delta.
        let mut faults: HashMap<String, String> = HashMap::new();
        let mut version: Option<String> = None;

        while !pending.is_empty() {
            // Sole blocking point: suspends until the server has data.
            let batch = self.session.wait_for_updates(version.as_deref()).await?;

            for update in batch.updates {
                let id = &update.object.id;
                for change in update.changes {
                    // Untracked objects (and tasks already observed
                    // terminal this batch) are a no-op, not an error.
                    if !pending.contains_key(id) {
                        break;
                    }

                    let state = match change.name.as_str() {
                        PROP_INFO => {
                            let info: TaskInfo = serde_json::from_value(change.value)?;
                            if let Some(fault) = info.error {
                                faults.insert(id.clone(), fault.localized_message);
                            }
                            info.state
                        }
                        PROP_INFO_STATE => serde_json::from_value::<TaskState>(change.value)?,
                        _ => continue,
                    };

                    match state {
                        TaskState::Success => {
                            log::debug!("task {id} completed");
                            pending.remove(id);
                        }
                        TaskState::Error => {
                            let msg = faults.remove(id).unwrap_or_else(|| {
                                format!("task {id} reported an error state")
                            });
                            return Err(VsphereError::task_fault(msg));
                        }
                        other => {
                            pending.insert(id.clone(), other);
                        }
                    }
                }
            }

            version = Some(batch.version);
        }

        Ok(())
    }
}
