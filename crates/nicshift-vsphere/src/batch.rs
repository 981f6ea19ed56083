//! Batch loop: one migration per input row, failures isolated per row.

use crate::error::{VsphereError, VsphereResult};
use crate::reconfigure::ReconfigureWorkflow;
use crate::session::VimSession;

/// One input row: which VM, onto which logical switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRow {
    pub vm_name: String,
    pub network_name: String,
}

impl MigrationRow {
    pub fn new(vm_name: impl Into<String>, network_name: impl Into<String>) -> Self {
        Self { vm_name: vm_name.into(), network_name: network_name.into() }
    }
}

/// Outcome of one row, in input order.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub row: MigrationRow,
    pub result: Result<(), VsphereError>,
}

impl RowOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every row in order, one VM at a time.
///
/// Row-level failures (resolution misses, task faults, API rejections)
/// become row outcomes and never abort later rows. Transport-level
/// failures abort the whole run: nothing useful can happen on a dead
/// connection.
pub async fn run_batch(
    session: &dyn VimSession,
    rows: &[MigrationRow],
) -> VsphereResult<Vec<RowOutcome>> {
    let workflow = ReconfigureWorkflow::new(session);
    let mut outcomes = Vec::with_capacity(rows.len());

    for row in rows {
        let result = workflow
            .migrate_vm_network(&row.vm_name, &row.network_name)
            .await;

        match &result {
            Ok(()) => {
                log::info!(
                    "Successfully changed to network {} for VM {}",
                    row.network_name,
                    row.vm_name
                );
            }
            Err(e) if e.is_fatal() => {
                log::error!("aborting batch at VM {}: {e}", row.vm_name);
                return Err(e.clone());
            }
            Err(e) => {
                log::error!("VM {} failed: {e}", row.vm_name);
            }
        }

        outcomes.push(RowOutcome { row: row.clone(), result });
    }

    Ok(outcomes)
}
