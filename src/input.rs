//! CSV input: headerless `vm_name,logical_switch` rows.

use anyhow::{bail, Context};
use nicshift_vsphere::batch::MigrationRow;
use std::path::Path;

/// Read migration rows from a CSV file. No header row; the first two
/// fields of each record are the VM name and the target logical switch
/// (extra fields are ignored). Field contents are not validated —
/// empty names simply fail resolution later.
pub fn read_rows(path: &Path) -> anyhow::Result<Vec<MigrationRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record on line {}", i + 1))?;
        let vm_name = match record.get(0) {
            Some(v) => v.to_string(),
            None => continue, // blank line
        };
        let Some(network_name) = record.get(1) else {
            bail!(
                "line {}: expected vm_name,logical_switch but got {} field(s)",
                i + 1,
                record.len()
            );
        };
        rows.push(MigrationRow::new(vm_name, network_name));
    }
    Ok(rows)
}
