//! Ledger snapshot persistence.
//!
//! The ledger is small and mutates at human rates, so the whole store is
//! serialized as pretty JSON after every committed mutation. Writes go
//! through a temp file and a rename so a crash mid-write leaves the
//! previous snapshot intact.

use std::path::{Path, PathBuf};

use anyhow::Context;

use provenance_ledger::Ledger;

/// Default snapshot location under the platform data directory.
pub fn default_state_file() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    data.join("provenance").join("ledger.json")
}

/// Load a snapshot if one exists. `Ok(None)` when the file is absent.
pub fn load(path: &Path) -> anyhow::Result<Option<Ledger>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let ledger = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Ok(Some(ledger))
}

/// Write a snapshot.
pub fn save(path: &Path, ledger: &Ledger) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(ledger).context("failed to serialize ledger")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, data).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
