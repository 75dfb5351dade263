//! JSON snapshots of the dashboard state
//!
//! The CLI keeps one `AppState` per file. A missing file loads the demo
//! dashboard. Writes go to a temp file in the same directory and are then
//! renamed over the target.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::state::AppState;

/// Load a snapshot, or the demo dashboard if the file does not exist
pub fn load_snapshot(path: &Path) -> Result<AppState> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No snapshot found, using demo data");
        return Ok(AppState::demo());
    }

    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| {
        Error::InvalidData(format!("Invalid snapshot {}: {}", path.display(), e))
    })
}

/// Write a snapshot atomically
pub fn save_snapshot(path: &Path, state: &AppState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    write_atomic(path, json.as_bytes())
}

/// Replace `path` with `data` via a same-directory temp file
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Distribution;
    use crate::state::{Action, Store};

    #[test]
    fn test_missing_snapshot_loads_demo() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_snapshot(&dir.path().join("none.json")).unwrap();
        assert_eq!(state, AppState::demo());
    }

    #[test]
    fn test_snapshot_keeps_state_and_advisor_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wealthwise.json");

        let mut store = Store::new(AppState::demo());
        store.dispatch(Action::SetMonthlyIncome(6200.0)).unwrap();
        store
            .dispatch(Action::DistributionReady(vec![Distribution::new(
                "Living Expenses",
                4000.0,
            )]))
            .unwrap();

        save_snapshot(&path, store.state()).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(&loaded, store.state());
    }

    #[test]
    fn test_corrupt_snapshot_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_snapshot(&path), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_rejected_amounts_keep_snapshot_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wealthwise.json");
        let mut goal = crate::models::NewGoal {
            name: "Moon".to_string(),
            target_amount: f64::INFINITY,
            current_amount: 0.0,
            deadline: chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            priority: crate::models::Priority::Low,
        };

        let mut store = Store::new(AppState::demo());
        assert!(store.dispatch(Action::AddGoal(goal.clone())).is_err());
        goal.target_amount = 1000.0;
        goal.current_amount = f64::NAN;
        assert!(store.dispatch(Action::AddGoal(goal)).is_err());
        assert!(store.dispatch(Action::SetTotalBalance(f64::NAN)).is_err());
        assert!(store.dispatch(Action::SetMonthlyIncome(f64::INFINITY)).is_err());
        assert!(store.dispatch(Action::SetMonthlyExpenses(-1.0)).is_err());
        assert!(store
            .dispatch(Action::SetAvailableToSave(f64::NEG_INFINITY))
            .is_err());

        save_snapshot(&path, store.state()).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), AppState::demo());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme");
        write_atomic(&path, b"light").unwrap();
        write_atomic(&path, b"dark").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "dark");
    }
}
