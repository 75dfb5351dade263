//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `advise` - AI advisor commands (plan, simulate, tip)
//! - `ai` - AI backend status
//! - `budget` - Budget figure editing
//! - `dashboard` - Dashboard summary
//! - `goals` - Goal management commands (list, add, delete, fund)
//! - `prompts` - Prompt library management commands
//! - `theme` - Theme preference commands
//!
//! Every command that touches the dashboard loads the snapshot into a
//! [`Store`], dispatches actions, and writes the snapshot back.

pub mod advise;
pub mod ai;
pub mod budget;
pub mod dashboard;
pub mod goals;
pub mod prompts;
pub mod theme;

// Re-export command functions for main.rs
pub use advise::*;
pub use ai::*;
pub use budget::*;
pub use dashboard::*;
pub use goals::*;
pub use prompts::*;
pub use theme::*;

use std::path::Path;

use anyhow::{Context, Result};
use wealthwise_core::{load_snapshot, save_snapshot, Store};

/// Open the dashboard snapshot as a store
pub fn open_store(path: &Path) -> Result<Store> {
    let state = load_snapshot(path)
        .with_context(|| format!("Failed to load state from {}", path.display()))?;
    Ok(Store::new(state))
}

/// Write the store back to the snapshot
pub fn save_store(path: &Path, store: &Store) -> Result<()> {
    save_snapshot(path, store.state())
        .with_context(|| format!("Failed to save state to {}", path.display()))
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
