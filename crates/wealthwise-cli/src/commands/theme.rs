//! Theme command implementations

use anyhow::{Context, Result};
use wealthwise_core::{Theme, ThemeStore};

fn icon(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "☀️",
        Theme::Dark => "🌙",
    }
}

pub fn cmd_theme_show(store: &dyn ThemeStore) -> Result<()> {
    let theme = store.load();
    println!("{} Theme: {}", icon(theme), theme);
    Ok(())
}

pub fn cmd_theme_toggle(store: &dyn ThemeStore) -> Result<()> {
    let theme = store.toggle().context("Failed to save theme preference")?;
    println!("{} Switched to {} theme", icon(theme), theme);
    Ok(())
}

pub fn cmd_theme_set(store: &dyn ThemeStore, theme: Theme) -> Result<()> {
    store.save(theme).context("Failed to save theme preference")?;
    println!("{} Theme set to {}", icon(theme), theme);
    Ok(())
}
