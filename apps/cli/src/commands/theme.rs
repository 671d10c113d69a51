//! Theme preference commands.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use hub_storage::{PreferencesManager, Theme};

/// Whether the terminal reports a dark background (`COLORFGBG`, e.g. `15;0`).
fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| value.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| bg < 7 || bg == 8)
        .unwrap_or(false)
}

fn print_theme(theme: Theme, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("Theme: {}", theme),
        OutputFormat::Json => output::print_json(&serde_json::json!({ "theme": theme }))?,
    }
    Ok(())
}

pub fn theme_show(prefs: &PreferencesManager, format: OutputFormat) -> Result<()> {
    let theme = prefs.resolve_theme(system_prefers_dark())?;
    print_theme(theme, format)
}

pub fn theme_toggle(prefs: &PreferencesManager, format: OutputFormat) -> Result<()> {
    let theme = prefs.toggle_theme(system_prefers_dark())?;
    print_theme(theme, format)
}

pub fn theme_set(prefs: &PreferencesManager, theme: Theme, format: OutputFormat) -> Result<()> {
    prefs.set_theme(theme)?;
    print_theme(theme, format)
}
