//! CLI command implementations.

mod auth;
mod dashboard;
mod groups;
mod theme;

pub use auth::{login, logout, register, status};
pub use dashboard::dashboard;
pub use groups::{
    groups_create, groups_delete, groups_join, groups_leave, groups_list, groups_show,
    groups_update, my_groups, DraftArgs, ListArgs,
};
pub use theme::{theme_set, theme_show, theme_toggle};

use std::io::{self, Write};

/// Read one trimmed line after printing `label`.
fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Ask user for confirmation.
fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
