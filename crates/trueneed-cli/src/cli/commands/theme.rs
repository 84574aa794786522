//! Theme command handlers.

use anyhow::{Result, anyhow};
use trueneed_shell::{ShellState, Theme};

use crate::cli::App;

pub fn show(app: &App) -> Result<()> {
    println!("{}", app.store.theme()?);
    Ok(())
}

pub fn toggle(app: &App) -> Result<()> {
    let mut shell = ShellState::load(&app.store)?;
    let theme = shell.toggle_theme(&app.store)?;
    println!("✓ Theme set to {theme}");
    Ok(())
}

pub fn set(app: &App, theme: &str) -> Result<()> {
    let theme: Theme = theme.parse().map_err(|e: String| anyhow!(e))?;
    app.store.set_theme(theme)?;
    println!("✓ Theme set to {theme}");
    Ok(())
}
