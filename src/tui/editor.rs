//! Terminal mode switching and the external editor for task descriptions.

use std::io::{self, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::{debug, warn};
use ratatui::prelude::*;

use crate::session::TaskForm;

/// Raw mode, alternate screen and mouse capture on.
pub fn enter_screen<W: Write>(out: &mut W) -> Result<()> {
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

/// Undo `enter_screen`.
pub fn leave_screen<W: Write>(out: &mut W) -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(out, DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}

/// Program and arguments from `$VISUAL`, then `$EDITOR`.
fn editor_command(visual: Option<String>, editor: Option<String>) -> Result<(String, Vec<String>)> {
    let raw = visual
        .filter(|v| !v.trim().is_empty())
        .or_else(|| editor.filter(|e| !e.trim().is_empty()))
        .context("neither $VISUAL nor $EDITOR is set")?;
    let mut words = raw.split_whitespace().map(str::to_string);
    let program = words.next().context("editor command is empty")?;
    Ok((program, words.collect()))
}

/// Write `text` to a temp file, run the editor on it and read it back.
fn round_trip(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, text: &str) -> Result<String> {
    let (program, args) =
        editor_command(std::env::var("VISUAL").ok(), std::env::var("EDITOR").ok())?;

    let mut file = tempfile::Builder::new()
        .prefix("taskboard-description-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create temp file")?;
    file.write_all(text.as_bytes())
        .context("failed to write description to temp file")?;
    file.flush()?;
    debug!("running {program} on {}", file.path().display());

    leave_screen(terminal.backend_mut())?;
    let status = Command::new(&program)
        .args(&args)
        .arg(file.path())
        .status()
        .with_context(|| format!("failed to run editor '{program}'"));
    enter_screen(terminal.backend_mut())?;
    terminal.clear()?;

    let status = status?;
    if !status.success() {
        bail!("editor exited with {status}");
    }
    std::fs::read_to_string(file.path()).context("failed to read description back")
}

/// Store the editor result on the form. A failed round trip keeps the old
/// description and shows the error on the form.
fn apply_edit(form: &mut TaskForm, result: Result<String>) {
    match result {
        Ok(text) => {
            form.description = text.trim_end().to_string();
            form.error = None;
        }
        Err(e) => {
            warn!("description editor failed: {e:#}");
            form.error = Some(e.to_string());
        }
    }
}

/// Edit the description of `form` in the user's editor.
pub fn edit_description(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, form: &mut TaskForm) {
    let result = round_trip(terminal, &form.description);
    apply_edit(form, result);
}
