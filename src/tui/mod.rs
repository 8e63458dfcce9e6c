mod draw;
mod editor;
mod event;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event as ct_event;
use log::{error, info};
use ratatui::prelude::*;
use rusqlite::Connection;

use crate::app::App;
use crate::wiring;
use draw::HitMap;
use event::UiAction;

pub fn run(conn: &Connection, poll_interval: Duration) -> Result<()> {
    let mut app = App::new(conn)?;

    let mut stdout = io::stdout();
    editor::enter_screen(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("board started");

    let result = run_loop(&mut terminal, &mut app, conn, poll_interval);

    editor::leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;
    info!("board closed");

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    conn: &Connection,
    poll_interval: Duration,
) -> Result<()> {
    let mut hits = HitMap::default();
    loop {
        terminal.draw(|frame| draw::render(frame, app, &mut hits))?;

        if !ct_event::poll(poll_interval)? {
            continue;
        }
        let ev = ct_event::read()?;
        match event::handle_event(app, &hits, &ev) {
            UiAction::Quit => return Ok(()),
            UiAction::Dispatch(control) => {
                if let Err(e) = wiring::dispatch(app, conn, control) {
                    error!("action failed: {e:#}");
                    app.message = Some(format!("error: {e}"));
                }
            }
            UiAction::OpenEditor => {
                if let Some(form) = app.session.form_mut() {
                    editor::edit_description(terminal, form);
                }
            }
            UiAction::Continue => {}
        }
    }
}
