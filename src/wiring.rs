//! Fixed table of UI controls and the action each one triggers.
//!
//! The table is the only place controls are bound. The edit modal's save and
//! delete controls resolve the task through the open session at dispatch
//! time, so reopening the modal never stacks a second binding.

use anyhow::Result;
use log::debug;
use rusqlite::Connection;

use crate::app::App;
use crate::model::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Cancel button of the edit modal.
    CancelEdit,
    /// Cancel button of the add modal.
    CancelAdd,
    /// Area outside an open modal.
    Overlay,
    HideSidebar,
    ShowSidebar,
    ThemeSwitch,
    /// "Add new task" button.
    AddNewTask,
    /// Submission of the add form.
    SubmitAdd,
    /// "Save changes" button of the edit modal.
    SaveChanges,
    /// "Delete task" button of the edit modal.
    DeleteTask,
    /// A rendered task card.
    Card(TaskId),
    /// A board selector tab.
    BoardTab(String),
}

pub fn dispatch(app: &mut App, conn: &Connection, control: Control) -> Result<()> {
    debug!("dispatch {control:?}");
    match control {
        Control::CancelEdit => app.cancel_edit(),
        Control::CancelAdd => app.cancel_add(),
        Control::Overlay => app.click_overlay(),
        Control::HideSidebar => app.set_sidebar(conn, false)?,
        Control::ShowSidebar => app.set_sidebar(conn, true)?,
        Control::ThemeSwitch => app.toggle_theme(conn)?,
        Control::AddNewTask => {
            if !app.session.is_open() {
                app.open_add();
            }
        }
        Control::SubmitAdd => app.submit_add(conn)?,
        Control::SaveChanges => app.save_edit(conn)?,
        Control::DeleteTask => app.delete_edit(conn)?,
        Control::Card(id) => {
            // Cards sit under the overlay while a modal is open.
            if !app.session.is_open() {
                app.open_edit(conn, id)?;
            }
        }
        Control::BoardTab(board) => {
            if !app.session.is_open() {
                app.select_board(conn, &board)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::{NewTask, Status, Task};
    use crate::storage;

    fn setup() -> (Connection, App) {
        let conn = db::open_memory().unwrap();
        db::set(&conn, db::TASKS_KEY, &Vec::<Task>::new()).unwrap();
        for (title, status) in [("one", Status::Todo), ("two", Status::Doing)] {
            storage::create_task(
                &conn,
                NewTask {
                    title: title.into(),
                    description: String::new(),
                    status,
                    board: "A".into(),
                },
            )
            .unwrap();
        }
        let app = App::new(&conn).unwrap();
        (conn, app)
    }

    #[test]
    fn save_without_open_session_is_a_no_op() {
        let (conn, mut app) = setup();
        let before = storage::list_tasks(&conn).unwrap();
        dispatch(&mut app, &conn, Control::SaveChanges).unwrap();
        dispatch(&mut app, &conn, Control::DeleteTask).unwrap();
        assert_eq!(storage::list_tasks(&conn).unwrap(), before);
    }

    #[test]
    fn delete_does_not_leak_into_the_next_session() {
        let (conn, mut app) = setup();
        dispatch(&mut app, &conn, Control::Card(TaskId(2))).unwrap();
        dispatch(&mut app, &conn, Control::DeleteTask).unwrap();
        assert!(!app.view.contains_card(TaskId(2)));

        dispatch(&mut app, &conn, Control::Card(TaskId(1))).unwrap();
        assert_eq!(app.session.target(), Some(TaskId(1)));
        dispatch(&mut app, &conn, Control::SaveChanges).unwrap();
        assert_eq!(storage::list_tasks(&conn).unwrap().len(), 1);
        assert!(app.view.contains_card(TaskId(1)));
        assert!(app.message.as_deref().unwrap_or("").starts_with("Saved"));
    }

    #[test]
    fn repeated_open_close_saves_once() {
        let (conn, mut app) = setup();
        for _ in 0..3 {
            dispatch(&mut app, &conn, Control::Card(TaskId(1))).unwrap();
            dispatch(&mut app, &conn, Control::CancelEdit).unwrap();
        }
        dispatch(&mut app, &conn, Control::Card(TaskId(1))).unwrap();
        app.session.form_mut().unwrap().title = "renamed".into();
        dispatch(&mut app, &conn, Control::SaveChanges).unwrap();
        // A second save has nothing bound to it any more.
        dispatch(&mut app, &conn, Control::SaveChanges).unwrap();
        let task = storage::get_task(&conn, TaskId(1)).unwrap();
        assert_eq!(task.title, "renamed");
        assert!(!app.session.is_open());
    }

    #[test]
    fn cards_and_tabs_are_covered_by_the_overlay() {
        let (conn, mut app) = setup();
        dispatch(&mut app, &conn, Control::AddNewTask).unwrap();
        dispatch(&mut app, &conn, Control::Card(TaskId(1))).unwrap();
        assert!(matches!(app.session, crate::session::EditSession::AddOpen(_)));
        dispatch(&mut app, &conn, Control::Overlay).unwrap();
        assert!(!app.session.is_open());
        assert!(!app.overlay_visible());
    }

    #[test]
    fn add_button_opens_overlay_and_cancel_hides_it() {
        let (conn, mut app) = setup();
        dispatch(&mut app, &conn, Control::AddNewTask).unwrap();
        assert!(app.overlay_visible());
        dispatch(&mut app, &conn, Control::CancelAdd).unwrap();
        assert!(!app.overlay_visible());
        assert_eq!(storage::list_tasks(&conn).unwrap().len(), 2);
    }

    #[test]
    fn sidebar_and_theme_controls_persist() {
        let (conn, mut app) = setup();
        dispatch(&mut app, &conn, Control::HideSidebar).unwrap();
        assert!(!app.sidebar_visible);
        dispatch(&mut app, &conn, Control::ShowSidebar).unwrap();
        assert_eq!(db::get::<bool>(&conn, db::SIDEBAR_KEY).unwrap(), Some(true));
        let theme = app.theme;
        dispatch(&mut app, &conn, Control::ThemeSwitch).unwrap();
        dispatch(&mut app, &conn, Control::ThemeSwitch).unwrap();
        assert_eq!(app.theme, theme);
    }
}
