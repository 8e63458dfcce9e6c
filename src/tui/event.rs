use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use super::draw::HitMap;
use crate::app::App;
use crate::session::{EditSession, FormField};
use crate::wiring::Control;

/// Result of handling a terminal event.
#[derive(Debug, PartialEq, Eq)]
pub enum UiAction {
    Quit,
    Dispatch(Control),
    OpenEditor,
    Continue,
}

pub fn handle_event(app: &mut App, hits: &HitMap, event: &Event) -> UiAction {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, *key),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            match hits.hit(mouse.column, mouse.row) {
                Some(control) => UiAction::Dispatch(control.clone()),
                None => UiAction::Continue,
            }
        }
        _ => UiAction::Continue,
    }
}

/// Handle a key press. Returns an action indicating what the event loop should do.
pub fn handle_key(app: &mut App, key: KeyEvent) -> UiAction {
    if app.session.is_open() {
        return handle_form(app, key);
    }

    app.message = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return UiAction::Quit,
        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Enter => {
            if let Some(id) = app.selected_card() {
                return UiAction::Dispatch(Control::Card(id));
            }
        }
        KeyCode::Char('a') => return UiAction::Dispatch(Control::AddNewTask),
        KeyCode::Char(']') | KeyCode::Tab => {
            if let Some(board) = app.index.next() {
                return UiAction::Dispatch(Control::BoardTab(board.to_string()));
            }
        }
        KeyCode::Char('[') | KeyCode::BackTab => {
            if let Some(board) = app.index.prev() {
                return UiAction::Dispatch(Control::BoardTab(board.to_string()));
            }
        }
        KeyCode::Char('s') => {
            let control = if app.sidebar_visible {
                Control::HideSidebar
            } else {
                Control::ShowSidebar
            };
            return UiAction::Dispatch(control);
        }
        KeyCode::Char('t') => return UiAction::Dispatch(Control::ThemeSwitch),
        _ => {}
    }
    UiAction::Continue
}

fn handle_form(app: &mut App, key: KeyEvent) -> UiAction {
    let editing = matches!(app.session, EditSession::EditOpen { .. });
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc if editing => return UiAction::Dispatch(Control::CancelEdit),
        KeyCode::Esc => return UiAction::Dispatch(Control::CancelAdd),
        KeyCode::Enter if editing => return UiAction::Dispatch(Control::SaveChanges),
        KeyCode::Enter => return UiAction::Dispatch(Control::SubmitAdd),
        KeyCode::Char('s') if ctrl && editing => return UiAction::Dispatch(Control::SaveChanges),
        KeyCode::Char('d') if ctrl && editing => return UiAction::Dispatch(Control::DeleteTask),
        _ => {}
    }

    let Some(form) = app.session.form_mut() else {
        return UiAction::Continue;
    };
    match key.code {
        KeyCode::Char('e') if ctrl => {
            if form.focused == FormField::Description {
                return UiAction::OpenEditor;
            }
        }
        KeyCode::Char('u') if ctrl => form.clear_field(),
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Tab => form.next_field(),
        KeyCode::BackTab => form.prev_field(),
        KeyCode::Left if form.focused == FormField::Status => form.cycle_status(false),
        KeyCode::Right if form.focused == FormField::Status => form.cycle_status(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
    UiAction::Continue
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, MouseEvent};
    use ratatui::layout::Rect;
    use rusqlite::Connection;

    use super::*;
    use crate::db;
    use crate::model::{NewTask, Status, Task, TaskId};
    use crate::storage;

    fn setup() -> (Connection, App) {
        let conn = db::open_memory().unwrap();
        db::set(&conn, db::TASKS_KEY, &Vec::<Task>::new()).unwrap();
        for (title, status, board) in [
            ("one", Status::Todo, "A"),
            ("two", Status::Doing, "A"),
            ("three", Status::Todo, "B"),
        ] {
            storage::create_task(
                &conn,
                NewTask {
                    title: title.into(),
                    description: String::new(),
                    status,
                    board: board.into(),
                },
            )
            .unwrap();
        }
        let app = App::new(&conn).unwrap();
        (conn, app)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn board_keys_map_to_controls() {
        let (_conn, mut app) = setup();
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q'))), UiAction::Quit);
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Char('a'))),
            UiAction::Dispatch(Control::AddNewTask)
        );
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Char('t'))),
            UiAction::Dispatch(Control::ThemeSwitch)
        );
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Char('s'))),
            UiAction::Dispatch(Control::HideSidebar)
        );
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Char(']'))),
            UiAction::Dispatch(Control::BoardTab("B".into()))
        );
    }

    #[test]
    fn enter_opens_selected_card() {
        let (_conn, mut app) = setup();
        handle_key(&mut app, press(KeyCode::Char('l')));
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            UiAction::Dispatch(Control::Card(TaskId(2)))
        );
    }

    #[test]
    fn key_press_clears_status_message() {
        let (_conn, mut app) = setup();
        app.message = Some("Saved 'one'".into());
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert!(app.message.is_none());
    }

    #[test]
    fn form_keys_edit_the_open_form() {
        let (_conn, mut app) = setup();
        app.open_add();
        for c in "hi".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Backspace));
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Right));
        let form = app.session.form().unwrap();
        assert_eq!(form.title, "h");
        assert_eq!(form.status, Status::Doing);
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            UiAction::Dispatch(Control::SubmitAdd)
        );
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Esc)),
            UiAction::Dispatch(Control::CancelAdd)
        );
    }

    #[test]
    fn edit_form_has_save_and_delete_shortcuts() {
        let (conn, mut app) = setup();
        app.open_edit(&conn, TaskId(1)).unwrap();
        assert_eq!(handle_key(&mut app, ctrl('s')), UiAction::Dispatch(Control::SaveChanges));
        assert_eq!(handle_key(&mut app, ctrl('d')), UiAction::Dispatch(Control::DeleteTask));
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Esc)),
            UiAction::Dispatch(Control::CancelEdit)
        );
        handle_key(&mut app, ctrl('u'));
        assert_eq!(app.session.form().unwrap().title, "");
    }

    #[test]
    fn ctrl_e_opens_editor_only_on_description() {
        let (_conn, mut app) = setup();
        app.open_add();
        assert_eq!(handle_key(&mut app, ctrl('e')), UiAction::Continue);
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(handle_key(&mut app, ctrl('e')), UiAction::OpenEditor);
    }

    #[test]
    fn left_click_resolves_through_hit_map() {
        let (_conn, mut app) = setup();
        let mut hits = HitMap::default();
        hits.push(Rect::new(5, 5, 10, 3), Control::Card(TaskId(1)));
        let click = |column, row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(
            handle_event(&mut app, &hits, &click(6, 6)),
            UiAction::Dispatch(Control::Card(TaskId(1)))
        );
        assert_eq!(handle_event(&mut app, &hits, &click(0, 0)), UiAction::Continue);
    }

    #[test]
    fn key_release_is_ignored() {
        let (_conn, mut app) = setup();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        assert_eq!(
            handle_event(&mut app, &HitMap::default(), &Event::Key(key)),
            UiAction::Continue
        );
    }
}
