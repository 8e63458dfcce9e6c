//! Edit session: the one task form that may be open at a time.
//!
//! Save and delete only exist while an `EditOpen` session is held, and they
//! act on the id owned by that session. Closing the session drops the id,
//! so nothing bound to a previous session can fire later.

use log::debug;

use crate::error::BoardError;
use crate::model::{NewTask, Status, Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
    Board,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: Status,
    /// Board name typed by the user. Only present when there is no active
    /// board to put the task on.
    pub board: Option<String>,
    pub focused: FormField,
    pub error: Option<String>,
}

impl TaskForm {
    /// Empty form. `needs_board` adds a board field for when no board exists yet.
    pub fn blank(needs_board: bool) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: Status::Todo,
            board: needs_board.then(String::new),
            focused: FormField::Title,
            error: None,
        }
    }

    pub fn for_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            board: None,
            focused: FormField::Title,
            error: None,
        }
    }

    fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::Title, FormField::Description, FormField::Status];
        if self.board.is_some() {
            fields.push(FormField::Board);
        }
        fields
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(i + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(i + fields.len() - 1) % fields.len()];
    }

    /// Text buffer of the focused field. The status field has none.
    pub fn focused_buf_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Board => self.board.as_mut(),
            FormField::Status => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buf) = self.focused_buf_mut() {
            buf.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.focused_buf_mut() {
            buf.pop();
        }
        self.error = None;
    }

    pub fn clear_field(&mut self) {
        if let Some(buf) = self.focused_buf_mut() {
            buf.clear();
        }
        self.error = None;
    }

    pub fn cycle_status(&mut self, forward: bool) {
        self.status = if forward {
            self.status.next()
        } else {
            self.status.prev()
        };
    }

    /// Build the record the form describes, placed on `active_board`. A form
    /// carrying its own board field uses that instead.
    pub fn to_new_task(&self, active_board: Option<&str>) -> Result<NewTask, BoardError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(BoardError::Validation("title must not be empty".into()));
        }
        let board = match (&self.board, active_board) {
            (Some(typed), _) => typed.trim(),
            (None, Some(active)) => active,
            (None, None) => "",
        };
        if board.is_empty() {
            return Err(BoardError::Validation("board must not be empty".into()));
        }
        Ok(NewTask {
            title: title.to_string(),
            description: self.description.clone(),
            status: self.status,
            board: board.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Closed,
    AddOpen(TaskForm),
    EditOpen { task: TaskId, form: TaskForm },
}

/// What the caller must do after an edit-modal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Update(TaskId, NewTask),
    Delete(TaskId),
}

impl EditSession {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn form(&self) -> Option<&TaskForm> {
        match self {
            Self::Closed => None,
            Self::AddOpen(form) | Self::EditOpen { form, .. } => Some(form),
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        match self {
            Self::Closed => None,
            Self::AddOpen(form) | Self::EditOpen { form, .. } => Some(form),
        }
    }

    /// Task the open edit modal is bound to.
    pub fn target(&self) -> Option<TaskId> {
        match self {
            Self::EditOpen { task, .. } => Some(*task),
            _ => None,
        }
    }

    pub fn open_add(&mut self, has_active_board: bool) {
        debug!("opening add form");
        *self = Self::AddOpen(TaskForm::blank(!has_active_board));
    }

    pub fn open_edit(&mut self, task: &Task) {
        debug!("opening edit form for task {}", task.id);
        *self = Self::EditOpen {
            task: task.id,
            form: TaskForm::for_task(task),
        };
    }

    /// Validate the add form. On success the session closes and the record to
    /// create is returned; on failure the form keeps the error and stays open.
    pub fn commit_add(&mut self, active_board: Option<&str>) -> Option<NewTask> {
        let Self::AddOpen(form) = self else {
            return None;
        };
        match form.to_new_task(active_board) {
            Ok(task) => {
                *self = Self::Closed;
                Some(task)
            }
            Err(e) => {
                form.error = Some(e.to_string());
                None
            }
        }
    }

    /// Put a rejected add back on screen with the storage error.
    pub fn reject_add(&mut self, form: TaskForm, message: String) {
        *self = Self::AddOpen(TaskForm {
            error: Some(message),
            ..form
        });
    }

    pub fn save(&mut self, active_board: Option<&str>) -> Option<EditCommand> {
        let Self::EditOpen { task, form } = self else {
            return None;
        };
        match form.to_new_task(active_board) {
            Ok(fields) => {
                let command = EditCommand::Update(*task, fields);
                *self = Self::Closed;
                Some(command)
            }
            Err(e) => {
                form.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn delete(&mut self) -> Option<EditCommand> {
        let Self::EditOpen { task, .. } = self else {
            return None;
        };
        let command = EditCommand::Delete(*task);
        *self = Self::Closed;
        Some(command)
    }

    pub fn cancel_add(&mut self) {
        if matches!(self, Self::AddOpen(_)) {
            *self = Self::Closed;
        }
    }

    pub fn cancel_edit(&mut self) {
        if matches!(self, Self::EditOpen { .. }) {
            *self = Self::Closed;
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }
}
