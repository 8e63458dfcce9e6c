//! Task persistence over the key-value store.
//!
//! The whole collection lives under a single key as a JSON array, in
//! insertion order. Every call reads and writes the collection
//! synchronously, so a render that follows a write always observes it.

use anyhow::Result;
use log::{debug, info};
use rusqlite::Connection;

use crate::db;
use crate::error::BoardError;
use crate::model::{NewTask, Task, TaskId};
use crate::seed;

fn save_all(conn: &Connection, tasks: &[Task]) -> Result<()> {
    db::set(conn, db::TASKS_KEY, tasks)
}

fn validate(task: &NewTask) -> Result<(), BoardError> {
    if task.title.trim().is_empty() {
        return Err(BoardError::Validation("title must not be empty".into()));
    }
    if task.board.trim().is_empty() {
        return Err(BoardError::Validation("board must not be empty".into()));
    }
    Ok(())
}

/// Seed the store on first run. Existing data is never touched.
pub fn initialize_data(conn: &Connection) -> Result<bool> {
    if db::contains(conn, db::TASKS_KEY)? {
        info!("data already exists in storage");
        return Ok(false);
    }
    save_all(conn, &seed::initial_tasks())?;
    db::set(conn, db::SIDEBAR_KEY, &true)?;
    info!("seeded storage with initial tasks");
    Ok(true)
}

pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>> {
    Ok(db::get(conn, db::TASKS_KEY)?.unwrap_or_default())
}

pub fn get_task(conn: &Connection, id: TaskId) -> Result<Task> {
    list_tasks(conn)?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| BoardError::NotFound(id).into())
}

/// Persist a new task and return it with its assigned id.
pub fn create_task(conn: &Connection, task: NewTask) -> Result<Task> {
    validate(&task)?;
    let mut tasks = list_tasks(conn)?;
    let highest = tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
    let stored: u64 = db::get(conn, db::NEXT_ID_KEY)?.unwrap_or(1);
    let next = stored.max(highest + 1);
    let task = task.into_task(TaskId(next));
    tasks.push(task.clone());
    save_all(conn, &tasks)?;
    db::set(conn, db::NEXT_ID_KEY, &(next + 1))?;
    debug!("created task {} on board '{}'", task.id, task.board);
    Ok(task)
}

/// Overwrite every field of task `id` except the id itself. The task keeps
/// its position in the collection.
pub fn update_task(conn: &Connection, id: TaskId, fields: NewTask) -> Result<Task> {
    validate(&fields)?;
    let mut tasks = list_tasks(conn)?;
    let slot = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(BoardError::NotFound(id))?;
    *slot = fields.into_task(id);
    let updated = slot.clone();
    save_all(conn, &tasks)?;
    debug!("updated task {id}");
    Ok(updated)
}

pub fn delete_task(conn: &Connection, id: TaskId) -> Result<()> {
    let mut tasks = list_tasks(conn)?;
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    if tasks.len() == before {
        return Err(BoardError::NotFound(id).into());
    }
    save_all(conn, &tasks)?;
    debug!("deleted task {id}");
    Ok(())
}
