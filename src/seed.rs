use crate::model::{Status, Task, TaskId};

fn task(id: u64, title: &str, description: &str, status: Status, board: &str) -> Task {
    Task {
        id: TaskId(id),
        title: title.to_string(),
        description: description.to_string(),
        status,
        board: board.to_string(),
    }
}

/// Dataset written on first run, before any task collection exists.
pub fn initial_tasks() -> Vec<Task> {
    vec![
        task(
            1,
            "Launch Epic Career",
            "Create a killer resume and start applying",
            Status::Todo,
            "Launch Career",
        ),
        task(
            2,
            "Conquer React",
            "Work through the official tutorial end to end",
            Status::Todo,
            "Launch Career",
        ),
        task(
            3,
            "Understand Databases",
            "Model a schema and write the queries by hand",
            Status::Todo,
            "Launch Career",
        ),
        task(
            4,
            "Crush Frameworks",
            "Pick one framework and build a small project with it",
            Status::Doing,
            "Launch Career",
        ),
        task(
            5,
            "Master JavaScript",
            "Get comfortable with the language fundamentals",
            Status::Done,
            "Launch Career",
        ),
        task(
            6,
            "Draft roadmap",
            "List the milestones for the next quarter",
            Status::Doing,
            "Roadmap",
        ),
        task(
            7,
            "Review roadmap",
            "Walk through the draft with the team",
            Status::Todo,
            "Roadmap",
        ),
    ]
}
