//! When steps for task scheduling BDD scenarios.

use super::world::{SchedulingWorld, instant, run_async};
use rstest_bdd_macros::when;
use tasklane::task::services::{CreateTaskRequest, UpdateTaskRequest};

#[when(r#"a task "{title}" is scheduled from "{start}" to "{end}""#)]
fn schedule_task(
    world: &mut SchedulingWorld,
    title: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let request =
        CreateTaskRequest::new(world.project_id()?, title, instant(&start)?, instant(&end)?);
    let result = run_async(world.services.tasks.create_task(request));
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"task "{title}" is rescheduled from "{start}" to "{end}""#)]
fn reschedule_task(
    world: &mut SchedulingWorld,
    title: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let task_id = *world
        .task_ids
        .get(&title)
        .ok_or_else(|| eyre::eyre!("no task titled {title} in scenario world"))?;
    let request = UpdateTaskRequest::new(title, instant(&start)?, instant(&end)?);
    let result = run_async(world.services.tasks.update_task(task_id, request));
    world.last_result = Some(result);
    Ok(())
}
