//! Given steps for task scheduling BDD scenarios.

use super::world::{SchedulingWorld, instant, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasklane::project::services::ProjectDetailsRequest;
use tasklane::task::services::CreateTaskRequest;

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut SchedulingWorld, name: String) -> Result<(), eyre::Report> {
    let project = run_async(
        world
            .services
            .projects
            .create_project(ProjectDetailsRequest::new(name, "Scenario project")),
    )
    .wrap_err("create project for scheduling scenario")?;
    world.project_id = Some(project.id());
    Ok(())
}

#[given(r#"a task "{title}" scheduled from "{start}" to "{end}""#)]
fn task_scheduled(
    world: &mut SchedulingWorld,
    title: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let request =
        CreateTaskRequest::new(world.project_id()?, &title, instant(&start)?, instant(&end)?);
    let task = run_async(world.services.tasks.create_task(request))
        .wrap_err_with(|| format!("schedule {title} in scenario setup"))?;
    world.task_ids.insert(title, task.id());
    Ok(())
}
