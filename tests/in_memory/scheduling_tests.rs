//! In-memory integration tests for scheduling across both services.

use super::helpers::{Services, at, create_project, services};
use rstest::rstest;
use tasklane::task::{
    domain::TaskId,
    services::{CreateTaskRequest, TaskFilter, TaskSchedulingError, UpdateTaskRequest},
};

fn conflict_titles(err: &TaskSchedulingError) -> Vec<String> {
    match err {
        TaskSchedulingError::Conflict(conflict) => conflict
            .conflicts()
            .iter()
            .map(|c| c.title.clone())
            .collect(),
        _ => Vec::new(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn day_plan_rejects_overlaps_and_accepts_adjacent_slots(
    services: Services,
) -> eyre::Result<()> {
    let project_id = create_project(&services, "Sprint").await?;
    services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "Standup", at(9, 0)?, at(10, 0)?))
        .await?;
    services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "Review", at(14, 0)?, at(15, 0)?))
        .await?;

    let overlap = services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "Pairing", at(9, 30)?, at(10, 30)?))
        .await;
    let Err(err) = overlap else {
        eyre::bail!("overlapping task was accepted");
    };
    eyre::ensure!(
        conflict_titles(&err) == ["Standup"],
        "unexpected conflicts: {err}"
    );

    services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "Focus", at(10, 0)?, at(11, 0)?))
        .await?;
    let all = services.tasks.list_tasks(project_id, TaskFilter::All).await?;
    eyre::ensure!(all.len() == 3, "expected three tasks, found {}", all.len());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rescheduling_reports_neighbours_but_not_itself(services: Services) -> eyre::Result<()> {
    let project_id = create_project(&services, "Sprint").await?;
    let x = services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "X", at(9, 0)?, at(10, 0)?))
        .await?;
    services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "Y", at(10, 15)?, at(11, 0)?))
        .await?;

    let moved = services
        .tasks
        .update_task(x.id(), UpdateTaskRequest::new("X", at(9, 30)?, at(10, 30)?))
        .await;
    let Err(err) = moved else {
        eyre::bail!("overlapping reschedule was accepted");
    };
    eyre::ensure!(conflict_titles(&err) == ["Y"], "unexpected conflicts: {err}");

    let nudged = services
        .tasks
        .update_task(x.id(), UpdateTaskRequest::new("X", at(9, 15)?, at(10, 15)?))
        .await?;
    eyre::ensure!(nudged.interval().end() == at(10, 15)?, "window not updated");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_and_deletion_update_project_views(services: Services) -> eyre::Result<()> {
    let project_id = create_project(&services, "Sprint").await?;
    let first = services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "First", at(8, 0)?, at(9, 0)?))
        .await?;
    let second = services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "Second", at(9, 0)?, at(10, 0)?))
        .await?;

    services.tasks.complete_task(first.id()).await?;
    let completed = services
        .tasks
        .list_tasks(project_id, TaskFilter::Completed)
        .await?;
    let open = services
        .tasks
        .list_tasks(project_id, TaskFilter::Incomplete)
        .await?;
    eyre::ensure!(
        completed.iter().map(|t| t.id()).eq([first.id()]),
        "completed view mismatch"
    );
    eyre::ensure!(
        open.iter().map(|t| t.id()).eq([second.id()]),
        "open view mismatch"
    );

    services.tasks.delete_task(first.id()).await?;
    let project = services
        .projects
        .find_project(project_id)
        .await?
        .ok_or_else(|| eyre::eyre!("project disappeared"))?;
    eyre::ensure!(
        project.task_ids() == [second.id()],
        "deleted task still referenced"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_tasks(services: Services) -> eyre::Result<()> {
    let project_id = create_project(&services, "Sprint").await?;
    let task = services
        .tasks
        .create_task(CreateTaskRequest::new(project_id, "Only", at(8, 0)?, at(9, 0)?))
        .await?;

    services.projects.delete_project(project_id).await?;

    eyre::ensure!(
        services.tasks.find_task(task.id()).await?.is_none(),
        "task survived project deletion"
    );
    let listing = services.tasks.list_tasks(project_id, TaskFilter::All).await;
    eyre::ensure!(
        matches!(listing, Err(TaskSchedulingError::ProjectNotFound(_))),
        "deleted project still listable"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_operations_report_not_found(services: Services) -> eyre::Result<()> {
    let missing = TaskId::new();
    let completed = services.tasks.complete_task(missing).await;
    let deleted = services.tasks.delete_task(missing).await;

    eyre::ensure!(
        matches!(completed, Err(TaskSchedulingError::TaskNotFound(id)) if id == missing),
        "completion of unknown task did not report not found"
    );
    eyre::ensure!(
        matches!(deleted, Err(TaskSchedulingError::TaskNotFound(id)) if id == missing),
        "deletion of unknown task did not report not found"
    );
    Ok(())
}
