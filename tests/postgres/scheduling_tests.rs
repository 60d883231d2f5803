//! Scheduling tests running both services over `PostgreSQL`.

use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use tasklane::project::ports::ProjectRepository;
use tasklane::project::services::ProjectDetailsRequest;
use tasklane::task::{
    domain::TaskDomainError,
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskFilter, TaskSchedulingError, UpdateTaskRequest},
};

use super::helpers::{at, at_nanos, create_project, prepare, runtime};

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
fn conflict_report_lists_every_overlap_in_start_order(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let services = &context.services;
        let project_id = create_project(services, "Sprint").await?;
        for (title, start, end) in [
            ("Review", at(11, 0)?, at(12, 0)?),
            ("Standup", at(9, 0)?, at(10, 0)?),
            ("Lunch", at(12, 0)?, at(13, 0)?),
        ] {
            services
                .tasks
                .create_task(CreateTaskRequest::new(project_id, title, start, end))
                .await?;
        }

        let blocked = services
            .tasks
            .create_task(CreateTaskRequest::new(project_id, "Offsite", at(9, 30)?, at(11, 30)?))
            .await;
        let Err(err) = blocked else {
            eyre::bail!("overlapping task was accepted");
        };
        eyre::ensure!(
            conflict_titles(&err) == ["Standup", "Review"],
            "unexpected conflicts: {err}"
        );

        services
            .tasks
            .create_task(CreateTaskRequest::new(project_id, "Focus", at(10, 0)?, at(11, 0)?))
            .await?;
        let all = services.tasks.list_tasks(project_id, TaskFilter::All).await?;
        eyre::ensure!(all.len() == 4, "expected four tasks, found {}", all.len());

        let project = context
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| eyre::eyre!("project disappeared"))?;
        eyre::ensure!(project.task_ids().len() == 4, "references out of step with rows");
        eyre::Ok(())
    })
}

#[rstest]
fn rescheduling_ignores_the_task_itself_and_persists_the_window(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let services = &context.services;
        let project_id = create_project(services, "Sprint").await?;
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

        services
            .tasks
            .update_task(x.id(), UpdateTaskRequest::new("X moved", at(9, 15)?, at(10, 15)?))
            .await?;
        let stored = context
            .tasks
            .find_by_id(x.id())
            .await?
            .ok_or_else(|| eyre::eyre!("rescheduled task missing"))?;
        eyre::ensure!(stored.title() == "X moved", "title not persisted");
        eyre::ensure!(stored.interval().start() == at(9, 15)?, "start not persisted");
        eyre::ensure!(stored.interval().end() == at(10, 15)?, "end not persisted");
        eyre::Ok(())
    })
}

#[rstest]
fn completion_and_deletion_update_stored_views(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let services = &context.services;
        let project_id = create_project(services, "Sprint").await?;
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
        let project = context
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| eyre::eyre!("project disappeared"))?;
        eyre::ensure!(
            project.task_ids() == [second.id()],
            "deleted task still referenced"
        );
        eyre::ensure!(
            context.tasks.find_by_id(first.id()).await?.is_none(),
            "deleted task row remains"
        );
        eyre::Ok(())
    })
}

#[rstest]
fn deleting_a_project_through_the_catalog_removes_its_tasks(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let services = &context.services;
        let project_id = create_project(services, "Sprint").await?;
        let task = services
            .tasks
            .create_task(CreateTaskRequest::new(project_id, "Only", at(8, 0)?, at(9, 0)?))
            .await?;

        services.projects.delete_project(project_id).await?;

        eyre::ensure!(
            context.tasks.find_by_id(task.id()).await?.is_none(),
            "task survived project deletion"
        );
        let creating = services
            .tasks
            .create_task(CreateTaskRequest::new(project_id, "Late", at(10, 0)?, at(11, 0)?))
            .await;
        eyre::ensure!(
            matches!(creating, Err(TaskSchedulingError::ProjectNotFound(id)) if id == project_id),
            "deleted project accepted a task: {creating:?}"
        );
        eyre::Ok(())
    })
}

#[rstest]
fn boundaries_below_a_microsecond_do_not_create_conflicts(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let services = &context.services;
        let project_id = create_project(services, "Sprint").await?;
        let morning = services
            .tasks
            .create_task(CreateTaskRequest::new(
                project_id,
                "Morning",
                at(9, 0)?,
                at_nanos(10, 0, 500)?,
            ))
            .await?;
        services
            .tasks
            .create_task(CreateTaskRequest::new(
                project_id,
                "Late morning",
                at_nanos(10, 0, 100)?,
                at(11, 0)?,
            ))
            .await?;

        let stored = context
            .tasks
            .find_by_id(morning.id())
            .await?
            .ok_or_else(|| eyre::eyre!("morning task missing"))?;
        eyre::ensure!(
            stored.interval() == morning.interval(),
            "stored window differs from the accepted one"
        );
        eyre::ensure!(stored.interval().end() == at(10, 0)?, "end kept sub-microsecond digits");

        let all = services.tasks.list_tasks(project_id, TaskFilter::All).await?;
        eyre::ensure!(all.len() == 2, "expected two tasks, found {}", all.len());
        eyre::Ok(())
    })
}

#[rstest]
fn sub_microsecond_windows_are_rejected_before_storage(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let services = &context.services;
        let project_id = create_project(services, "Sprint").await?;
        let created = services
            .tasks
            .create_task(CreateTaskRequest::new(
                project_id,
                "Blink",
                at_nanos(10, 0, 100)?,
                at_nanos(10, 0, 900)?,
            ))
            .await;
        eyre::ensure!(
            matches!(
                created,
                Err(TaskSchedulingError::Domain(TaskDomainError::InvalidInterval { .. }))
            ),
            "unexpected result: {created:?}"
        );
        let all = services.tasks.list_tasks(project_id, TaskFilter::All).await?;
        eyre::ensure!(all.is_empty(), "rejected task was stored");
        eyre::Ok(())
    })
}

#[rstest]
fn long_titles_and_names_are_stored_in_full(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let services = &context.services;
        let long_name = "n".repeat(300);
        let long_title = "t".repeat(300);
        let project = services
            .projects
            .create_project(ProjectDetailsRequest::new(long_name.as_str(), "Long"))
            .await?;
        let task = services
            .tasks
            .create_task(CreateTaskRequest::new(
                project.id(),
                long_title.as_str(),
                at(9, 0)?,
                at(10, 0)?,
            ))
            .await?;

        let stored_project = context
            .projects
            .find_by_id(project.id())
            .await?
            .ok_or_else(|| eyre::eyre!("project missing"))?;
        let stored_task = context
            .tasks
            .find_by_id(task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("task missing"))?;
        eyre::ensure!(stored_project.name() == long_name, "project name truncated");
        eyre::ensure!(stored_task.title() == long_title, "task title truncated");
        eyre::Ok(())
    })
}

#[rstest]
fn concurrent_overlapping_creates_admit_exactly_one(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 4)?;
    let rt = runtime()?;
    rt.block_on(async {
        let project_id = create_project(&context.services, "Sprint").await?;
        let mut attempts = Vec::new();
        for n in 0..4 {
            let services = context.services.clone();
            let request = CreateTaskRequest::new(
                project_id,
                format!("Attempt {n}"),
                at(9, n)?,
                at(10, n)?,
            );
            attempts.push(tokio::spawn(async move {
                services.tasks.create_task(request).await
            }));
        }

        let mut accepted = 0;
        for attempt in attempts {
            match attempt.await? {
                Ok(_) => accepted += 1,
                Err(TaskSchedulingError::Conflict(_)) => {}
                Err(other) => eyre::bail!("unexpected error: {other}"),
            }
        }
        eyre::ensure!(accepted == 1, "expected one accepted task, got {accepted}");

        let all = context
            .services
            .tasks
            .list_tasks(project_id, TaskFilter::All)
            .await?;
        eyre::ensure!(all.len() == 1, "expected one stored task, found {}", all.len());
        eyre::Ok(())
    })
}
