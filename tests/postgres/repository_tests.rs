//! Repository-level tests against an embedded `PostgreSQL` database.

use diesel::RunQueryDsl;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use tasklane::persistence::apply_schema;
use tasklane::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use tasklane::task::{
    domain::{Task, TaskId, TaskInterval},
    ports::{TaskRepository, TaskRepositoryError},
};
use uuid::Uuid;

use super::helpers::{at, prepare, runtime};

fn task_in(project_id: ProjectId, title: &str, start_hour: u32) -> eyre::Result<Task> {
    let interval = TaskInterval::new(at(start_hour, 0)?, at(start_hour + 1, 0)?)?;
    Ok(Task::new(project_id, title, "", interval, &DefaultClock)?)
}

#[rstest]
fn attach_and_detach_keep_ordered_unique_references(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let project = Project::new("Sprint", "Sprint work", &DefaultClock)?;
        context.projects.store(&project).await?;
        let first = TaskId::new();
        let second = TaskId::new();

        context.projects.attach_task(project.id(), first).await?;
        context.projects.attach_task(project.id(), second).await?;
        context.projects.attach_task(project.id(), first).await?;
        let stored = context
            .projects
            .find_by_id(project.id())
            .await?
            .ok_or_else(|| eyre::eyre!("project missing after attach"))?;
        eyre::ensure!(
            stored.task_ids() == [first, second],
            "unexpected references: {:?}",
            stored.task_ids()
        );

        eyre::ensure!(
            context.projects.detach_task(project.id(), first).await?,
            "attached reference was not removed"
        );
        eyre::ensure!(
            !context.projects.detach_task(project.id(), first).await?,
            "second detach reported a removal"
        );
        let after_detach = context
            .projects
            .find_by_id(project.id())
            .await?
            .ok_or_else(|| eyre::eyre!("project missing after detach"))?;
        eyre::ensure!(after_detach.task_ids() == [second], "detach left stale references");
        eyre::Ok(())
    })
}

#[rstest]
fn reference_updates_on_unknown_project_report_not_found(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let missing = ProjectId::new();
        let attached = context.projects.attach_task(missing, TaskId::new()).await;
        eyre::ensure!(
            matches!(attached, Err(ProjectRepositoryError::NotFound(id)) if id == missing),
            "unexpected attach result: {attached:?}"
        );
        let detached = context.projects.detach_task(missing, TaskId::new()).await;
        eyre::ensure!(
            matches!(detached, Err(ProjectRepositoryError::NotFound(id)) if id == missing),
            "unexpected detach result: {detached:?}"
        );
        eyre::Ok(())
    })
}

#[rstest]
fn detail_updates_keep_task_references(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let mut project = Project::new("Sprint", "Sprint work", &DefaultClock)?;
        context.projects.store(&project).await?;
        let task_id = TaskId::new();
        context.projects.attach_task(project.id(), task_id).await?;

        project.update_details("Sprint 2", "Carry-over", &DefaultClock)?;
        context.projects.update_details(&project).await?;

        let stored = context
            .projects
            .find_by_id(project.id())
            .await?
            .ok_or_else(|| eyre::eyre!("project missing after update"))?;
        eyre::ensure!(stored.name() == "Sprint 2", "name not updated");
        eyre::ensure!(stored.task_ids() == [task_id], "references lost on update");
        eyre::Ok(())
    })
}

#[rstest]
fn storing_a_task_for_a_missing_project_reports_the_owner(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let missing = ProjectId::new();
        let task = task_in(missing, "Orphan", 9)?;
        let stored = context.tasks.store(&task).await;
        eyre::ensure!(
            matches!(stored, Err(TaskRepositoryError::ProjectMissing(id)) if id == missing),
            "unexpected store result: {stored:?}"
        );
        eyre::Ok(())
    })
}

#[rstest]
fn storing_the_same_task_twice_is_a_duplicate(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let project = Project::new("Sprint", "Sprint work", &DefaultClock)?;
        context.projects.store(&project).await?;
        let task = task_in(project.id(), "Standup", 9)?;
        context.tasks.store(&task).await?;

        let again = context.tasks.store(&task).await;
        eyre::ensure!(
            matches!(again, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
            "unexpected second store result: {again:?}"
        );
        eyre::Ok(())
    })
}

#[rstest]
fn deleting_a_project_row_cascades_to_its_tasks(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    rt.block_on(async {
        let project = Project::new("Sprint", "Sprint work", &DefaultClock)?;
        let other = Project::new("Ops", "Ops work", &DefaultClock)?;
        context.projects.store(&project).await?;
        context.projects.store(&other).await?;
        let doomed = task_in(project.id(), "Doomed", 9)?;
        let kept = task_in(other.id(), "Kept", 9)?;
        context.tasks.store(&doomed).await?;
        context.tasks.store(&kept).await?;

        context.projects.delete(project.id()).await?;

        eyre::ensure!(
            context.tasks.find_by_id(doomed.id()).await?.is_none(),
            "task row survived project deletion"
        );
        eyre::ensure!(
            context.tasks.find_by_id(kept.id()).await?.is_some(),
            "cascade reached another project"
        );
        eyre::Ok(())
    })
}

#[rstest]
fn interval_check_rejects_empty_windows_written_directly(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    let rt = runtime()?;
    let project_id = rt.block_on(async {
        let project = Project::new("Sprint", "Sprint work", &DefaultClock)?;
        context.projects.store(&project).await?;
        eyre::Ok(project.id())
    })?;

    let mut connection = context.pool.get()?;
    let inserted = diesel::sql_query(format!(
        "INSERT INTO tasks (id, project_id, title, start_time, end_time, created_at, updated_at) \
         VALUES ('{task}', '{project}', 'Empty', '2026-07-06T10:00:00Z', \
         '2026-07-06T10:00:00Z', now(), now())",
        task = Uuid::new_v4(),
        project = project_id.into_inner(),
    ))
    .execute(&mut connection);
    eyre::ensure!(
        matches!(
            inserted,
            Err(DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _))
        ),
        "empty window was stored: {inserted:?}"
    );
    Ok(())
}

#[rstest]
fn schema_bootstrap_is_idempotent(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let context = prepare(shared_test_cluster, 2)?;
    apply_schema(&context.pool)?;
    apply_schema(&context.pool)?;

    let rt = runtime()?;
    rt.block_on(async {
        let project = Project::new("Sprint", "Sprint work", &DefaultClock)?;
        context.projects.store(&project).await?;
        let listed = context.projects.list_all().await?;
        eyre::ensure!(
            listed.iter().map(Project::id).eq([project.id()]),
            "unexpected listing after bootstrap"
        );
        eyre::Ok(())
    })
}
