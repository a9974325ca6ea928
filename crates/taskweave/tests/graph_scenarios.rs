//! End-to-end graph scenarios against the in-memory store.
//!
//! Every mutation goes through `taskweave::engine`, the same path the CLI
//! takes.

use taskweave::domain::TaskStatus::{self, Blocked, Completed, InProgress, Pending};
use taskweave::domain::{NewTask, TaskId};
use taskweave::engine;
use taskweave::error::Error;
use taskweave::graph::{CycleCheck, recompute_status};
use taskweave::storage::TaskStorage;
use taskweave::storage::in_memory::new_in_memory_storage;

/// Store with `count` pending tasks, IDs 1..=count.
async fn store_with_tasks(count: u64) -> Box<dyn TaskStorage> {
    let mut store = new_in_memory_storage();
    for n in 1..=count {
        let task = store
            .create(NewTask::titled(format!("Task {n}")))
            .await
            .unwrap();
        assert_eq!(task.id, TaskId(n));
    }
    store
}

async fn link(store: &mut dyn TaskStorage, task: u64, depends_on: u64) {
    engine::add_dependency(store, &TaskId(task), &TaskId(depends_on))
        .await
        .unwrap();
}

async fn status(store: &dyn TaskStorage, id: u64) -> TaskStatus {
    store.get_task(&TaskId(id)).await.unwrap().unwrap().status
}

#[tokio::test]
async fn test_cycle_rejected_with_path() {
    let mut store = store_with_tasks(3).await;
    link(store.as_mut(), 1, 2).await;
    link(store.as_mut(), 2, 3).await;

    let err = engine::add_dependency(store.as_mut(), &TaskId(3), &TaskId(1))
        .await
        .unwrap_err();

    match err {
        Error::CyclicDependency { path } => {
            assert_eq!(path, vec![TaskId(3), TaskId(1), TaskId(2), TaskId(3)]);
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert!(store.dependencies_of(&TaskId(3)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_forward_edge_accepted() {
    let mut store = store_with_tasks(3).await;
    link(store.as_mut(), 1, 2).await;
    link(store.as_mut(), 2, 3).await;

    let check = engine::check_dependency(store.as_ref(), &TaskId(1), &TaskId(3))
        .await
        .unwrap();
    assert_eq!(check, CycleCheck::Acyclic);

    link(store.as_mut(), 1, 3).await;
    assert_eq!(
        store.dependencies_of(&TaskId(1)).await.unwrap(),
        vec![TaskId(2), TaskId(3)]
    );
}

#[tokio::test]
async fn test_duplicate_edge_rejected() {
    let mut store = store_with_tasks(2).await;
    link(store.as_mut(), 1, 2).await;

    let err = engine::add_dependency(store.as_mut(), &TaskId(1), &TaskId(2))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateDependency { .. }));
}

#[tokio::test]
async fn test_blocked_cascades_up_chain() {
    let mut store = store_with_tasks(3).await;
    link(store.as_mut(), 1, 2).await;
    link(store.as_mut(), 2, 3).await;

    let changes = engine::update_status(store.as_mut(), &TaskId(3), Blocked)
        .await
        .unwrap();

    let order: Vec<_> = changes.iter().map(|c| c.task_id.get()).collect();
    assert_eq!(order, vec![3, 2, 1]);
    assert_eq!(status(store.as_ref(), 2).await, Blocked);
    assert_eq!(status(store.as_ref(), 1).await, Blocked);
}

#[tokio::test]
async fn test_completion_readies_dependent() {
    let mut store = store_with_tasks(2).await;
    link(store.as_mut(), 1, 2).await;

    engine::update_status(store.as_mut(), &TaskId(2), Completed)
        .await
        .unwrap();

    assert_eq!(status(store.as_ref(), 1).await, InProgress);
}

#[tokio::test]
async fn test_chain_completes_one_link_at_a_time() {
    let mut store = store_with_tasks(3).await;
    link(store.as_mut(), 1, 2).await;
    link(store.as_mut(), 2, 3).await;

    engine::update_status(store.as_mut(), &TaskId(3), Completed)
        .await
        .unwrap();
    assert_eq!(status(store.as_ref(), 2).await, InProgress);
    assert_eq!(status(store.as_ref(), 1).await, Pending);

    engine::update_status(store.as_mut(), &TaskId(2), Completed)
        .await
        .unwrap();
    assert_eq!(status(store.as_ref(), 1).await, InProgress);
}

#[tokio::test]
async fn test_diamond_join_needs_both_branches() {
    // 1 depends on 2 and 3; both depend on 4.
    let mut store = store_with_tasks(4).await;
    link(store.as_mut(), 1, 2).await;
    link(store.as_mut(), 1, 3).await;
    link(store.as_mut(), 2, 4).await;
    link(store.as_mut(), 3, 4).await;

    engine::update_status(store.as_mut(), &TaskId(4), Completed)
        .await
        .unwrap();
    assert_eq!(status(store.as_ref(), 2).await, InProgress);
    assert_eq!(status(store.as_ref(), 3).await, InProgress);
    assert_eq!(status(store.as_ref(), 1).await, Pending);

    engine::update_status(store.as_mut(), &TaskId(2), Completed)
        .await
        .unwrap();
    assert_eq!(status(store.as_ref(), 1).await, Pending);

    engine::update_status(store.as_mut(), &TaskId(3), Completed)
        .await
        .unwrap();
    assert_eq!(status(store.as_ref(), 1).await, InProgress);
}

#[tokio::test]
async fn test_completed_dependent_stays_completed() {
    let mut store = store_with_tasks(2).await;
    link(store.as_mut(), 1, 2).await;
    engine::update_status(store.as_mut(), &TaskId(1), Completed)
        .await
        .unwrap();

    let changes = engine::update_status(store.as_mut(), &TaskId(2), Blocked)
        .await
        .unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(status(store.as_ref(), 1).await, Completed);
}

#[tokio::test]
async fn test_no_dependencies_keeps_status() {
    let mut store = store_with_tasks(1).await;
    engine::update_status(store.as_mut(), &TaskId(1), Blocked)
        .await
        .unwrap();

    let changed = recompute_status(store.as_mut(), &TaskId(1)).await.unwrap();

    assert!(!changed);
    assert_eq!(status(store.as_ref(), 1).await, Blocked);
}

#[tokio::test]
async fn test_new_blocked_dependency_blocks_source() {
    let mut store = store_with_tasks(2).await;
    engine::update_status(store.as_mut(), &TaskId(2), Blocked)
        .await
        .unwrap();

    let changes = engine::add_dependency(store.as_mut(), &TaskId(1), &TaskId(2))
        .await
        .unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(status(store.as_ref(), 1).await, Blocked);
}

#[tokio::test]
async fn test_remove_dependency_rederives_source() {
    let mut store = store_with_tasks(3).await;
    engine::update_status(store.as_mut(), &TaskId(2), Blocked)
        .await
        .unwrap();
    engine::update_status(store.as_mut(), &TaskId(3), Completed)
        .await
        .unwrap();
    link(store.as_mut(), 1, 2).await;
    link(store.as_mut(), 1, 3).await;
    assert_eq!(status(store.as_ref(), 1).await, Blocked);

    engine::remove_dependency(store.as_mut(), &TaskId(1), &TaskId(2))
        .await
        .unwrap();

    assert_eq!(status(store.as_ref(), 1).await, InProgress);
}

#[tokio::test]
async fn test_delete_cascades_edges() {
    let mut store = store_with_tasks(3).await;
    link(store.as_mut(), 1, 2).await;
    link(store.as_mut(), 2, 3).await;

    engine::delete_task(store.as_mut(), &TaskId(2)).await.unwrap();

    assert!(store.get_task(&TaskId(2)).await.unwrap().is_none());
    assert!(store.dependencies_of(&TaskId(1)).await.unwrap().is_empty());
    assert!(store.dependents_of(&TaskId(3)).await.unwrap().is_empty());
    let task = store.get_task(&TaskId(1)).await.unwrap().unwrap();
    assert!(task.dependencies.is_empty());
}

#[tokio::test]
async fn test_deep_chain_propagates_without_recursion() {
    const DEPTH: u64 = 10_000;
    let mut store = store_with_tasks(DEPTH).await;
    // Linked top-down so each cycle check starts from a task with no
    // dependencies yet.
    for id in (2..=DEPTH).rev() {
        link(store.as_mut(), id, id - 1).await;
    }

    let changes = engine::update_status(store.as_mut(), &TaskId(1), Blocked)
        .await
        .unwrap();

    assert_eq!(changes.len(), DEPTH as usize);
    assert_eq!(status(store.as_ref(), DEPTH).await, Blocked);

    let check = engine::check_dependency(store.as_ref(), &TaskId(1), &TaskId(DEPTH))
        .await
        .unwrap();
    assert_eq!(check.path().len(), DEPTH as usize + 1);
}
