use forager_core::run::RunStatus;
use forager_db::RunRepository;

use crate::integration::common::{seed_source, setup_test_db};

#[tokio::test]
async fn create_run_starts_with_first_entry() {
    let (pool, _container) = setup_test_db().await;
    let repo = RunRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    let run_id = repo.create_run(source.id, "Starting scrape...").await.unwrap();

    let run = repo.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(run.source_id, source.id);
    assert_eq!(run.status, RunStatus::Running);
    assert_eq!(run.log_entries, vec!["Starting scrape..."]);
    assert!(run.completed_at.is_none());
}

#[tokio::test]
async fn append_log_preserves_order() {
    let (pool, _container) = setup_test_db().await;
    let repo = RunRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    let run_id = repo.create_run(source.id, "Starting scrape...").await.unwrap();
    repo.append_log(run_id, "Processing 12 potential jobs").await.unwrap();
    repo.append_log(run_id, "Inserted 4 jobs after filtering").await.unwrap();

    let run = repo.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(
        run.log_entries,
        vec![
            "Starting scrape...",
            "Processing 12 potential jobs",
            "Inserted 4 jobs after filtering",
        ]
    );
}

#[tokio::test]
async fn concurrent_appends_lose_nothing() {
    let (pool, _container) = setup_test_db().await;
    let repo = RunRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    let run_id = repo.create_run(source.id, "Starting scrape...").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..10 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.append_log(run_id, &format!("entry {i}")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let run = repo.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(run.log_entries.len(), 11);
}

#[tokio::test]
async fn finalize_run_records_outcome() {
    let (pool, _container) = setup_test_db().await;
    let repo = RunRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    let run_id = repo.create_run(source.id, "Starting scrape...").await.unwrap();
    repo.finalize_run(run_id, RunStatus::Success, 12, 4, None)
        .await
        .unwrap();

    let run = repo.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(run.jobs_found, 12);
    assert_eq!(run.jobs_inserted, 4);
    assert!(run.error_message.is_none());
    assert!(run.completed_at.is_some());
}

#[tokio::test]
async fn finalize_run_with_error_keeps_partial_counts() {
    let (pool, _container) = setup_test_db().await;
    let repo = RunRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    let run_id = repo.create_run(source.id, "Starting scrape...").await.unwrap();
    repo.finalize_run(run_id, RunStatus::Error, 12, 2, Some("insert storm"))
        .await
        .unwrap();

    let run = repo.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Error);
    assert_eq!(run.jobs_found, 12);
    assert_eq!(run.jobs_inserted, 2);
    assert_eq!(run.error_message.as_deref(), Some("insert storm"));
}

#[tokio::test]
async fn recent_runs_newest_first_with_limit() {
    let (pool, _container) = setup_test_db().await;
    let repo = RunRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    let mut ids = Vec::new();
    for i in 0..4 {
        let id = repo
            .create_run(source.id, &format!("run {i}"))
            .await
            .unwrap();
        ids.push(id);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let runs = repo.recent_runs(source.id, 3).await.unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].id, ids[3]);
    assert_eq!(runs[1].id, ids[2]);
    assert_eq!(runs[2].id, ids[1]);
}
