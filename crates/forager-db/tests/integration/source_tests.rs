use forager_core::source::SourceStatus;
use forager_core::traits::SourceStore;
use forager_core::{CreateSourceRequest, SCRAPER_TYPE_APIFY_ACTOR};
use forager_db::SourceRepository;

use crate::integration::common::{seed_source, setup_test_db};

#[tokio::test]
async fn create_and_list_sources() {
    let (pool, _container) = setup_test_db().await;
    let repo = SourceRepository::new(pool);

    let req = CreateSourceRequest::new("Upwork SDR", "https://upwork.com/jobs")
        .with_config(serde_json::json!({"actorId": "acme/job-scraper", "input": {"q": "sdr"}}));
    let created = repo.create_source(&req).await.unwrap();

    assert_eq!(created.name, "Upwork SDR");
    assert_eq!(created.scraper_type, SCRAPER_TYPE_APIFY_ACTOR);
    assert_eq!(created.last_status, SourceStatus::Idle);
    assert!(created.enabled);
    assert_eq!(created.actor_id(), Some("acme/job-scraper"));

    let sources = repo.list_sources().await.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].id, created.id);
}

#[tokio::test]
async fn list_sources_newest_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = SourceRepository::new(pool.clone());

    seed_source(&pool, "First", "https://a.example.com").await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = seed_source(&pool, "Second", "https://b.example.com").await;

    let sources = repo.list_sources().await.unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].id, second.id);
}

#[tokio::test]
async fn delete_source_reports_whether_it_existed() {
    let (pool, _container) = setup_test_db().await;
    let repo = SourceRepository::new(pool.clone());

    let source = seed_source(&pool, "Doomed", "https://example.com").await;

    assert!(repo.delete_source(source.id).await.unwrap());
    assert!(!repo.delete_source(source.id).await.unwrap());
    assert!(repo.get_source(source.id).await.unwrap().is_none());
}

#[tokio::test]
async fn status_transitions_stamp_and_clear_fields() {
    let (pool, _container) = setup_test_db().await;
    let repo = SourceRepository::new(pool.clone());

    let source = seed_source(&pool, "Board", "https://example.com").await;
    assert!(source.last_run_at.is_none());

    repo.mark_running(source.id).await.unwrap();
    let running = repo.get_source(source.id).await.unwrap().unwrap();
    assert_eq!(running.last_status, SourceStatus::Running);
    assert!(running.last_run_at.is_some());

    repo.mark_failed(source.id, "actor exploded").await.unwrap();
    let failed = repo.get_source(source.id).await.unwrap().unwrap();
    assert_eq!(failed.last_status, SourceStatus::Error);
    assert_eq!(failed.last_error.as_deref(), Some("actor exploded"));
    // mark_failed records the error without touching the run timestamp
    assert_eq!(failed.last_run_at, running.last_run_at);

    repo.mark_succeeded(source.id).await.unwrap();
    let succeeded = repo.get_source(source.id).await.unwrap().unwrap();
    assert_eq!(succeeded.last_status, SourceStatus::Success);
    assert!(succeeded.last_error.is_none());
}
