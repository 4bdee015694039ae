use chrono::Utc;
use forager_core::posting::{ContractType, NewJob, PaymentTerms};
use forager_db::{JobQuery, JobRepository};
use uuid::Uuid;

use crate::integration::common::{seed_source, setup_test_db};

fn ote_job(source_id: Uuid, title: &str, location: &str, ote: (i64, i64), tags: &[&str]) -> NewJob {
    NewJob {
        title: title.into(),
        company: "Acme".into(),
        company_size: Some(40),
        ote_min: Some(ote.0),
        ote_max: Some(ote.1),
        location: location.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        apply_url: "https://example.com/apply".into(),
        source_id,
        source_name: "Board".into(),
        scraped_at: Utc::now(),
        contract_type: ContractType::Ote,
        hourly_rate: None,
        payment_terms: None,
        is_payment_verified: false,
        rating: None,
        project_type: None,
        allowed_locations: vec!["Remote".into(), "United States".into()],
    }
}

#[tokio::test]
async fn insert_job_roundtrip() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    let mut new_job = ote_job(source.id, "SDR", "Remote", (60_000, 90_000), &["SaaS", "Sales"]);
    new_job.contract_type = ContractType::Hourly;
    new_job.hourly_rate = Some(25.0);
    new_job.payment_terms = Some(PaymentTerms::HourlyPlusCommission);
    new_job.is_payment_verified = true;
    new_job.rating = Some(4.8);

    let id = repo.insert_job(&new_job).await.unwrap();
    assert!(!id.is_nil());

    let jobs = repo.list_jobs(&JobQuery::default()).await.unwrap();
    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert_eq!(job.id, id);
    assert_eq!(job.title, "SDR");
    assert_eq!(job.contract_type, ContractType::Hourly);
    assert_eq!(job.hourly_rate, Some(25.0));
    assert_eq!(job.payment_terms, Some(PaymentTerms::HourlyPlusCommission));
    assert!(job.is_payment_verified);
    assert_eq!(job.rating, Some(4.8));
    assert_eq!(job.tags, vec!["SaaS", "Sales"]);
    assert_eq!(job.allowed_locations, vec!["Remote", "United States"]);
}

#[tokio::test]
async fn list_jobs_filters_by_location_and_ote() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    repo.insert_job(&ote_job(source.id, "A", "Remote", (60_000, 90_000), &[]))
        .await
        .unwrap();
    repo.insert_job(&ote_job(source.id, "B", "United States", (80_000, 120_000), &[]))
        .await
        .unwrap();
    repo.insert_job(&ote_job(source.id, "C", "Canada", (50_000, 70_000), &[]))
        .await
        .unwrap();

    let by_location = repo
        .list_jobs(&JobQuery {
            locations: vec!["Remote".into(), "Canada".into()],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_location.len(), 2);
    assert!(by_location.iter().all(|j| j.location != "United States"));

    let by_floor = repo
        .list_jobs(&JobQuery {
            ote_min: Some(60_000),
            ..Default::default()
        })
        .await
        .unwrap();
    let titles: Vec<&str> = by_floor.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(by_floor.len(), 2);
    assert!(titles.contains(&"A") && titles.contains(&"B"));

    let by_ceiling = repo
        .list_jobs(&JobQuery {
            ote_max: Some(90_000),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_ceiling.len(), 2);
}

#[tokio::test]
async fn list_jobs_filters_tags_by_substring() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobRepository::new(pool.clone());
    let source = seed_source(&pool, "Board", "https://example.com").await;

    repo.insert_job(&ote_job(source.id, "A", "Remote", (60_000, 90_000), &["B2B SaaS"]))
        .await
        .unwrap();
    repo.insert_job(&ote_job(source.id, "B", "Remote", (60_000, 90_000), &["Fintech"]))
        .await
        .unwrap();

    let jobs = repo
        .list_jobs(&JobQuery {
            tags: vec!["saas".into()],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "A");
}

#[tokio::test]
async fn list_jobs_filters_by_source() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobRepository::new(pool.clone());
    let first = seed_source(&pool, "First", "https://a.example.com").await;
    let second = seed_source(&pool, "Second", "https://b.example.com").await;

    repo.insert_job(&ote_job(first.id, "A", "Remote", (60_000, 90_000), &[]))
        .await
        .unwrap();
    repo.insert_job(&ote_job(second.id, "B", "Remote", (60_000, 90_000), &[]))
        .await
        .unwrap();

    let jobs = repo
        .list_jobs(&JobQuery {
            source_id: Some(second.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "B");
}
