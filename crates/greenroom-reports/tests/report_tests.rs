use chrono::{Duration, Utc};
use tempfile::TempDir;

use greenroom_oracle::{JobRole, QaPair};
use greenroom_reports::{ReportFilter, ReportRecord, ReportStore};

fn sample_record(role: JobRole) -> ReportRecord {
    ReportRecord::new(
        role,
        3,
        vec![
            QaPair::new("Intro", "Hi, ready"),
            QaPair::new("What is a PivotTable?", "A summary table over raw data"),
        ],
        "## Overall Decision: PASS\n\n## Score: 80/100".to_string(),
    )
}

#[test]
fn test_save_and_get_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::with_dir(dir.path().to_path_buf());

    let record = sample_record(JobRole::DataAnalyst);
    let path = store.save(&record).unwrap();
    assert!(path.exists());
    assert_eq!(path.extension().unwrap(), "json");

    let loaded = store.get(&record.id).unwrap();
    assert_eq!(loaded.id, record.id);
    assert_eq!(loaded.role, JobRole::DataAnalyst);
    assert_eq!(loaded.question_limit, 3);
    assert_eq!(loaded.history.len(), 2);
    assert_eq!(loaded.evaluation, record.evaluation);
}

#[test]
fn test_record_ids_are_unique_per_interview() {
    let a = sample_record(JobRole::DataAnalyst);
    let b = sample_record(JobRole::FinancialAnalyst);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_list_empty_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::with_dir(dir.path().join("missing"));
    let summaries = store.list(&ReportFilter::default()).unwrap();
    assert!(summaries.is_empty());
}

#[test]
fn test_list_filters_by_role() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::with_dir(dir.path().to_path_buf());

    store.save(&sample_record(JobRole::DataAnalyst)).unwrap();
    store.save(&sample_record(JobRole::FinancialAnalyst)).unwrap();

    let all = store.list(&ReportFilter::default()).unwrap();
    assert_eq!(all.len(), 2);

    let filter = ReportFilter {
        role: Some(JobRole::FinancialAnalyst),
        ..Default::default()
    };
    let filtered = store.list(&filter).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].role, JobRole::FinancialAnalyst);
}

#[test]
fn test_list_filters_by_time_window() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::with_dir(dir.path().to_path_buf());
    store.save(&sample_record(JobRole::DataAnalyst)).unwrap();

    let future_only = ReportFilter {
        after: Some(Utc::now() + Duration::hours(1)),
        ..Default::default()
    };
    assert!(store.list(&future_only).unwrap().is_empty());

    let recent = ReportFilter {
        after: Some(Utc::now() - Duration::hours(1)),
        before: Some(Utc::now() + Duration::hours(1)),
        ..Default::default()
    };
    assert_eq!(store.list(&recent).unwrap().len(), 1);
}

#[test]
fn test_list_skips_unparseable_files() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::with_dir(dir.path().to_path_buf());
    store.save(&sample_record(JobRole::DataAnalyst)).unwrap();

    std::fs::write(dir.path().join("garbage.json"), "not json").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let summaries = store.list(&ReportFilter::default()).unwrap();
    assert_eq!(summaries.len(), 1);
}

#[test]
fn test_get_rejects_traversal_ids() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::with_dir(dir.path().join("reports"));

    // A parseable record sitting outside the reports dir must stay unreachable
    let record = sample_record(JobRole::DataAnalyst);
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(
        dir.path().join("outside.json"),
        serde_json::to_string(&record).unwrap(),
    )
    .unwrap();

    assert!(store.get("../outside").is_err());
    assert!(store.get("..\\outside").is_err());
    assert!(store.get("a/b").is_err());
    assert!(store.get("..").is_err());
}

#[test]
fn test_summary_preview_is_truncated() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::with_dir(dir.path().to_path_buf());

    let mut record = sample_record(JobRole::OperationsAnalyst);
    record.evaluation = "x".repeat(500);
    store.save(&record).unwrap();

    let summaries = store.list(&ReportFilter::default()).unwrap();
    assert_eq!(summaries[0].evaluation_preview.len(), 120);
    assert_eq!(summaries[0].turns, 2);
}
