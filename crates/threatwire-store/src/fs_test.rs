use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use super::*;

const BASE_URL: &str = "http://localhost:3000/articles";

fn document(name: &str, body: &str) -> RenderedDocument {
    RenderedDocument {
        filename: name.to_string(),
        html_bytes: body.as_bytes().to_vec(),
        size: body.len() as u64,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
    }
}

fn store_in(dir: &TempDir) -> FsArticleStore {
    FsArticleStore::new(dir.path().join("articles"), BASE_URL)
}

#[tokio::test]
async fn put_writes_document_and_reports_summary() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let outcome = store
        .put(&document("example-com-20240501-1030.html", "<html>hi</html>"))
        .await
        .unwrap();

    let summary = match outcome {
        PutOutcome::Created(summary) => summary,
        other => panic!("expected a fresh write, got {other:?}"),
    };
    assert_eq!(summary.name, "example-com-20240501-1030.html");
    assert_eq!(
        summary.url,
        "http://localhost:3000/articles/example-com-20240501-1030.html"
    );
    assert_eq!(summary.size, 15);

    let on_disk = std::fs::read(store.root().join("example-com-20240501-1030.html")).unwrap();
    assert_eq!(on_disk, b"<html>hi</html>");
}

#[tokio::test]
async fn second_put_with_same_name_keeps_first_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store
        .put(&document("dup-20240501-1030.html", "first"))
        .await
        .unwrap();
    let outcome = store
        .put(&document("dup-20240501-1030.html", "second, longer"))
        .await
        .unwrap();

    assert!(matches!(outcome, PutOutcome::Existing(ref s) if s.size == 5));
    assert_eq!(store.get("dup-20240501-1030.html").await.unwrap().unwrap(), b"first");
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_puts_of_one_name_create_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(store_in(&dir));

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .put(&document("race-20240501-1030.html", &format!("writer {i}")))
                .await
                .unwrap()
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_created() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_of_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.list().await.unwrap().is_empty());
    assert_eq!(store.delete_all().await.unwrap(), DeleteReport::default());
}

#[tokio::test]
async fn list_skips_foreign_and_staging_files_and_sorts_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store
        .put(&document("alpha-20240501-1030.html", "a"))
        .await
        .unwrap();
    store
        .put(&document("beta-20240501-1030.html", "b"))
        .await
        .unwrap();
    std::fs::write(store.root().join("notes.txt"), "ignore me").unwrap();
    std::fs::write(store.root().join(".alpha.html.abc.tmp"), "staging").unwrap();
    std::fs::create_dir(store.root().join("nested.html")).unwrap();

    let names: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["beta-20240501-1030.html", "alpha-20240501-1030.html"]);
}

#[tokio::test]
async fn get_returns_none_for_unknown_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.get("missing-20240501-1030.html").await.unwrap().is_none());
}

#[tokio::test]
async fn get_and_put_reject_unsafe_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert!(matches!(
        store.get("../secret.html").await,
        Err(StoreError::InvalidName { .. })
    ));
    assert!(matches!(
        store.put(&document("../escape.html", "x")).await,
        Err(StoreError::InvalidName { .. })
    ));
}

#[tokio::test]
async fn delete_all_removes_documents_and_leaves_other_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    for name in ["a-20240501-1030.html", "b-20240501-1030.html"] {
        store.put(&document(name, "x")).await.unwrap();
    }
    std::fs::write(store.root().join("keep.txt"), "keep").unwrap();

    let report = store.delete_all().await.unwrap();
    assert_eq!(report.deleted, 2);
    assert!(report.failures.is_empty());
    assert!(store.list().await.unwrap().is_empty());
    assert!(store.root().join("keep.txt").exists());
}

#[tokio::test]
async fn delete_all_reports_partial_failures() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store
        .put(&document("ok-20240501-1030.html", "x"))
        .await
        .unwrap();
    // a directory with a document name cannot be removed as a file
    std::fs::create_dir(store.root().join("stuck.html")).unwrap();

    let report = store.delete_all().await.unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "stuck.html");
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn put_leaves_only_the_document_in_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store
        .put(&document("solo-20240501-1030.html", "x"))
        .await
        .unwrap();
    store
        .put(&document("solo-20240501-1030.html", "again"))
        .await
        .unwrap();

    let entries: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, ["solo-20240501-1030.html"]);
}

#[test]
fn staging_file_is_removed_when_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".half-written.html.tmp");
    std::fs::write(&path, "partial").unwrap();

    drop(StagingFile { path: path.clone() });
    assert!(!path.exists());

    // already gone: nothing to do
    drop(StagingFile { path });
}

#[tokio::test]
async fn delete_all_only_touches_names_list_would_show() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store
        .put(&document("shown-20240501-1030.html", "x"))
        .await
        .unwrap();
    std::fs::write(store.root().join("a b.html"), "foreign").unwrap();
    std::fs::write(store.root().join("x..y.html"), "foreign").unwrap();

    assert_eq!(store.list().await.unwrap().len(), 1);
    let report = store.delete_all().await.unwrap();
    assert_eq!(report.deleted, 1);
    assert!(report.failures.is_empty());
    assert!(store.root().join("a b.html").exists());
    assert!(store.root().join("x..y.html").exists());
}
