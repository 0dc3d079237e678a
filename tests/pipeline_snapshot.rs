use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use upstat::config::UploadConfig;
use upstat::outcome::FailureKind;
use upstat::pipeline::UploadPipeline;
use upstat::store::fs::JsonSnapshotFile;

fn setup() -> (TempDir, UploadPipeline<JsonSnapshotFile>) {
    let dir = TempDir::new().unwrap();
    let sink = JsonSnapshotFile::new(dir.path());
    let pipeline = UploadPipeline::open(UploadConfig::default(), sink).unwrap();
    (dir, pipeline)
}

fn read_snapshot(dir: &TempDir) -> Value {
    let content = fs::read_to_string(dir.path().join("local.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_snapshot_document_shape() {
    let (dir, pipeline) = setup();
    let record = pipeline
        .upload("test.txt", Some(b"Hello World\nSecond line"))
        .into_record()
        .unwrap();

    let json = read_snapshot(&dir);
    assert_eq!(json["totalRecords"], 1);
    assert!(json["lastUpdated"].is_string());

    let entry = &json["records"][0];
    assert_eq!(entry["id"], record.id().to_string());
    assert_eq!(entry["fileName"], "test.txt");
    assert_eq!(entry["lineCount"], 2);
    assert_eq!(entry["wordCount"], 4);
    assert_eq!(entry["fileSize"], 23);
    assert!(entry["processedAt"].is_string());
}

#[test]
fn test_rejections_do_not_touch_snapshot() {
    let (dir, pipeline) = setup();

    let result = pipeline.upload("document.pdf", Some(b"some content"));
    assert_eq!(result.failure_kind(), Some(FailureKind::InvalidType));
    assert!(!dir.path().join("local.json").exists());

    pipeline.upload("ok.txt", Some(b"fine"));
    pipeline.upload("", Some(b"content"));
    pipeline.upload("test.txt", None);

    assert_eq!(read_snapshot(&dir)["totalRecords"], 1);
}

#[test]
fn test_reopen_appends_to_existing_records() {
    let (dir, pipeline) = setup();
    pipeline.upload("a.txt", Some(b"a"));
    pipeline.upload("b.txt", Some(b"b"));
    drop(pipeline);

    let reopened =
        UploadPipeline::open(UploadConfig::default(), JsonSnapshotFile::new(dir.path())).unwrap();
    assert_eq!(reopened.len(), 2);

    reopened.upload("c.csv", Some(b"c"));

    let json = read_snapshot(&dir);
    assert_eq!(json["totalRecords"], 3);
    let ids: HashSet<String> = json["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_unwritable_snapshot_does_not_fail_uploads() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let pipeline = UploadPipeline::new(UploadConfig::default(), JsonSnapshotFile::new(&blocker));
    let result = pipeline.upload("test.txt", Some(b"kept in memory"));

    assert!(result.is_success());
    assert_eq!(pipeline.len(), 1);
}

#[test]
fn test_corrupt_snapshot_refuses_to_open() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("local.json"), "not json").unwrap();

    let opened = UploadPipeline::open(UploadConfig::default(), JsonSnapshotFile::new(dir.path()));
    assert!(opened.is_err());
}
