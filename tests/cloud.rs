use docinput::io::cloud::helpers::parse_s3_uri;
use docinput::io::cloud::*;

fn job_bucket() -> CloudResult<FakeObjectIO> {
    let store = FakeObjectIO::new();
    store.put_object("test-job-bucket", "input/2011/11/02/tfidf1", b"1")?;
    store.put_object("test-job-bucket", "input/2011/11/02/tfidf2", b"22")?;
    store.put_object("test-job-bucket", "input/2011/11/03/_SUCCESS", b"")?;
    store.put_object("test-job-bucket", "output/2011/11/02/tfidf1", b"1")?;
    Ok(store)
}

#[test]
fn lists_every_key_in_order() -> CloudResult<()> {
    let store = job_bucket()?;
    let keys = list_object_keys(&store, "test-job-bucket", false)?;
    assert_eq!(
        keys,
        vec![
            "input/2011/11/02/tfidf1",
            "input/2011/11/02/tfidf2",
            "input/2011/11/03/_SUCCESS",
            "output/2011/11/02/tfidf1",
        ]
    );
    Ok(())
}

#[test]
fn blank_objects_can_be_excluded() -> CloudResult<()> {
    let store = job_bucket()?;
    let keys = list_object_keys(&store, "test-job-bucket", true)?;
    assert!(!keys.iter().any(|k| k.ends_with("_SUCCESS")));
    assert_eq!(keys.len(), 3);
    Ok(())
}

#[test]
fn missing_bucket_is_not_found() {
    let store = FakeObjectIO::new();
    let err = list_object_keys(&store, "nope", false).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[test]
fn empty_bucket_lists_nothing() -> CloudResult<()> {
    let store = FakeObjectIO::new();
    store.create_bucket("fresh");
    assert!(list_object_keys(&store, "fresh", false)?.is_empty());
    Ok(())
}

#[test]
fn folder_listing_filters_by_prefix() -> CloudResult<()> {
    let store = job_bucket()?;
    let keys = list_objects_in_folder(&store, "test-job-bucket", "output/")?;
    assert_eq!(keys, vec!["output/2011/11/02/tfidf1"]);
    Ok(())
}

#[test]
fn transient_listing_failures_are_retried() -> CloudResult<()> {
    let store = job_bucket()?;
    store.fail_next(ErrorKind::Network);
    store.fail_next(ErrorKind::RateLimited);
    let keys = list_object_keys(&store, "test-job-bucket", false)?;
    assert_eq!(keys.len(), 4);
    Ok(())
}

#[test]
fn permanent_failures_are_not_retried() -> CloudResult<()> {
    let store = job_bucket()?;
    store.fail_next(ErrorKind::Authorization);
    let err = list_object_keys(&store, "test-job-bucket", false).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    // the queued failure was consumed; the next call succeeds
    assert_eq!(list_object_keys(&store, "test-job-bucket", false)?.len(), 4);
    Ok(())
}

#[test]
fn all_objects_exist_checks_each_key() -> CloudResult<()> {
    let store = job_bucket()?;
    assert!(all_objects_exist(
        &store,
        "test-job-bucket",
        &["input/2011/11/02/tfidf1", "output/2011/11/02/tfidf1"]
    ));
    assert!(!all_objects_exist(
        &store,
        "test-job-bucket",
        &["input/2011/11/02/tfidf1", "output/2011/11/02/tfidf2"]
    ));
    assert!(!all_objects_exist(&store, "missing-bucket", &["input/a"]));
    assert!(all_objects_exist::<&str>(&store, "test-job-bucket", &[]));
    Ok(())
}

#[test]
fn all_uris_exist_checks_bucket_and_key() -> CloudResult<()> {
    let store = job_bucket()?;
    assert!(all_uris_exist(
        &store,
        &[
            "s3://test-job-bucket/input/2011/11/02/tfidf1",
            "s3n://test-job-bucket/output/2011/11/02/tfidf1",
        ]
    ));
    assert!(!all_uris_exist(&store, &["s3://test-job-bucket/input/missing"]));
    assert!(!all_uris_exist(&store, &["s3://other-bucket/input/2011/11/02/tfidf1"]));
    assert!(!all_uris_exist(&store, &["hdfs://test-job-bucket/input/2011/11/02/tfidf1"]));
    Ok(())
}

#[test]
fn metadata_reports_size() -> CloudResult<()> {
    let store = job_bucket()?;
    let meta = store.get_metadata("test-job-bucket", "input/2011/11/02/tfidf2")?;
    assert_eq!(meta.size, 2);
    assert_eq!(
        store.get_metadata("test-job-bucket", "nope").unwrap_err().kind,
        ErrorKind::NotFound
    );
    Ok(())
}

#[test]
fn parses_bucket_and_key() -> CloudResult<()> {
    let (bucket, key) = parse_s3_uri("s3://test-job-bucket/input/2011/11/02/tfidf1")?;
    assert_eq!(bucket, "test-job-bucket");
    assert_eq!(key, "input/2011/11/02/tfidf1");
    Ok(())
}
