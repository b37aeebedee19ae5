//! Integration tests for sample downloads

mod common;

use std::sync::Arc;

use common::{config, zip_bytes, Reply, ScriptedClient, SAMPLES_URL};
use fxkit::prelude::*;

fn scaffolder(client: &Arc<ScriptedClient>) -> Scaffolder {
    Scaffolder::new(Arc::clone(client) as Arc<dyn HttpClient>, &config(None)).unwrap()
}

#[tokio::test]
async fn test_sample_is_extracted_from_its_folder() {
    let archive = zip_bytes(&[
        ("Samples-1.0.0/", ""),
        ("Samples-1.0.0/hello-world/README.md", "hello"),
        ("Samples-1.0.0/hello-world/src/app.js", "app"),
        ("Samples-1.0.0/other-sample/README.md", "other"),
    ]);
    let client = Arc::new(
        ScriptedClient::new().on(format!("{SAMPLES_URL}/v1.0.0.zip"), Reply::Ok(200, archive)),
    );
    let parent = tempfile::tempdir().unwrap();
    let dst = valid_sample_destination("hello-world", parent.path())
        .await
        .unwrap();

    let outcome = scaffolder(&client)
        .scaffold_from_sample(
            SampleRequest {
                name: "hello-world".into(),
                dst: dst.clone(),
            },
            &SampleErrorPolicy,
        )
        .await
        .unwrap();

    assert_eq!(outcome.files.len(), 2);
    assert_eq!(std::fs::read_to_string(dst.join("README.md")).unwrap(), "hello");
    assert!(dst.join("src/app.js").is_file());
    assert!(!parent.path().join("other-sample").exists());
}

#[tokio::test]
async fn test_failed_download_reports_sample() {
    let client = Arc::new(ScriptedClient::new());
    let dst = tempfile::tempdir().unwrap();

    let err = scaffolder(&client)
        .scaffold_from_sample(
            SampleRequest {
                name: "hello-world".into(),
                dst: dst.path().join("hello-world"),
            },
            &SampleErrorPolicy,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::FetchZipFromUrl(ref name) if name == "hello-world"));
    assert_eq!(err.code(), "FetchZipFromUrlError");
}

#[tokio::test]
async fn test_invalid_sample_name_is_rejected_before_download() {
    let client = Arc::new(ScriptedClient::new());
    let dst = tempfile::tempdir().unwrap();

    let err = scaffolder(&client)
        .scaffold_from_sample(
            SampleRequest {
                name: "../etc".into(),
                dst: dst.path().to_path_buf(),
            },
            &SampleErrorPolicy,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::FetchSampleUrl(_)));
    assert!(client.calls().is_empty());
}
