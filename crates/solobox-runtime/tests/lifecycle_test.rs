//! End-to-end lifecycle tests against a canned-response registry stub
//! and a recording isolation provider.
//!
//! Covered properties:
//! - the alpine-shaped scenario: auth, two-layer manifest, ordered
//!   extraction, isolation, execution, exit 0
//! - exit-code pass-through for a non-zero child
//! - pre-execution failures (auth, manifest, extraction, isolation,
//!   spawn) never isolate or spawn further, and always restore the
//!   host root exactly once

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};

use solobox_common::config::LaunchConfig;
use solobox_common::types::ImageReference;
use solobox_core::isolation::fake::FakeIsolation;
use solobox_runtime::lifecycle::{Orchestrator, Outcome, Stage};

/// Serves one canned HTTP response per entry, in request order, then
/// shuts down. The pipeline is strictly sequential, so order-based
/// dispatch is enough.
fn stub_registry(responses: Vec<(u16, Vec<u8>)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
    let base = format!("http://{}", listener.local_addr().expect("addr failed"));
    let _handle = std::thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = [0_u8; 4096];
            let _ = stream.read(&mut buf);
            let head = format!(
                "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
    });
    base
}

/// Builds an in-memory tar containing one file.
fn tar_with_file(path: &str, content: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, path, content)
        .expect("failed to append data");
    builder.into_inner().expect("failed to finish tar")
}

fn manifest_json(layer_blobs: &[&[u8]]) -> Vec<u8> {
    let layers: Vec<String> = layer_blobs
        .iter()
        .map(|blob| {
            format!(
                r#"{{"mediaType": "application/vnd.docker.image.rootfs.diff.tar",
                     "size": {}, "digest": "sha256:{}"}}"#,
                blob.len(),
                solobox_image::digest::sha256_hex(blob)
            )
        })
        .collect();
    format!(
        r#"{{"schemaVersion": 2, "layers": [{}]}}"#,
        layers.join(",")
    )
    .into_bytes()
}

const TOKEN_BODY: &[u8] = br#"{"token": "test-token"}"#;

/// Full happy-path responses for an image with the given layer blobs.
fn happy_responses(layer_blobs: &[&[u8]]) -> Vec<(u16, Vec<u8>)> {
    let mut responses = vec![
        (200, TOKEN_BODY.to_vec()),
        (200, manifest_json(layer_blobs)),
    ];
    for blob in layer_blobs {
        responses.push((200, blob.to_vec()));
    }
    responses
}

struct TestRun {
    _scratch: tempfile::TempDir,
    orchestrator: Orchestrator<FakeIsolation>,
}

fn orchestrator_for(base: &str, provider: FakeIsolation) -> TestRun {
    let scratch = tempfile::tempdir().expect("failed to create tempdir");
    let config = LaunchConfig {
        registry_url: base.to_string(),
        auth_url: format!("{base}/token"),
        scratch_dir: scratch.path().to_path_buf(),
        ..LaunchConfig::default()
    };
    TestRun {
        _scratch: scratch,
        orchestrator: Orchestrator::new(&config, provider),
    }
}

fn alpine() -> ImageReference {
    ImageReference::parse("alpine").expect("parse failed")
}

fn no_args() -> Vec<String> {
    Vec::new()
}

#[test]
fn scenario_two_layer_image_runs_command_and_exits_zero() {
    let layer_one = tar_with_file("etc/one", b"1\n");
    let layer_two = tar_with_file("etc/two", b"2\n");
    let base = stub_registry(happy_responses(&[&layer_one, &layer_two]));

    let mut run = orchestrator_for(&base, FakeIsolation::new());
    let outcome = run
        .orchestrator
        .launch(&alpine(), Path::new("/bin/echo"), &["hi".into()]);

    assert!(matches!(outcome, Outcome::ChildExited(0)));
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(run.orchestrator.stage(), Stage::Terminated);

    let fake = run.orchestrator.provider();
    assert!(fake.isolated_path.is_some());
    assert!(fake.pid_namespaced);
    assert_eq!(fake.restore_calls, 1);
}

#[test]
fn child_exit_status_passes_through_exactly() {
    let layer = tar_with_file("etc/one", b"1\n");
    let base = stub_registry(happy_responses(&[&layer]));

    let mut run = orchestrator_for(&base, FakeIsolation::new());
    let outcome = run.orchestrator.launch(
        &alpine(),
        Path::new("/bin/sh"),
        &["-c".into(), "exit 7".into()],
    );

    assert!(matches!(outcome, Outcome::ChildExited(7)));
    assert_eq!(outcome.exit_code(), 7);
    assert_eq!(run.orchestrator.provider().restore_calls, 1);
}

#[test]
fn auth_failure_aborts_before_isolation_and_restores() {
    // Nothing listens here; the token request is refused.
    let mut run = orchestrator_for("http://127.0.0.1:1", FakeIsolation::new());
    let outcome = run
        .orchestrator
        .launch(&alpine(), Path::new("/bin/echo"), &no_args());

    let Outcome::Failed(err) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.category(), "auth");

    let fake = run.orchestrator.provider();
    assert!(fake.isolated_path.is_none());
    assert!(!fake.pid_namespaced);
    assert_eq!(fake.restore_calls, 1);
}

#[test]
fn manifest_404_maps_to_generic_failure_code() {
    let base = stub_registry(vec![(200, TOKEN_BODY.to_vec()), (404, Vec::new())]);

    let mut run = orchestrator_for(&base, FakeIsolation::new());
    let outcome = run
        .orchestrator
        .launch(&alpine(), Path::new("/bin/echo"), &no_args());

    let Outcome::Failed(err) = &outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.category(), "manifest");
    assert_eq!(outcome.exit_code(), 1);

    let fake = run.orchestrator.provider();
    assert!(fake.isolated_path.is_none());
    assert_eq!(fake.restore_calls, 1);
}

#[test]
fn corrupt_layer_aborts_before_isolation() {
    // Digest matches the corrupt bytes, so the fetch succeeds and the
    // failure lands in extraction.
    let corrupt: &[u8] = b"definitely not a tar archive";
    let base = stub_registry(happy_responses(&[corrupt]));

    let mut run = orchestrator_for(&base, FakeIsolation::new());
    let outcome = run
        .orchestrator
        .launch(&alpine(), Path::new("/bin/echo"), &no_args());

    let Outcome::Failed(err) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.category(), "extraction");

    let fake = run.orchestrator.provider();
    assert!(fake.isolated_path.is_none());
    assert_eq!(fake.restore_calls, 1);
}

#[test]
fn isolation_failure_restores_without_spawning() {
    let layer = tar_with_file("etc/one", b"1\n");
    let base = stub_registry(happy_responses(&[&layer]));

    let provider = FakeIsolation {
        fail_filesystem: true,
        ..FakeIsolation::new()
    };
    let mut run = orchestrator_for(&base, provider);
    let outcome = run
        .orchestrator
        .launch(&alpine(), Path::new("/bin/echo"), &no_args());

    let Outcome::Failed(err) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.category(), "isolation");

    let fake = run.orchestrator.provider();
    assert!(!fake.pid_namespaced);
    assert_eq!(fake.restore_calls, 1);
}

#[test]
fn pid_namespace_failure_restores_without_spawning() {
    let layer = tar_with_file("etc/one", b"1\n");
    let base = stub_registry(happy_responses(&[&layer]));

    let provider = FakeIsolation {
        fail_process_tree: true,
        ..FakeIsolation::new()
    };
    let mut run = orchestrator_for(&base, provider);
    let outcome = run
        .orchestrator
        .launch(&alpine(), Path::new("/bin/echo"), &no_args());

    let Outcome::Failed(err) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.category(), "isolation");

    // The root change succeeded before the namespace request failed,
    // so restoration is what brings the host back.
    let fake = run.orchestrator.provider();
    assert!(fake.isolated_path.is_some());
    assert!(!fake.pid_namespaced);
    assert_eq!(fake.restore_calls, 1);
}

#[test]
#[cfg(unix)]
fn spawn_failure_still_restores_root() {
    let layer = tar_with_file("etc/one", b"1\n");
    let base = stub_registry(happy_responses(&[&layer]));

    // Exists on the host so staging succeeds, but is not executable.
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let plain: PathBuf = dir.path().join("plain");
    std::fs::write(&plain, b"not a program").expect("write failed");

    let mut run = orchestrator_for(&base, FakeIsolation::new());
    let outcome = run.orchestrator.launch(&alpine(), &plain, &no_args());

    let Outcome::Failed(err) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.category(), "spawn");
    assert_eq!(run.orchestrator.provider().restore_calls, 1);
}

#[test]
fn workspace_is_released_after_run() {
    let layer_one = tar_with_file("etc/motd", b"from layer one\n");
    let layer_two = tar_with_file("etc/motd", b"from layer two\n");
    let base = stub_registry(happy_responses(&[&layer_one, &layer_two]));

    let mut run = orchestrator_for(&base, FakeIsolation::new());
    let outcome = run.orchestrator.launch(
        &alpine(),
        Path::new("/bin/sh"),
        &["-c".into(), "true".into()],
    );
    assert!(matches!(outcome, Outcome::ChildExited(0)));

    // The fake provider recorded the workspace the run would have
    // chrooted into; the workspace itself is gone after the run.
    let isolated = run
        .orchestrator
        .provider()
        .isolated_path
        .clone()
        .expect("no isolation recorded");
    assert!(!isolated.exists());
}
