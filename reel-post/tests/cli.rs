//! CLI integration tests for reel-post

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to escape path for TOML on Windows
fn escape_path_for_toml(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

struct TestEnv {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    fn new(base_url: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path();
        let config_path = data.join("config.toml");

        let config_content = format!(
            r#"
[paths]
manifest = "{}"
history = "{}"
session = "{}"
scratch_dir = "{}"

[upload]
thumbnail = false

[platform]
base_url = "{}"
"#,
            escape_path_for_toml(&data.join("manifest.json")),
            escape_path_for_toml(&data.join("history.json")),
            escape_path_for_toml(&data.join("session.json")),
            escape_path_for_toml(&data.join("scratch")),
            base_url
        );
        fs::write(&config_path, config_content).unwrap();

        Self {
            temp_dir,
            config_path,
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn write_manifest(&self, json: &str) {
        fs::write(self.file("manifest.json"), json).unwrap();
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("reel-post").unwrap();
        cmd.arg("--config")
            .arg(&self.config_path)
            .env("REELCAST_USERNAME", "reel_account")
            .env("REELCAST_PASSWORD", "hunter2")
            .env_remove("REELCAST_DEVICE_SEED")
            .env_remove("REELCAST_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn run_blocking(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

#[test]
fn test_help_flag_output() {
    let mut cmd = Command::cargo_bin("reel-post").unwrap();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Upload the videos listed in a manifest"))
        .stdout(predicate::str::contains("--manifest"))
        .stdout(predicate::str::contains("--cap"))
        .stdout(predicate::str::contains("--no-thumbnail"))
        .stdout(predicate::str::contains("EXIT CODES"));
}

#[test]
fn test_missing_manifest_exits_3() {
    let env = TestEnv::new("http://127.0.0.1:9");

    env.command()
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Error: "))
        .stderr(predicate::str::contains("Manifest not found"));

    assert!(!env.file("history.json").exists());
}

#[test]
fn test_malformed_manifest_exits_3() {
    let env = TestEnv::new("http://127.0.0.1:9");
    env.write_manifest("{not json");

    env.command()
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Malformed manifest"));
}

#[test]
fn test_missing_credentials_exits_3() {
    let env = TestEnv::new("http://127.0.0.1:9");
    env.write_manifest("{}");

    env.command()
        .env_remove("REELCAST_USERNAME")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("REELCAST_USERNAME"));
}

#[test]
fn test_explicit_config_must_exist() {
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin("reel-post")
        .unwrap()
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_invalid_log_format_rejected() {
    Command::cargo_bin("reel-post")
        .unwrap()
        .args(["--log-format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log format"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_2() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad password"))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.write_manifest(
        r#"{"postA":{"results_number":1,"url_list":["http://127.0.0.1:9/v.mp4"],"post_info":{"caption":"hi"}}}"#,
    );

    run_blocking(env.command())
        .await
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Authentication failed"));

    assert!(!env.file("session.json").exists());
    assert!(!env.file("history.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_then_rerun_skips() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake-mp4-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/media/reels"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "ok", "media": {"id": "r1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.write_manifest(&format!(
        r#"{{"postA":{{"results_number":1,"url_list":["{}/v.mp4"],"post_info":{{"caption":"hi"}}}}}}"#,
        server.uri()
    ));

    run_blocking(env.command())
        .await
        .success()
        .stdout(predicate::str::contains("Uploaded 1 video(s)"));

    let history: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.file("history.json")).unwrap()).unwrap();
    assert_eq!(history["postA"]["caption"], "hi");
    assert_eq!(history["postA"]["result"]["media"]["id"], "r1");

    let session: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.file("session.json")).unwrap()).unwrap();
    assert_eq!(session["token"], "tok-1");

    // Restored session, nothing new to upload
    run_blocking(env.command())
        .await
        .success()
        .stdout(predicate::str::contains("Uploaded 0 video(s)"));

    let scratch = fs::read_dir(env.file("scratch")).unwrap().count();
    assert_eq!(scratch, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_download_still_exits_0() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/media/reels"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    env.write_manifest(&format!(
        r#"{{"postA":{{"results_number":1,"url_list":["{}/gone.mp4"]}}}}"#,
        server.uri()
    ));

    run_blocking(env.command())
        .await
        .success()
        .stdout(predicate::str::contains("Uploaded 0 video(s)"));

    assert!(!env.file("history.json").exists());
}
