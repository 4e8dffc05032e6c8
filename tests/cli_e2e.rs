//! End-to-end CLI tests for the cookiedl binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Refused immediately on loopback, so probe attempts fail fast without
/// touching the network.
const UNREACHABLE_BASE: &str = "http://127.0.0.1:1";

/// Installs an executable `wget` stand-in into `bin_dir`. The script sees
/// the real argument shape: --no-verbose --header=... -O <dest> <url>.
#[cfg(unix)]
fn install_stub_wget(bin_dir: &std::path::Path, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(bin_dir).unwrap();
    let path = bin_dir.join("wget");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
fn path_with_stub(bin_dir: &std::path::Path) -> std::ffi::OsString {
    let mut paths = vec![bin_dir.to_path_buf()];
    if let Some(existing) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&existing));
    }
    std::env::join_paths(paths).unwrap()
}

#[cfg(unix)]
const STUB_WGET_OK: &str = "#!/bin/sh\nprintf 'stub-data' > \"$4\"\n";

/// Fails any URL containing "bad", succeeds otherwise.
#[cfg(unix)]
const STUB_WGET_SELECTIVE: &str = concat!(
    "#!/bin/sh\n",
    "case \"$5\" in\n",
    "  *bad*) echo \"simulated refusal\" >&2; exit 3 ;;\n",
    "  *) printf 'stub-data' > \"$4\" ;;\n",
    "esac\n",
);

/// Seeds cookies and links files and returns the dl dir plus their paths.
fn seed_inputs(
    tempdir: &TempDir,
    links: &str,
) -> (
    std::path::PathBuf,
    std::path::PathBuf,
    std::path::PathBuf,
    std::path::PathBuf,
) {
    let dl_dir = tempdir.path().join("downloads");
    let cookies = tempdir.path().join("cookies.txt");
    let links_file = tempdir.path().join("links.txt");
    let log_file = tempdir.path().join("run.log");
    std::fs::write(&cookies, "session=abc123").unwrap();
    std::fs::write(&links_file, links).unwrap();
    (dl_dir, cookies, links_file, log_file)
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Download files concurrently using cookies and links files",
        ));
}

/// Test that `--help` documents process exit codes.
#[test]
fn test_binary_help_displays_exit_codes() {
    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("0 = all links downloaded or skipped"))
        .stdout(predicate::str::contains("1 = partial success (some links failed)"))
        .stdout(predicate::str::contains(
            "2 = complete failure or fatal error",
        ));
}

/// Test that `--help` documents the environment variable overrides.
#[test]
fn test_binary_help_documents_environment_variables() {
    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DL_PATH"))
        .stdout(predicate::str::contains("COOKIES_FILE"))
        .stdout(predicate::str::contains("LINKS_FILE"))
        .stdout(predicate::str::contains("LOG_FILE"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cookiedl"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that the two force flags conflict and exit with code 2.
#[test]
fn test_binary_force_flags_conflict_exits_two() {
    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .arg("--force-download")
        .arg("--force-download-ask")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
    assert_eq!(assert.get_output().status.code(), Some(2));
}

/// Test that an empty links file exits 0 with the explicit message.
#[test]
fn test_binary_empty_links_file_exits_zero_with_message() {
    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, "");

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using existing cookies file:"))
        .stdout(predicate::str::contains("Using existing links file:"))
        .stdout(predicate::str::contains("No links found. Exiting."));
}

/// Test that missing input files are captured interactively on first run,
/// landing at names derived from the binary name.
#[test]
fn test_binary_first_run_captures_cookies_and_links_interactively() {
    let tempdir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.current_dir(tempdir.path())
        .env_remove("DL_PATH")
        .env_remove("COOKIES_FILE")
        .env_remove("LINKS_FILE")
        .env_remove("LOG_FILE")
        // One cookie line, blank terminator, then an immediately-blank
        // links session.
        .write_stdin("session=abc123\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Paste your cookies (end with an empty line):",
        ))
        .stdout(predicate::str::contains("Cookies saved to"))
        .stdout(predicate::str::contains(
            "Enter your download links, one per line (end with an empty line):",
        ))
        .stdout(predicate::str::contains("Links saved to"))
        .stdout(predicate::str::contains("No links found. Exiting."));

    let cookies = tempdir.path().join("cookiedl_cookies.txt");
    assert_eq!(
        std::fs::read_to_string(&cookies).unwrap(),
        "session=abc123"
    );
    assert!(tempdir.path().join("cookiedl_links.txt").exists());
    assert!(tempdir.path().join("cookiedl.log").exists());
}

/// Test that environment variables override the name-derived defaults.
#[test]
fn test_binary_env_variables_override_name_derived_defaults() {
    let tempdir = TempDir::new().unwrap();
    let env_dl = tempdir.path().join("env-dl");
    let env_cookies = tempdir.path().join("env-cookies.txt");
    let env_links = tempdir.path().join("env-links.txt");
    let env_log = tempdir.path().join("env.log");

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.current_dir(tempdir.path())
        .env("DL_PATH", &env_dl)
        .env("COOKIES_FILE", &env_cookies)
        .env("LINKS_FILE", &env_links)
        .env("LOG_FILE", &env_log)
        .write_stdin("tok=1\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created download path:"));

    assert!(env_dl.is_dir(), "expected DL_PATH directory to be created");
    assert_eq!(std::fs::read_to_string(&env_cookies).unwrap(), "tok=1");
    assert!(env_links.exists());
    assert!(env_log.exists());
    assert!(
        !tempdir.path().join("cookiedl_cookies.txt").exists(),
        "name-derived cookies file should not be touched when env is set"
    );
}

/// Test that CLI flags take precedence over environment variables.
#[test]
fn test_binary_cli_flags_override_env_variables() {
    let tempdir = TempDir::new().unwrap();
    let env_cookies = tempdir.path().join("env-cookies.txt");
    let flag_cookies = tempdir.path().join("flag-cookies.txt");
    let links_file = tempdir.path().join("links.txt");
    std::fs::write(&links_file, "").unwrap();

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--dl-path")
        .arg(tempdir.path())
        .arg("--cookies")
        .arg(&flag_cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(tempdir.path().join("run.log"))
        .env("COOKIES_FILE", &env_cookies)
        .write_stdin("tok=1\n\n")
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&flag_cookies).unwrap(), "tok=1");
    assert!(
        !env_cookies.exists(),
        "env-named cookies file should lose to the CLI flag"
    );
}

/// Test that a failed cookie probe plus a declined continue aborts with 2.
#[test]
fn test_binary_probe_failure_then_abort_exits_two() {
    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) =
        seed_inputs(&tempdir, &format!("{UNREACHABLE_BASE}/file.bin\n"));

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .write_stdin("n\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Testing cookie validity using the first link...",
        ))
        .stdout(predicate::str::contains(
            "Warning: The test request using the provided cookies failed",
        ))
        .stdout(predicate::str::contains("Exiting."));
    assert_eq!(assert.get_output().status.code(), Some(2));
}

/// Test that continuing past a failed probe but declining the download
/// still exits 0.
#[test]
fn test_binary_probe_failure_continue_then_decline_download_exits_zero() {
    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) =
        seed_inputs(&tempdir, &format!("{UNREACHABLE_BASE}/file.bin\n"));

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .write_stdin("y\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download skipped."));
}

/// Test the full happy path: probe passes against a live server, the
/// operator confirms, and the stub tool materializes the file.
#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_binary_probe_success_then_download_exits_zero() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) =
        seed_inputs(&tempdir, &format!("{}/file.bin\n", server.uri()));
    let bin_dir = tempdir.path().join("bin");
    install_stub_wget(&bin_dir, STUB_WGET_OK);
    let path_env = path_with_stub(&bin_dir);

    tokio::task::spawn_blocking({
        let dl_dir = dl_dir.clone();
        let log_file = log_file.clone();
        move || {
            let mut cmd = Command::cargo_bin("cookiedl").unwrap();
            cmd.arg("--dl-path")
                .arg(&dl_dir)
                .arg("--cookies")
                .arg(&cookies)
                .arg("--links")
                .arg(&links_file)
                .arg("--log")
                .arg(&log_file)
                .env("PATH", &path_env)
                .write_stdin("y\n")
                .assert()
                .success()
                .stdout(predicate::str::contains("Cookie test passed."))
                .stdout(predicate::str::contains(
                    "1 downloaded, 0 skipped, 0 failed (total 1)",
                ));
        }
    })
    .await
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(dl_dir.join("file.bin")).unwrap(),
        "stub-data"
    );
    let log = std::fs::read_to_string(&log_file).unwrap();
    assert!(
        log.contains("download ok:"),
        "log should record the download: {log}"
    );
}

/// Test that multiple links download through the stub tool with a summary.
#[cfg(unix)]
#[test]
fn test_binary_downloads_links_with_stub_tool() {
    let tempdir = TempDir::new().unwrap();
    let links = format!("{UNREACHABLE_BASE}/a.bin\n{UNREACHABLE_BASE}/b.bin\n");
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, &links);
    let bin_dir = tempdir.path().join("bin");
    install_stub_wget(&bin_dir, STUB_WGET_OK);

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .env("PATH", path_with_stub(&bin_dir))
        // Probe hits a refused port, so: continue anyway, then download.
        .write_stdin("y\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2 downloaded, 0 skipped, 0 failed (total 2)",
        ));

    assert!(dl_dir.join("a.bin").exists());
    assert!(dl_dir.join("b.bin").exists());
}

/// Test that the default policy skips files that already exist untouched.
#[cfg(unix)]
#[test]
fn test_binary_default_policy_skips_existing_files() {
    let tempdir = TempDir::new().unwrap();
    let links = format!("{UNREACHABLE_BASE}/a.bin\n{UNREACHABLE_BASE}/b.bin\n");
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, &links);
    std::fs::create_dir_all(&dl_dir).unwrap();
    std::fs::write(dl_dir.join("a.bin"), "original").unwrap();
    let bin_dir = tempdir.path().join("bin");
    install_stub_wget(&bin_dir, STUB_WGET_OK);

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .env("PATH", path_with_stub(&bin_dir))
        .write_stdin("y\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 downloaded, 1 skipped, 0 failed (total 2)",
        ));

    assert_eq!(
        std::fs::read_to_string(dl_dir.join("a.bin")).unwrap(),
        "original",
        "skipped file must not be overwritten"
    );
    let log = std::fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("skipped (already exists):"), "log: {log}");
}

/// Test that --force-download overwrites existing files.
#[cfg(unix)]
#[test]
fn test_binary_force_download_overwrites_existing_files() {
    let tempdir = TempDir::new().unwrap();
    let links = format!("{UNREACHABLE_BASE}/a.bin\n");
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, &links);
    std::fs::create_dir_all(&dl_dir).unwrap();
    std::fs::write(dl_dir.join("a.bin"), "original").unwrap();
    let bin_dir = tempdir.path().join("bin");
    install_stub_wget(&bin_dir, STUB_WGET_OK);

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .arg("--force-download")
        .env("PATH", path_with_stub(&bin_dir))
        .write_stdin("y\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 downloaded, 0 skipped, 0 failed (total 1)",
        ));

    assert_eq!(
        std::fs::read_to_string(dl_dir.join("a.bin")).unwrap(),
        "stub-data"
    );
}

/// Test that --force-download-ask with a declined answer keeps the file.
#[test]
fn test_binary_force_download_ask_declined_skips_existing_file() {
    let tempdir = TempDir::new().unwrap();
    let links = format!("{UNREACHABLE_BASE}/a.bin\n");
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, &links);
    std::fs::create_dir_all(&dl_dir).unwrap();
    std::fs::write(dl_dir.join("a.bin"), "original").unwrap();

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    cmd.arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .arg("--force-download-ask")
        // Continue past failed probe, confirm download, decline the file.
        .write_stdin("y\ny\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "a.bin already exists. Download it again? (y/n):",
        ))
        .stdout(predicate::str::contains(
            "0 downloaded, 1 skipped, 0 failed (total 1)",
        ));

    assert_eq!(
        std::fs::read_to_string(dl_dir.join("a.bin")).unwrap(),
        "original"
    );
}

/// Test that a mixed batch exits 1 and lists the failed link.
#[cfg(unix)]
#[test]
fn test_binary_partial_failure_exits_one() {
    let tempdir = TempDir::new().unwrap();
    let links = format!("{UNREACHABLE_BASE}/good.bin\n{UNREACHABLE_BASE}/bad.bin\n");
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, &links);
    let bin_dir = tempdir.path().join("bin");
    install_stub_wget(&bin_dir, STUB_WGET_SELECTIVE);

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .env("PATH", path_with_stub(&bin_dir))
        .write_stdin("y\ny\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "1 downloaded, 0 skipped, 1 failed (total 2)",
        ))
        .stdout(predicate::str::contains("failed:"))
        .stdout(predicate::str::contains("simulated refusal"));
    assert_eq!(assert.get_output().status.code(), Some(1));

    let log = std::fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("download failed:"), "log: {log}");
}

/// Test that a batch with no successes exits 2.
#[cfg(unix)]
#[test]
fn test_binary_all_failures_exit_two() {
    let tempdir = TempDir::new().unwrap();
    let links = format!("{UNREACHABLE_BASE}/bad-1.bin\n{UNREACHABLE_BASE}/bad-2.bin\n");
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, &links);
    let bin_dir = tempdir.path().join("bin");
    install_stub_wget(&bin_dir, STUB_WGET_SELECTIVE);

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .env("PATH", path_with_stub(&bin_dir))
        .write_stdin("y\ny\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "0 downloaded, 0 skipped, 2 failed (total 2)",
        ));
    assert_eq!(assert.get_output().status.code(), Some(2));
}

/// Test that a missing download tool fails every link and reports itself.
#[test]
fn test_binary_missing_download_tool_reports_error_and_exits_two() {
    let tempdir = TempDir::new().unwrap();
    let links = format!("{UNREACHABLE_BASE}/file.bin\n");
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, &links);
    let empty_bin = tempdir.path().join("empty-bin");
    std::fs::create_dir_all(&empty_bin).unwrap();

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .env("PATH", &empty_bin)
        .write_stdin("y\ny\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "0 downloaded, 0 skipped, 1 failed (total 1)",
        ))
        .stderr(predicate::str::contains("not found on PATH"));
    assert_eq!(assert.get_output().status.code(), Some(2));
}

/// Test that the run log accumulates across invocations.
#[test]
fn test_binary_run_log_appends_across_runs() {
    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, "");

    for _ in 0..2 {
        let mut cmd = Command::cargo_bin("cookiedl").unwrap();
        cmd.arg("--dl-path")
            .arg(&dl_dir)
            .arg("--cookies")
            .arg(&cookies)
            .arg("--links")
            .arg(&links_file)
            .arg("--log")
            .arg(&log_file)
            .write_stdin("")
            .assert()
            .success();
    }

    let log = std::fs::read_to_string(&log_file).unwrap();
    assert_eq!(
        log.matches("run started:").count(),
        2,
        "expected both runs in the log: {log}"
    );
    assert!(
        log.lines().all(|line| line.starts_with('[')),
        "every log line should carry a timestamp: {log}"
    );
}

/// Test that `-v` enables the debug parsed-args line.
#[test]
fn test_binary_verbose_flag_emits_debug_parsed_args_line() {
    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, "");

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .env_remove("RUST_LOG")
        .arg("-v")
        .arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .write_stdin("")
        .assert()
        .success();
    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("CLI arguments parsed"),
        "expected debug parsed-args output, got: {stderr}"
    );
}

/// Test that default verbosity omits the debug parsed-args line.
#[test]
fn test_binary_default_omits_debug_parsed_args_line() {
    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, "");

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .env_remove("RUST_LOG")
        .arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .write_stdin("")
        .assert()
        .success();
    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("CLI arguments parsed"),
        "did not expect debug parsed-args output at default verbosity: {stderr}"
    );
}

/// Test that NO_COLOR disables ANSI escape codes in emitted output.
#[test]
fn test_binary_no_color_env_disables_ansi_sequences() {
    let tempdir = TempDir::new().unwrap();
    let (dl_dir, cookies, links_file, log_file) = seed_inputs(&tempdir, "");

    let mut cmd = Command::cargo_bin("cookiedl").unwrap();
    let assert = cmd
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "trace")
        .arg("--dl-path")
        .arg(&dl_dir)
        .arg("--cookies")
        .arg(&cookies)
        .arg("--links")
        .arg(&links_file)
        .arg("--log")
        .arg(&log_file)
        .write_stdin("")
        .assert()
        .success();
    let output = assert.get_output();
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        !combined.contains("\u{1b}["),
        "did not expect ANSI escape sequences when NO_COLOR is set: {combined}"
    );
}
