#![cfg(unix)]

mod support;

use std::process::Command;

fn dockwrap(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dockwrap"));
    cmd.current_dir(dir)
        .env("DOCKWRAP_COMPOSE_BIN", support::fake_compose(dir))
        .env_remove("DOCKWRAP_PROJECT_DIR")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn int_cli_dry_run_prints_command_line() {
    let dir = tempfile::tempdir().unwrap();
    let out = dockwrap(dir.path())
        .args([
            "--dry-run", "-f", "a.yml", "-p", "proj", "-e", "TAG=1.2", "run", "--opt", "rm",
            "web", "echo hi",
        ])
        .output()
        .expect("failed to run dockwrap --dry-run");

    assert!(
        out.status.success(),
        "dockwrap --dry-run exited non-zero: {:?}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.trim_end().ends_with("-f a.yml -p proj run --rm web 'echo hi'"),
        "unexpected preview: {stdout}"
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("env TAG=1.2"), "stderr: {stderr}");
    assert!(!support::spawned(dir.path()));
}

#[test]
fn int_cli_runs_compose_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dockwrap.yml"),
        "options:\n  f: [base.yml, override.yml]\n  p: demo\nenv:\n  DOCKWRAP_PROBE: from-config\n",
    )
    .unwrap();

    let out = dockwrap(dir.path())
        .args(["up", "-o", "d", "web", "db"])
        .output()
        .expect("failed to run dockwrap up");
    assert!(out.status.success(), "{:?}", out);

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        support::args_of(&stdout),
        vec!["-f", "base.yml", "-f", "override.yml", "-p", "demo", "up", "-d", "web", "db"]
    );
    assert_eq!(support::field(&stdout, "env"), Some("from-config"));
}

#[test]
fn int_cli_propagates_child_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let out = dockwrap(dir.path())
        .args([
            "-p",
            "proj",
            "-e",
            "FAKE_EXIT=3",
            "-e",
            "FAKE_STDERR=service not found",
            "stop",
            "web",
        ])
        .output()
        .expect("failed to run dockwrap stop");

    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("compose stop failed"), "stderr: {stderr}");
    assert!(stderr.contains("service not found"), "stderr: {stderr}");
}

#[test]
fn int_cli_missing_program_exits_127() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_dockwrap"))
        .current_dir(dir.path())
        .env("DOCKWRAP_COMPOSE_BIN", dir.path().join("does-not-exist"))
        .env("NO_COLOR", "1")
        .args(["-p", "proj", "ps"])
        .output()
        .expect("failed to run dockwrap ps");
    assert_eq!(out.status.code(), Some(127));
}
