/*!
Test support helpers shared across integration tests.

- fake_compose(dir): write an executable shell script standing in for docker-compose
- have_docker(): check whether a Docker daemon answers on the default socket

The fake compose program:
- exits at once when `FAKE_WARMUP` is set (used by fake_compose itself)
- touches `<dir>/spawned` so tests can tell whether a process was started
- prints each argument on its own line, prefixed with `arg:`
- prints `env:<value>` for DOCKWRAP_PROBE and `inherited:<value>` for DOCKWRAP_INHERITED
- prints `cwd:<dir>`
- exits with `$FAKE_EXIT` (default 0), writing `$FAKE_STDERR` to stderr first
*/

#![allow(dead_code)]

use std::path::{Path, PathBuf};

#[cfg(unix)]
pub fn fake_compose(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let marker = dir.join("spawned");
    let script = format!(
        r#"#!/bin/sh
if [ -n "$FAKE_WARMUP" ]; then exit 0; fi
touch '{marker}'
for a in "$@"; do printf 'arg:%s\n' "$a"; done
printf 'env:%s\n' "$DOCKWRAP_PROBE"
printf 'inherited:%s\n' "$DOCKWRAP_INHERITED"
printf 'cwd:%s\n' "$(pwd)"
if [ -n "$FAKE_STDERR" ]; then printf '%s\n' "$FAKE_STDERR" >&2; fi
exit "${{FAKE_EXIT:-0}}"
"#,
        marker = marker.display()
    );
    let path = dir.join("fake-compose");
    std::fs::write(&path, script).expect("write fake compose");
    let mut perms = std::fs::metadata(&path).expect("stat").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    wait_until_executable(&path);
    path
}

/// ETXTBSY, identical on Linux and macOS.
#[cfg(unix)]
const TEXT_FILE_BUSY: i32 = 26;

/// A process forked by another test thread while the script was open for
/// writing keeps the write handle until it execs, and running the script
/// fails with "Text file busy" in that window. Run it once in warm-up mode
/// until the kernel lets it through.
#[cfg(unix)]
fn wait_until_executable(path: &Path) {
    for _ in 0..100 {
        match std::process::Command::new(path)
            .env("FAKE_WARMUP", "1")
            .status()
        {
            Err(e) if e.raw_os_error() == Some(TEXT_FILE_BUSY) => {
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
            Err(e) => panic!("fake compose not runnable: {e}"),
            Ok(_) => return,
        }
    }
    panic!("fake compose stayed busy: {}", path.display());
}

pub fn spawned(dir: &Path) -> bool {
    dir.join("spawned").exists()
}

/// `arg:` lines from the fake compose stdout, in order.
pub fn args_of(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|l| l.strip_prefix("arg:"))
        .map(str::to_string)
        .collect()
}

/// Value of a `key:` line from the fake compose stdout.
pub fn field<'a>(stdout: &'a str, key: &str) -> Option<&'a str> {
    let prefix = format!("{key}:");
    stdout.lines().find_map(|l| l.strip_prefix(prefix.as_str()))
}

/// Return true if a Docker daemon answers a ping.
pub async fn have_docker() -> bool {
    match dockwrap::Daemon::connect() {
        Ok(d) => d.ping().await.is_ok(),
        Err(_) => false,
    }
}
