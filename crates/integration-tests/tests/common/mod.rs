//! Shared fixtures: stand-in service managers and a stand-in remote-shell
//! client, written as POSIX shell scripts so the real ProcessExecutor runs them.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use svccheck_core::{CheckSettings, HostOs, ServiceChecker};
use svccheck_infra_system::ProcessExecutor;

/// `systemctl is-active <unit>`
const FAKE_SYSTEMCTL: &str = r#"#!/bin/sh
[ "$1" = "is-active" ] || { echo "unexpected verb $1" >&2; exit 64; }
case "$2" in
  nginx|sshd.service|getty@tty1.service) echo active; exit 0 ;;
  foo) echo "Unit foo.service not found." >&2; exit 4 ;;
  slow) sleep 30 ;;
  quiet) exit 3 ;;
  *) echo inactive; exit 3 ;;
esac
"#;

/// `powershell -NoProfile -NonInteractive -Command "(Get-Service -Name '<name>').Status"`
const FAKE_POWERSHELL: &str = r#"#!/bin/sh
[ "$3" = "-Command" ] || { echo "unexpected argv" >&2; exit 64; }
case "$4" in
  "(Get-Service -Name 'W32Time').Status") printf 'Running\r\n' ;;
  "(Get-Service -Name 'Spooler').Status") echo Stopped ;;
  *) echo "Cannot find any service with service name" >&2; exit 1 ;;
esac
"#;

/// Accepts ssh-style options, skips the destination and hands the remote
/// line to a fresh `sh -c`, as sshd would with the login shell.
const FAKE_SSH: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
  case "$1" in
    --) shift; break ;;
    -o|-p) shift 2 ;;
    *) echo "unexpected option $1" >&2; exit 255 ;;
  esac
done
case "$1" in
  *@unreachable*|unreachable*) echo "ssh: connect to host $1 port 22: Connection refused" >&2; exit 255 ;;
esac
shift
exec sh -c "$1"
"#;

pub struct Fixtures {
    pub dir: PathBuf,
    pub systemctl: String,
    pub powershell: String,
    pub ssh: String,
}

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

/// Scripts are written once per test binary, before anything is spawned
pub fn fixtures() -> &'static Fixtures {
    static FIXTURES: OnceLock<Fixtures> = OnceLock::new();
    FIXTURES.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("svccheck-it-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Fixtures {
            systemctl: write_script(&dir, "systemctl", FAKE_SYSTEMCTL),
            powershell: write_script(&dir, "powershell", FAKE_POWERSHELL),
            ssh: write_script(&dir, "ssh", FAKE_SSH),
            dir,
        }
    })
}

pub fn settings() -> CheckSettings {
    let f = fixtures();
    CheckSettings {
        systemctl_program: f.systemctl.clone(),
        powershell_program: f.powershell.clone(),
        ssh_program: f.ssh.clone(),
        ..CheckSettings::default()
    }
}

pub fn checker(host_os: HostOs) -> ServiceChecker {
    ServiceChecker::new(Arc::new(ProcessExecutor::default()), host_os, settings())
}
