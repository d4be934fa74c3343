// Remote-shell wrapper
// Turns a sub-command into an invocation of the remote-shell client. The remote
// side re-parses the command line, so every token is quoted before joining.

use tracing::debug;

use crate::application::settings::CheckSettings;
use crate::application::shell::join_posix;
use crate::constants::DEFAULT_SSH_PORT;
use crate::domain::ParsedTarget;
use crate::port::CommandSpec;

/// Build `ssh -o BatchMode=yes -o ConnectTimeout=N [-p PORT] -- USER_HOST 'tok' 'tok' ...`
///
/// BatchMode keeps the client from ever prompting for a password; `--` ends
/// option parsing so the user-host can never be read as a flag.
pub fn wrap_remote<S: AsRef<str>>(
    settings: &CheckSettings,
    target: &ParsedTarget,
    tokens: &[S],
) -> CommandSpec {
    let mut command = CommandSpec::new(&settings.ssh_program).args([
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        format!("ConnectTimeout={}", settings.ssh_connect_timeout_secs),
    ]);

    if let Some(port) = target.port.filter(|p| *p != DEFAULT_SSH_PORT) {
        command = command.arg("-p").arg(port.to_string());
    }

    let remote_line = join_posix(tokens);
    debug!(
        target_host = %target.user_host,
        port = ?target.port,
        remote_command = %remote_line,
        "Built remote-shell invocation"
    );

    command.arg("--").arg(&target.user_host).arg(remote_line)
}
