//! The external Foundry tools the scripts drive

use std::{
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    constants::{
        CAST_COMMAND, CHAIN_ID_ENV_VAR, CHAIN_SUBCOMMAND, FLATTEN_SUBCOMMAND, FORGE_COMMAND,
        FORK_URL_FLAG, MAINNET_CHAIN_ID, OUTPUT_FLAG, RPC_URL_FLAG, TEST_SUBCOMMAND,
    },
    errors::ScriptError,
    types::TestOptions,
};

/// A fully assembled `forge test` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeInvocation {
    /// The flags following `forge test`, in order
    pub flags: Vec<String>,
    /// Environment overrides applied to the child process only
    pub env: Vec<(String, String)>,
}

impl ForgeInvocation {
    /// Assemble the invocation forking mainnet from `rpc_url` with the given options
    pub fn new(rpc_url: &str, options: &TestOptions) -> Self {
        let mut flags = vec![FORK_URL_FLAG.to_string(), rpc_url.to_string()];
        flags.extend(options.forge_flags());

        let env = vec![(CHAIN_ID_ENV_VAR.to_string(), MAINNET_CHAIN_ID.to_string())];

        Self { flags, env }
    }

    /// Build the command, inheriting stdio so Forge's output reaches the user untouched
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(FORGE_COMMAND);
        cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit()).stderr(Stdio::inherit());
        cmd.arg(TEST_SUBCOMMAND);
        cmd.args(&self.flags);
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        cmd
    }
}

/// The operations the scripts need from the local toolchain
pub trait Toolchain {
    /// The name of the chain served by `rpc_url`, e.g. `ethlive`
    fn chain_name(&self, rpc_url: &str) -> Result<String, ScriptError>;

    /// Run `forge test` to completion and return its exit code
    fn run_tests(&self, invocation: &ForgeInvocation) -> Result<i32, ScriptError>;

    /// Flatten `source` into a single file at `output`
    fn flatten(&self, source: &Path, output: &Path) -> Result<(), ScriptError>;
}

/// The Foundry toolchain found on `PATH`.
///
/// Assumes that `forge` and `cast` are locally available.
#[derive(Debug, Default, Clone, Copy)]
pub struct Foundry;

impl Toolchain for Foundry {
    fn chain_name(&self, rpc_url: &str) -> Result<String, ScriptError> {
        let mut chain_cmd = Command::new(CAST_COMMAND);
        chain_cmd.arg(CHAIN_SUBCOMMAND);
        chain_cmd.arg(RPC_URL_FLAG);
        chain_cmd.arg(rpc_url);
        chain_cmd.stderr(Stdio::inherit());

        let output = chain_cmd
            .output()
            .map_err(|e| ScriptError::CommandExecution(e.to_string()))?;
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("`cast chain` reported {name:?}");

        Ok(name)
    }

    fn run_tests(&self, invocation: &ForgeInvocation) -> Result<i32, ScriptError> {
        info!(
            "Running `{FORGE_COMMAND} {TEST_SUBCOMMAND} {}`",
            invocation.flags.iter().join(" ")
        );

        let status = invocation
            .to_command()
            .status()
            .map_err(|e| ScriptError::CommandExecution(e.to_string()))?;

        Ok(exit_code(status))
    }

    fn flatten(&self, source: &Path, output: &Path) -> Result<(), ScriptError> {
        let mut flatten_cmd = Command::new(FORGE_COMMAND);
        flatten_cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        flatten_cmd.arg(FLATTEN_SUBCOMMAND);
        flatten_cmd.arg(source);
        flatten_cmd.arg(OUTPUT_FLAG);
        flatten_cmd.arg(output);

        command_success_or(flatten_cmd, "Failed to flatten spell source")
    }
}

/// Run the command, mapping a failed exit status to the given error message
fn command_success_or(mut cmd: Command, err_msg: &str) -> Result<(), ScriptError> {
    if !cmd
        .status()
        .map_err(|e| ScriptError::CommandExecution(e.to_string()))?
        .success()
    {
        Err(ScriptError::CommandExecution(String::from(err_msg)))
    } else {
        Ok(())
    }
}

/// The exit code a shell would report for a finished child process
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
