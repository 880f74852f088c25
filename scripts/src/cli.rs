//! Definitions of CLI arguments and commands for the spell scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{run_tests, verify_spell},
    constants::{ETHERSCAN_API_KEY_ENV_VAR, MISSING_RPC_URL_MESSAGE, RPC_URL_ENV_VAR},
    errors::ScriptError,
    etherscan::{EtherscanClient, VerifierConfig},
    toolchain::Foundry,
    utils::RpcClient,
};

/// Scripts for testing and verifying spells
#[derive(Parser)]
pub struct Cli {
    /// Network RPC URL, accepted before or after the subcommand
    #[arg(short, long, env = RPC_URL_ENV_VAR, global = true)]
    pub rpc_url: Option<String>,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available scripts
#[derive(Subcommand)]
pub enum Command {
    /// Run the spell tests with `forge test` against a mainnet fork
    ///
    /// Options are given as `key=value`:
    /// `match=<pattern>` runs only matching tests,
    /// `no-match=<pattern>` skips matching tests (ignored when `match` is set),
    /// `block=<number>` forks from the given block.
    /// Any other key is ignored.
    Test(TestArgs),
    /// Verify a deployed spell and its action contract on Etherscan
    Verify(VerifyArgs),
}

impl Command {
    /// Run the command, returning the exit code the process should report
    pub async fn run(self, rpc_url: Option<&str>) -> Result<i32, ScriptError> {
        match self {
            Command::Test(args) => run_tests(args, rpc_url, &Foundry),
            Command::Verify(args) => {
                let rpc_url = rpc_url.ok_or_else(|| {
                    ScriptError::ClientInitialization(MISSING_RPC_URL_MESSAGE.to_string())
                })?;
                let chain = RpcClient::connect(rpc_url)?;
                let etherscan = EtherscanClient::new(args.etherscan_api_key.clone());
                let config = VerifierConfig {
                    log_dir: args.project_root.clone(),
                    ..Default::default()
                };
                verify_spell(args, &Foundry, &chain, &etherscan, &config).await?;
                Ok(0)
            }
        }
    }
}

/// Arguments of the `test` command
#[derive(Args)]
pub struct TestArgs {
    /// Test options, each of the form `key=value`
    #[arg(value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

/// Arguments of the `verify` command
#[derive(Args)]
pub struct VerifyArgs {
    /// Etherscan API key, see https://etherscan.io/myapikey
    #[arg(long, env = ETHERSCAN_API_KEY_ENV_VAR, hide_env_values = true)]
    pub etherscan_api_key: String,

    /// Name of the spell contract
    pub contract_name: String,

    /// Address of the deployed spell contract
    pub address: String,

    /// ABI-encoded constructor arguments, in hex
    pub constructor_args: Option<String>,

    /// Root of the spell project, containing `foundry.toml`, `src/` and `out/`
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    /// The options of a parsed `test` command
    fn test_options(cli: &Cli) -> Vec<String> {
        match &cli.command {
            Command::Test(args) => args.options.clone(),
            Command::Verify(_) => panic!("expected the test command"),
        }
    }

    #[test]
    fn test_rpc_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spell-scripts",
            "test",
            "--rpc-url",
            "http://localhost:8545",
            "match=testFoo",
        ])
        .unwrap();

        assert_eq!(cli.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(test_options(&cli), ["match=testFoo"]);
    }

    #[test]
    fn test_rpc_url_between_options() {
        let cli = Cli::try_parse_from([
            "spell-scripts",
            "test",
            "match=testFoo",
            "-r",
            "http://localhost:8545",
            "block=17000000",
        ])
        .unwrap();

        assert_eq!(cli.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(test_options(&cli), ["match=testFoo", "block=17000000"]);
    }
}
