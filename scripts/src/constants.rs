//! Constants used in the spell scripts

use std::time::Duration;

/// The name of the environment variable holding the RPC URL
pub const RPC_URL_ENV_VAR: &str = "ETH_RPC_URL";

/// The name of the environment variable holding the Etherscan API key
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

/// The name of the environment variable through which Foundry reads the chain ID
pub const CHAIN_ID_ENV_VAR: &str = "FOUNDRY_CHAIN_ID";

/// The chain ID the spell tests run against
pub const MAINNET_CHAIN_ID: u64 = 1;

/// The chain ID of the Sepolia testnet
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// The name `cast chain` reports for Ethereum mainnet
pub const MAINNET_CHAIN_NAME: &str = "ethlive";

/// The message shown when the RPC URL does not point at mainnet
pub const NETWORK_MISMATCH_MESSAGE: &str = "Please set a Mainnet ETH_RPC_URL";

/// The error reported when verification has no RPC endpoint to read from
pub const MISSING_RPC_URL_MESSAGE: &str = "You need a valid ETH_RPC_URL";

// ------------
// | Commands |
// ------------

/// The name of the Forge command
pub const FORGE_COMMAND: &str = "forge";

/// The name of the Cast command
pub const CAST_COMMAND: &str = "cast";

/// The Forge subcommand that runs tests
pub const TEST_SUBCOMMAND: &str = "test";

/// The Forge subcommand that flattens a source file
pub const FLATTEN_SUBCOMMAND: &str = "flatten";

/// The Cast subcommand that prints the chain name
pub const CHAIN_SUBCOMMAND: &str = "chain";

/// The flag selecting the RPC endpoint of a Cast command
pub const RPC_URL_FLAG: &str = "--rpc-url";

/// The flag selecting the RPC endpoint a Forge test run forks from
pub const FORK_URL_FLAG: &str = "--fork-url";

/// The flag pinning the fork to a block height
pub const FORK_BLOCK_NUMBER_FLAG: &str = "--fork-block-number";

/// The flag selecting tests by name
pub const MATCH_TEST_FLAG: &str = "--match-test";

/// The flag deselecting tests by name
pub const NO_MATCH_TEST_FLAG: &str = "--no-match-test";

/// The verbosity used whenever tests are filtered by name
pub const VERBOSITY_FLAG: &str = "-vvv";

/// The flag selecting the output path of `forge flatten`
pub const OUTPUT_FLAG: &str = "--output";

// ------------------
// | Project Layout |
// ------------------

/// The spell source file
pub const SPELL_SOURCE_PATH: &str = "src/DssSpell.sol";

/// Where the flattened spell source is written
pub const FLATTENED_SOURCE_PATH: &str = "out/flat.sol";

/// The build artifact of the spell contract
pub const SPELL_ARTIFACT_PATH: &str = "out/DssSpell.sol/DssSpell.json";

/// The build artifact of the spell action contract
pub const SPELL_ACTION_ARTIFACT_PATH: &str = "out/DssSpell.sol/DssSpellAction.json";

/// The name of the spell action contract
pub const SPELL_ACTION_CONTRACT_NAME: &str = "DssSpellAction";

/// The Foundry configuration file
pub const FOUNDRY_CONFIG_PATH: &str = "foundry.toml";

/// The name of the library linked into spells
pub const LIBRARY_NAME: &str = "DssExecLib";

/// The pattern locating the linked library's address in `foundry.toml`
pub const LIBRARY_ADDRESS_PATTERN: &str = r":DssExecLib:(0x[0-9a-fA-F]{40})";

/// The number of characters in a hex-encoded address, including the `0x` prefix
pub const ADDRESS_HEX_LENGTH: usize = 42;

// -------------
// | Etherscan |
// -------------

/// The Etherscan v2 API endpoint
pub const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

/// The Etherscan module handling contract verification
pub const ETHERSCAN_MODULE: &str = "contract";

/// The Etherscan action submitting source code for verification
pub const VERIFY_SOURCE_ACTION: &str = "verifysourcecode";

/// The Etherscan action polling a verification request
pub const CHECK_STATUS_ACTION: &str = "checkverifystatus";

/// The code format of a flattened source file
pub const CODE_FORMAT: &str = "solidity-single-file";

/// How long to wait between Etherscan requests while a request is not yet settled
pub const ETHERSCAN_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// The status Etherscan reports for a successful request
pub const ETHERSCAN_OK_STATUS: &str = "1";

/// The message Etherscan reports for a successful request
pub const ETHERSCAN_OK_MESSAGE: &str = "OK";

/// Result fragment meaning the contract is not yet indexed
pub const NOT_YET_INDEXED_FRAGMENT: &str = "locate";

/// Result fragment meaning the verification is still queued
pub const PENDING_FRAGMENT: &str = "pending";

/// Result fragment meaning the contract was verified earlier
pub const ALREADY_VERIFIED_FRAGMENT: &str = "already verified";

/// The Etherscan license code of `GPL-3.0-or-later`
pub const GPL_3_LICENSE_CODE: u8 = 5;

/// The Etherscan license code of `AGPL-3.0-or-later`
pub const AGPL_3_LICENSE_CODE: u8 = 13;
