//! Helpers for reading Foundry build outputs and project configuration

use std::{collections::HashMap, fs, path::Path, str::FromStr, sync::LazyLock};

use alloy::primitives::Address;
use regex::Regex;
use serde::Deserialize;

use crate::{
    constants::{AGPL_3_LICENSE_CODE, GPL_3_LICENSE_CODE, LIBRARY_ADDRESS_PATTERN},
    errors::ScriptError,
};

/// The subset of a Foundry contract artifact needed for verification
#[derive(Debug, Deserialize)]
pub struct ContractArtifact {
    /// The solc metadata emitted alongside the bytecode
    pub metadata: SolcMetadata,
}

/// Solc compilation metadata
#[derive(Debug, Deserialize)]
pub struct SolcMetadata {
    /// The compiler used
    pub compiler: CompilerInfo,
    /// The compiler settings
    pub settings: CompilerSettings,
    /// Per-source information, keyed by source path
    pub sources: HashMap<String, SourceInfo>,
}

/// The compiler that produced an artifact
#[derive(Debug, Deserialize)]
pub struct CompilerInfo {
    /// The full solc version, e.g. `0.8.16+commit.07a7930e`
    pub version: String,
}

/// The subset of solc settings Etherscan needs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerSettings {
    /// The target EVM version
    pub evm_version: String,
    /// The optimizer configuration
    pub optimizer: OptimizerSettings,
}

/// Solc optimizer configuration
#[derive(Debug, Deserialize)]
pub struct OptimizerSettings {
    /// Whether the optimizer ran
    pub enabled: bool,
    /// The number of optimizer runs
    pub runs: u64,
}

/// Metadata of a single compiled source
#[derive(Debug, Deserialize)]
pub struct SourceInfo {
    /// The SPDX license identifier of the source
    pub license: Option<String>,
}

/// The compilation settings of a contract, in the shape Etherscan expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationDetails {
    /// The compiler version, prefixed with `v`
    pub compiler_version: String,
    /// The target EVM version
    pub evm_version: String,
    /// Whether the optimizer ran
    pub optimizer_enabled: bool,
    /// The number of optimizer runs
    pub optimizer_runs: u64,
    /// The Etherscan license code of the source
    pub license_code: u8,
}

impl ContractArtifact {
    /// Read and parse an artifact from disk
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::ReadFile(format!("{}: {e}, run `forge build` first", path.display()))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            ScriptError::ArtifactParsing(format!(
                "{}: {e}, run `forge build` again",
                path.display()
            ))
        })
    }

    /// Extract the compilation details of the contract defined in `source_path`
    pub fn compilation_details(
        &self,
        source_path: &str,
    ) -> Result<CompilationDetails, ScriptError> {
        let metadata = &self.metadata;
        let license = metadata
            .sources
            .get(source_path)
            .and_then(|source| source.license.as_deref())
            .ok_or_else(|| {
                ScriptError::ArtifactParsing(format!("no license found for {source_path}"))
            })?;

        Ok(CompilationDetails {
            compiler_version: format!("v{}", metadata.compiler.version),
            evm_version: metadata.settings.evm_version.clone(),
            optimizer_enabled: metadata.settings.optimizer.enabled,
            optimizer_runs: metadata.settings.optimizer.runs,
            license_code: license_code(license)?,
        })
    }
}

/// Map an SPDX license identifier to its Etherscan license code
pub fn license_code(license: &str) -> Result<u8, ScriptError> {
    match license {
        "GPL-3.0-or-later" => Ok(GPL_3_LICENSE_CODE),
        "AGPL-3.0-or-later" => Ok(AGPL_3_LICENSE_CODE),
        _ => Err(ScriptError::ArtifactParsing(format!(
            "unsupported license: {license}"
        ))),
    }
}

/// Matches a `DssExecLib` entry of the Foundry `libraries` list, capturing its address
static LIBRARY_ADDRESS_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(LIBRARY_ADDRESS_PATTERN));

/// Find the address of the linked spell library in the Foundry config
pub fn library_address_from_config(config_path: &Path) -> Result<Address, ScriptError> {
    let config = fs::read_to_string(config_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", config_path.display())))?;

    library_address(&config)
}

/// Find the address of the linked spell library in the contents of a Foundry config
pub fn library_address(config: &str) -> Result<Address, ScriptError> {
    let pattern = LIBRARY_ADDRESS_REGEX
        .as_ref()
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    let hex = pattern
        .captures(config)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| {
            ScriptError::ReadFile("no DssExecLib configured in foundry.toml".to_string())
        })?;

    Address::from_str(hex.as_str()).map_err(|e| ScriptError::InvalidAddress(e.to_string()))
}
