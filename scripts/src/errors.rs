//! Definitions of errors that can occur during the execution of the spell scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the spell scripts
#[derive(Debug)]
pub enum ScriptError {
    /// The configured RPC endpoint does not serve the expected network
    NetworkMismatch(String),
    /// Error spawning or waiting on an external command
    CommandExecution(String),
    /// Error reading a file
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
    /// Error parsing a Foundry compilation artifact
    ArtifactParsing(String),
    /// A malformed contract address
    InvalidAddress(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error talking to the Etherscan API
    Etherscan(String),
    /// Etherscan rejected the verification request
    Verification(String),
    /// No block explorer is known for the chain
    UnsupportedChain(u64),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::NetworkMismatch(s) => write!(f, "{}", s),
            ScriptError::CommandExecution(s) => write!(f, "error executing command: {}", s),
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::InvalidAddress(s) => write!(f, "malformed address: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::Etherscan(s) => write!(f, "error querying etherscan: {}", s),
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
            ScriptError::UnsupportedChain(id) => write!(f, "unsupported chain id: {}", id),
        }
    }
}

impl Error for ScriptError {}
