//! Scripts for testing and verifying spells.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod errors;
pub mod etherscan;
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod solidity;
pub mod toolchain;
pub mod types;
pub mod utils;
