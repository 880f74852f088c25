//! Utilities for the spell scripts.

use std::str::FromStr;

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    transports::http::reqwest::Url,
};

use crate::{constants::ADDRESS_HEX_LENGTH, errors::ScriptError, solidity::DssSpell};

/// The on-chain reads the verification flow depends on
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// The ID of the chain the client is connected to
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// The address of the action contract a spell delegates to
    async fn action_address(&self, spell_address: Address) -> Result<Address, ScriptError>;
}

/// A read-only client of a JSON-RPC endpoint
pub struct RpcClient {
    /// The underlying provider
    provider: DynProvider,
}

impl RpcClient {
    /// Sets up a read-only client for the given RPC url
    pub fn connect(rpc_url: &str) -> Result<Self, ScriptError> {
        let url =
            Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { provider: DynProvider::new(provider) })
    }
}

impl ChainClient for RpcClient {
    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn action_address(&self, spell_address: Address) -> Result<Address, ScriptError> {
        DssSpell::new(spell_address, &self.provider)
            .action()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}

/// Parse a `0x`-prefixed, 40 hex digit contract address
pub fn parse_address(address: &str) -> Result<Address, ScriptError> {
    if address.len() != ADDRESS_HEX_LENGTH || !address.starts_with("0x") {
        return Err(ScriptError::InvalidAddress(address.to_string()));
    }

    Address::from_str(address).map_err(|e| ScriptError::InvalidAddress(format!("{address}: {e}")))
}
