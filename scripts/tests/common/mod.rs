//! Recording fakes of the external collaborators

#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use scripts::{
    errors::ScriptError,
    etherscan::{EtherscanApi, EtherscanForm, EtherscanResponse},
    toolchain::{ForgeInvocation, Toolchain},
    utils::ChainClient,
};

/// The source `forge flatten` writes in tests
pub const FLATTENED_SOURCE: &str =
    "// SPDX-License-Identifier: AGPL-3.0-or-later\ncontract DssSpell {}\n";

/// A toolchain reporting a fixed chain and exit code
pub struct FakeToolchain {
    /// The chain name `cast chain` reports, or `None` if it cannot run
    pub chain: Option<String>,
    /// The exit code `forge test` finishes with
    pub exit_code: i32,
    /// Every RPC URL whose chain was queried
    pub chain_queries: RefCell<Vec<String>>,
    /// Every `forge test` invocation made
    pub invocations: RefCell<Vec<ForgeInvocation>>,
    /// Every `(source, output)` pair flattened
    pub flattened: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeToolchain {
    pub fn on_chain(chain: &str) -> Self {
        Self {
            chain: Some(chain.to_string()),
            exit_code: 0,
            chain_queries: RefCell::new(Vec::new()),
            invocations: RefCell::new(Vec::new()),
            flattened: RefCell::new(Vec::new()),
        }
    }

    pub fn mainnet() -> Self {
        Self::on_chain("ethlive")
    }

    pub fn last_invocation(&self) -> ForgeInvocation {
        self.invocations.borrow().last().cloned().expect("forge test was not run")
    }
}

impl Toolchain for FakeToolchain {
    fn chain_name(&self, rpc_url: &str) -> Result<String, ScriptError> {
        self.chain_queries.borrow_mut().push(rpc_url.to_string());
        self.chain
            .clone()
            .ok_or_else(|| ScriptError::CommandExecution("cast not found".to_string()))
    }

    fn run_tests(&self, invocation: &ForgeInvocation) -> Result<i32, ScriptError> {
        self.invocations.borrow_mut().push(invocation.clone());
        Ok(self.exit_code)
    }

    fn flatten(&self, source: &Path, output: &Path) -> Result<(), ScriptError> {
        self.flattened
            .borrow_mut()
            .push((source.to_path_buf(), output.to_path_buf()));

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| ScriptError::WriteFile(e.to_string()))?;
        }
        fs::write(output, FLATTENED_SOURCE).map_err(|e| ScriptError::WriteFile(e.to_string()))
    }
}

/// A chain serving a fixed chain ID and spell action
pub struct FakeChain {
    /// The chain ID reported
    pub chain_id: u64,
    /// The action address every spell reports
    pub action: Address,
    /// Every spell whose action was looked up
    pub action_lookups: RefCell<Vec<Address>>,
}

impl FakeChain {
    pub fn new(chain_id: u64, action: Address) -> Self {
        Self {
            chain_id,
            action,
            action_lookups: RefCell::new(Vec::new()),
        }
    }
}

impl ChainClient for FakeChain {
    async fn chain_id(&self) -> Result<u64, ScriptError> {
        Ok(self.chain_id)
    }

    async fn action_address(&self, spell_address: Address) -> Result<Address, ScriptError> {
        self.action_lookups.borrow_mut().push(spell_address);
        Ok(self.action)
    }
}

/// An Etherscan API replaying scripted responses
#[derive(Default)]
pub struct FakeEtherscan {
    /// The responses still to be returned, in order
    pub responses: RefCell<VecDeque<EtherscanResponse>>,
    /// Every form posted
    pub requests: RefCell<Vec<EtherscanForm>>,
}

impl FakeEtherscan {
    pub fn replaying(responses: &[(&str, &str, &str)]) -> Self {
        let responses = responses
            .iter()
            .map(|(status, message, result)| EtherscanResponse {
                status: status.to_string(),
                message: message.to_string(),
                result: result.to_string(),
            })
            .collect();

        Self {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// The value of `field` in the `n`th request
    pub fn field(&self, n: usize, field: &str) -> Option<String> {
        self.requests.borrow()[n]
            .iter()
            .find(|(k, _)| *k == field)
            .map(|(_, v)| v.clone())
    }
}

impl EtherscanApi for FakeEtherscan {
    async fn post(
        &self,
        _chain_id: u64,
        form: &EtherscanForm,
    ) -> Result<EtherscanResponse, ScriptError> {
        self.requests.borrow_mut().push(form.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ScriptError::Etherscan("no scripted response left".to_string()))
    }
}
