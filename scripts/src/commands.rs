//! Implementations of the spell scripts

use std::fs;

use tracing::{info, warn};

use crate::{
    artifacts::{library_address_from_config, ContractArtifact},
    cli::{TestArgs, VerifyArgs},
    constants::{
        FLATTENED_SOURCE_PATH, FOUNDRY_CONFIG_PATH, LIBRARY_NAME, MAINNET_CHAIN_NAME,
        NETWORK_MISMATCH_MESSAGE, SPELL_ACTION_ARTIFACT_PATH, SPELL_ACTION_CONTRACT_NAME,
        SPELL_ARTIFACT_PATH, SPELL_SOURCE_PATH,
    },
    errors::ScriptError,
    etherscan::{
        explorer_url, verify_contract, EtherscanApi, VerificationOutcome, VerificationRequest,
        VerifierConfig,
    },
    toolchain::{ForgeInvocation, Toolchain},
    types::TestOptions,
    utils::{parse_address, ChainClient},
};

/// Check that `rpc_url` is set and serves Ethereum mainnet, returning it
pub fn ensure_mainnet<'a>(
    toolchain: &impl Toolchain,
    rpc_url: Option<&'a str>,
) -> Result<&'a str, ScriptError> {
    let mismatch = || ScriptError::NetworkMismatch(NETWORK_MISMATCH_MESSAGE.to_string());

    let rpc_url = rpc_url.filter(|url| !url.is_empty()).ok_or_else(mismatch)?;
    if toolchain.chain_name(rpc_url)? != MAINNET_CHAIN_NAME {
        return Err(mismatch());
    }

    Ok(rpc_url)
}

/// Run the spell tests against a mainnet fork, returning Forge's exit code
pub fn run_tests(
    args: TestArgs,
    rpc_url: Option<&str>,
    toolchain: &impl Toolchain,
) -> Result<i32, ScriptError> {
    let rpc_url = ensure_mainnet(toolchain, rpc_url)?;

    let options = TestOptions::from_args(&args.options);
    let invocation = ForgeInvocation::new(rpc_url, &options);

    toolchain.run_tests(&invocation)
}

/// Verify the spell contract and its action contract on Etherscan
pub async fn verify_spell(
    args: VerifyArgs,
    toolchain: &impl Toolchain,
    chain: &impl ChainClient,
    etherscan: &impl EtherscanApi,
    config: &VerifierConfig,
) -> Result<(), ScriptError> {
    info!(
        "Attempting to verify contract {} at address {}...",
        args.contract_name, args.address
    );
    let spell_address = parse_address(&args.address)?;
    let constructor_args = args.constructor_args.unwrap_or_default();
    let root = args.project_root;

    let flattened_path = root.join(FLATTENED_SOURCE_PATH);
    toolchain.flatten(&root.join(SPELL_SOURCE_PATH), &flattened_path)?;
    let source_code = fs::read_to_string(&flattened_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", flattened_path.display())))?;

    info!("Obtaining chain ID...");
    let chain_id = chain.chain_id().await?;
    info!("CHAIN_ID: {chain_id}");

    let library = match library_address_from_config(&root.join(FOUNDRY_CONFIG_PATH)) {
        Ok(address) => {
            info!("Using library {LIBRARY_NAME} at address {address}");
            Some(address)
        }
        Err(e) => {
            warn!("{e}");
            warn!("Assuming this contract uses no libraries");
            None
        }
    };

    let details = ContractArtifact::from_file(&root.join(SPELL_ARTIFACT_PATH))?
        .compilation_details(SPELL_SOURCE_PATH)?;
    let request = VerificationRequest {
        contract_name: &args.contract_name,
        address: spell_address,
        source_code: &source_code,
        details,
        constructor_args: &constructor_args,
        library,
    };
    let outcome = verify_contract(etherscan, chain_id, &request, config).await?;
    report(&request, chain_id, &outcome)?;

    let action_address = chain.action_address(spell_address).await?;
    info!("Spell {SPELL_ACTION_CONTRACT_NAME} address: {action_address}");

    // The action contract is compiled from the same source as the spell
    let details = ContractArtifact::from_file(&root.join(SPELL_ACTION_ARTIFACT_PATH))?
        .compilation_details(SPELL_SOURCE_PATH)?;
    let request = VerificationRequest {
        contract_name: SPELL_ACTION_CONTRACT_NAME,
        address: action_address,
        details,
        ..request
    };
    let outcome = verify_contract(etherscan, chain_id, &request, config).await?;
    report(&request, chain_id, &outcome)?;

    Ok(())
}

/// Log where a verified contract can be browsed
fn report(
    request: &VerificationRequest<'_>,
    chain_id: u64,
    outcome: &VerificationOutcome,
) -> Result<(), ScriptError> {
    let contract_name = request.contract_name;
    let url = explorer_url(chain_id, request.address)?;
    match outcome {
        VerificationOutcome::Verified(_) => info!("{contract_name} verified at {url}"),
        VerificationOutcome::AlreadyVerified => info!("{contract_name} already verified at {url}"),
    }

    Ok(())
}
