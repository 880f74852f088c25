//! A minimal Etherscan v2 client and the source verification flow built on it

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use alloy::primitives::Address;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    artifacts::CompilationDetails,
    constants::{
        ALREADY_VERIFIED_FRAGMENT, CHECK_STATUS_ACTION, CODE_FORMAT, ETHERSCAN_API_URL,
        ETHERSCAN_MODULE, ETHERSCAN_OK_MESSAGE, ETHERSCAN_OK_STATUS, ETHERSCAN_POLL_INTERVAL,
        LIBRARY_NAME, MAINNET_CHAIN_ID, NOT_YET_INDEXED_FRAGMENT, PENDING_FRAGMENT,
        SEPOLIA_CHAIN_ID, VERIFY_SOURCE_ACTION,
    },
    errors::ScriptError,
};

/// Form fields of an Etherscan request, excluding the API key
pub type EtherscanForm = Vec<(&'static str, String)>;

/// The envelope of every Etherscan API response
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EtherscanResponse {
    /// `1` on success, `0` otherwise
    pub status: String,
    /// `OK` on success, `NOTOK` otherwise
    pub message: String,
    /// The payload, or a human-readable error
    pub result: String,
}

impl EtherscanResponse {
    /// Whether the request succeeded
    pub fn is_ok(&self) -> bool {
        self.status == ETHERSCAN_OK_STATUS && self.message == ETHERSCAN_OK_MESSAGE
    }

    /// Whether the result mentions `fragment`, ignoring case
    pub fn result_mentions(&self, fragment: &str) -> bool {
        self.result.to_lowercase().contains(fragment)
    }
}

/// The Etherscan API, as used by the verification flow
#[allow(async_fn_in_trait)]
pub trait EtherscanApi {
    /// POST a form to the API for the given chain
    async fn post(
        &self,
        chain_id: u64,
        form: &EtherscanForm,
    ) -> Result<EtherscanResponse, ScriptError>;
}

/// An HTTP client for the Etherscan v2 API
pub struct EtherscanClient {
    /// The underlying HTTP client
    http: reqwest::Client,
    /// The API endpoint
    url: String,
    /// The API key sent with every request
    api_key: String,
}

impl EtherscanClient {
    /// Create a client for the public Etherscan endpoint
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: ETHERSCAN_API_URL.to_string(),
            api_key,
        }
    }
}

impl EtherscanApi for EtherscanClient {
    async fn post(
        &self,
        chain_id: u64,
        form: &EtherscanForm,
    ) -> Result<EtherscanResponse, ScriptError> {
        let mut fields: Vec<(&str, &str)> = vec![("apikey", self.api_key.as_str())];
        fields.extend(form.iter().map(|(k, v)| (*k, v.as_str())));

        let body = self
            .http
            .post(&self.url)
            .query(&[("chainid", chain_id)])
            .form(&fields)
            .send()
            .await
            .map_err(|e| ScriptError::Etherscan(e.to_string()))?
            .text()
            .await
            .map_err(|e| ScriptError::Etherscan(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| ScriptError::Etherscan(format!("invalid JSON response ({e}): {body}")))
    }
}

/// Everything Etherscan needs to verify one contract
#[derive(Debug, Clone)]
pub struct VerificationRequest<'a> {
    /// The name of the contract within the flattened source
    pub contract_name: &'a str,
    /// The deployed address
    pub address: Address,
    /// The flattened source code
    pub source_code: &'a str,
    /// The compiler settings the contract was built with
    pub details: CompilationDetails,
    /// ABI-encoded constructor arguments in hex, possibly empty
    pub constructor_args: &'a str,
    /// The address of the linked spell library, if any
    pub library: Option<Address>,
}

impl VerificationRequest<'_> {
    /// The `verifysourcecode` form for this request
    pub fn form(&self) -> EtherscanForm {
        let details = &self.details;
        let mut form = vec![
            ("module", ETHERSCAN_MODULE.to_string()),
            ("action", VERIFY_SOURCE_ACTION.to_string()),
            ("contractaddress", self.address.to_string()),
            ("sourceCode", self.source_code.to_string()),
            ("codeFormat", CODE_FORMAT.to_string()),
            ("contractName", self.contract_name.to_string()),
            ("compilerversion", details.compiler_version.clone()),
            ("optimizationUsed", u8::from(details.optimizer_enabled).to_string()),
            ("runs", details.optimizer_runs.to_string()),
            // Etherscan's spelling
            ("constructorArguements", self.constructor_args.to_string()),
            ("evmversion", details.evm_version.clone()),
            ("licenseType", details.license_code.to_string()),
        ];

        if let Some(library) = self.library {
            form.push(("libraryname1", LIBRARY_NAME.to_string()));
            form.push(("libraryaddress1", library.to_string()));
        }

        form
    }
}

/// How a successful verification concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Etherscan accepted the source under the given request GUID
    Verified(String),
    /// The contract had been verified before
    AlreadyVerified,
}

/// Tunables of the verification flow
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// How long to wait before asking Etherscan again
    pub poll_interval: Duration,
    /// Where to write the source of a failed verification
    pub log_dir: PathBuf,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            poll_interval: ETHERSCAN_POLL_INTERVAL,
            log_dir: PathBuf::from("."),
        }
    }
}

/// Submit a contract for verification and wait until Etherscan settles it
pub async fn verify_contract<E: EtherscanApi>(
    api: &E,
    chain_id: u64,
    request: &VerificationRequest<'_>,
    config: &VerifierConfig,
) -> Result<VerificationOutcome, ScriptError> {
    let form = request.form();

    info!("Sending verification request for {}...", request.contract_name);
    let mut response = api.post(chain_id, &form).await?;
    while response.result_mentions(NOT_YET_INDEXED_FRAGMENT) {
        info!("{}", response.result);
        info!("Waiting for the network to update...");
        tokio::time::sleep(config.poll_interval).await;
        response = api.post(chain_id, &form).await?;
    }

    if !response.is_ok() {
        if response.result_mentions(ALREADY_VERIFIED_FRAGMENT) {
            warn!("{}", response.result);
            return Ok(VerificationOutcome::AlreadyVerified);
        }
        return Err(ScriptError::Verification(response.result));
    }

    let guid = response.result;
    info!("Sent verification request with guid {guid}");

    let check_form = vec![
        ("module", ETHERSCAN_MODULE.to_string()),
        ("action", CHECK_STATUS_ACTION.to_string()),
        ("guid", guid.clone()),
    ];
    let mut status = api.post(chain_id, &check_form).await?;
    while status.result_mentions(PENDING_FRAGMENT) {
        info!("{}", status.result);
        info!("Waiting for Etherscan to process the request...");
        tokio::time::sleep(config.poll_interval).await;
        status = api.post(chain_id, &check_form).await?;
    }

    if !status.is_ok() {
        if status.result_mentions(ALREADY_VERIFIED_FRAGMENT) {
            warn!("{}", status.result);
            return Ok(VerificationOutcome::AlreadyVerified);
        }

        let log_path = write_failure_log(&config.log_dir, request.source_code)?;
        return Err(ScriptError::Verification(format!(
            "{}, source written to {}",
            status.result,
            log_path.display()
        )));
    }

    Ok(VerificationOutcome::Verified(guid))
}

/// Write the submitted source next to the failed verification for inspection
fn write_failure_log(log_dir: &Path, source_code: &str) -> Result<PathBuf, ScriptError> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?
        .as_millis();
    let log_path = log_dir.join(format!("verify-{timestamp}.log"));

    fs::write(&log_path, source_code).map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    info!("log written to {}", log_path.display());

    Ok(log_path)
}

/// The block explorer page of a verified contract
pub fn explorer_url(chain_id: u64, address: Address) -> Result<String, ScriptError> {
    let subdomain = match chain_id {
        MAINNET_CHAIN_ID => "",
        SEPOLIA_CHAIN_ID => "sepolia.",
        _ => return Err(ScriptError::UnsupportedChain(chain_id)),
    };

    Ok(format!("https://{subdomain}etherscan.io/address/{address}#code"))
}
