//! Sui JSON-RPC client
//!
//! Talks to a Sui full node over HTTP JSON-RPC 2.0. Transaction bytes are
//! built by the node (`unsafe_paySui`), signed locally by the caller and then
//! dry-run and executed here.
//!
//! API reference: https://docs.sui.io/sui-api-ref

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use url::Url;

use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::SuiAddress;
use crate::ports::{CoinRef, ExecutionOutcome, ExecutionStatus, PayRequest, SuiNode};

/// HTTP timeout for a single RPC call
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Page size for `suix_getCoins` (the node caps it at 50)
const COIN_PAGE_LIMIT: u64 = 50;

/// Stop paginating after this many pages
const MAX_COIN_PAGES: usize = 200;

// =============================================================================
// JSON-RPC envelope
// =============================================================================

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: JsonValue,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

// =============================================================================
// API Response Models
// =============================================================================

/// `suix_getBalance` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub coin_type: String,
    /// Node returns this as a decimal string
    #[serde(deserialize_with = "deserialize_u64")]
    pub total_balance: u64,
}

/// One page of `suix_getCoins`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinPage {
    data: Vec<SuiCoin>,
    next_cursor: Option<String>,
    #[serde(default)]
    has_next_page: bool,
}

/// Coin object from `suix_getCoins`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiCoin {
    pub coin_object_id: String,
    #[serde(deserialize_with = "deserialize_u64")]
    pub balance: u64,
}

/// `unsafe_*` transaction builder result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBytes {
    tx_bytes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectsStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEffects {
    pub status: EffectsStatus,
}

/// `sui_dryRunTransactionBlock` result
#[derive(Debug, Clone, Deserialize)]
pub struct DryRunResponse {
    pub effects: TransactionEffects,
}

/// `sui_executeTransactionBlock` result
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
}

impl From<&EffectsStatus> for ExecutionStatus {
    fn from(status: &EffectsStatus) -> Self {
        if status.status == "success" {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::Failure(
                status
                    .error
                    .clone()
                    .unwrap_or_else(|| status.status.clone()),
            )
        }
    }
}

/// Deserialize a u64 sent either as a JSON number or a decimal string
fn deserialize_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("invalid u64: {}", n))),
        JsonValue::String(s) => s
            .parse::<u64>()
            .map_err(|e| D::Error::custom(format!("invalid u64 '{}': {}", s, e))),
        _ => Err(D::Error::custom("expected number or string")),
    }
}

// =============================================================================
// Sui RPC Client
// =============================================================================

/// Sui full node JSON-RPC client
#[derive(Debug)]
pub struct SuiRpcClient {
    client: Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Create a client for the given endpoint
    pub fn new(rpc_url: &str) -> Result<Self> {
        let parsed = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL '{}'", rpc_url))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("RPC URL must use http or https, got '{}'", parsed.scheme());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Total balance of a coin type
    pub fn fetch_balance(&self, owner: &SuiAddress, coin_type: &str) -> Result<BalanceResponse> {
        self.call("suix_getBalance", json!([owner.as_str(), coin_type]))
    }

    /// All coins of a coin type, following the pagination cursor
    pub fn fetch_coins(&self, owner: &SuiAddress, coin_type: &str) -> Result<Vec<SuiCoin>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_COIN_PAGES {
            let page: CoinPage = self.call(
                "suix_getCoins",
                json!([owner.as_str(), coin_type, cursor, COIN_PAGE_LIMIT]),
            )?;
            coins.extend(page.data);

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => return Ok(coins),
            }
        }

        anyhow::bail!(
            "Gave up listing coins after {} pages ({} coins so far)",
            MAX_COIN_PAGES,
            coins.len()
        )
    }

    /// Build pay-SUI transaction bytes on the node
    pub fn pay_sui(&self, request: &PayRequest) -> Result<Vec<u8>> {
        let built: TransactionBytes = self.call(
            "unsafe_paySui",
            json!([
                request.signer.as_str(),
                request.input_coins,
                [request.recipient.as_str()],
                [request.amount.to_string()],
                request.gas_budget.to_string(),
            ]),
        )?;

        STANDARD
            .decode(built.tx_bytes.as_bytes())
            .context("Node returned transaction bytes that are not valid base64")
    }

    /// Simulate a transaction
    pub fn dry_run_transaction(&self, tx_bytes: &[u8]) -> Result<DryRunResponse> {
        self.call("sui_dryRunTransactionBlock", json!([STANDARD.encode(tx_bytes)]))
    }

    /// Submit a signed transaction and wait for local execution
    pub fn execute_transaction(&self, tx_bytes: &[u8], signature: &str) -> Result<ExecuteResponse> {
        self.call(
            "sui_executeTransactionBlock",
            json!([
                STANDARD.encode(tx_bytes),
                [signature],
                { "showEffects": true },
                "WaitForLocalExecution",
            ]),
        )
    }

    /// Perform one JSON-RPC call
    fn call<T: DeserializeOwned>(&self, method: &str, params: JsonValue) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        self.check_response_status(&response)?;

        let body: RpcResponse<T> = response
            .json()
            .with_context(|| format!("Failed to parse {} response", method))?;

        if let Some(error) = body.error {
            anyhow::bail!("{} failed: {} (code {})", method, error.message, error.code);
        }

        body.result
            .ok_or_else(|| anyhow!("{} returned neither result nor error", method))
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> anyhow::Error {
        if error.is_timeout() {
            anyhow!(
                "Request to {} timed out after {} seconds",
                self.rpc_url,
                REQUEST_TIMEOUT_SECS
            )
        } else if error.is_connect() {
            anyhow!("Unable to connect to Sui node at {}", self.rpc_url)
        } else {
            anyhow!("Sui node request failed: {}", error)
        }
    }

    /// Check response status and return appropriate errors
    fn check_response_status(&self, response: &reqwest::blocking::Response) -> Result<()> {
        match response.status().as_u16() {
            200 => Ok(()),
            429 => anyhow::bail!("Sui node rate limit exceeded. Please wait a moment and try again."),
            status @ 500..=599 => anyhow::bail!("Sui node unavailable: HTTP {}", status),
            status => anyhow::bail!("Sui node returned HTTP {}", status),
        }
    }
}

// =============================================================================
// SuiNode implementation
// =============================================================================

fn rpc_error(error: anyhow::Error) -> DomainError {
    DomainError::Rpc(format!("{:#}", error))
}

impl SuiNode for SuiRpcClient {
    fn endpoint(&self) -> &str {
        &self.rpc_url
    }

    fn get_balance(&self, owner: &SuiAddress, coin_type: &str) -> DomainResult<u64> {
        self.fetch_balance(owner, coin_type)
            .map(|balance| balance.total_balance)
            .map_err(rpc_error)
    }

    fn get_coins(&self, owner: &SuiAddress, coin_type: &str) -> DomainResult<Vec<CoinRef>> {
        let coins = self.fetch_coins(owner, coin_type).map_err(rpc_error)?;
        Ok(coins
            .into_iter()
            .map(|coin| CoinRef {
                object_id: coin.coin_object_id,
                balance: coin.balance,
            })
            .collect())
    }

    fn build_pay_sui(&self, request: &PayRequest) -> DomainResult<Vec<u8>> {
        self.pay_sui(request).map_err(rpc_error)
    }

    fn dry_run(&self, tx_bytes: &[u8]) -> DomainResult<ExecutionStatus> {
        let response = self.dry_run_transaction(tx_bytes).map_err(rpc_error)?;
        Ok(ExecutionStatus::from(&response.effects.status))
    }

    fn execute(&self, tx_bytes: &[u8], signature: &str) -> DomainResult<ExecutionOutcome> {
        let response = self
            .execute_transaction(tx_bytes, signature)
            .map_err(rpc_error)?;

        let status = match &response.effects {
            Some(effects) => ExecutionStatus::from(&effects.status),
            None => ExecutionStatus::Failure("node returned no transaction effects".to_string()),
        };

        Ok(ExecutionOutcome {
            digest: response.digest,
            status,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
