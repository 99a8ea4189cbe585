//! Suidrop Core - sequential SUI transfers to a list of addresses
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: amounts, addresses, keypair derivation and signing, outcomes
//! - **ports**: trait definitions for external dependencies (SuiNode, InputProvider)
//! - **services**: business logic orchestration (balance, transfer, logging)
//! - **adapters**: concrete implementations (JSON-RPC client, address file, ...)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::sync::Arc;

use anyhow::Result;

use adapters::sui_rpc::SuiRpcClient;
use config::Config;
use ports::SuiNode;
use services::{BalanceService, TransferService, TransferSettings};

// Re-export commonly used types at crate root
pub use config::Network;
pub use domain::result::Error;
pub use domain::{
    PreflightReport, RecipientReport, RunEvent, RunSummary, SuiAddress, SuiKeypair,
    TransferOutcome,
};

/// Main context for suidrop operations
///
/// Holds the effective configuration and the single node client shared by
/// all services.
pub struct SuidropContext {
    pub config: Config,
    pub node: Arc<dyn SuiNode>,
    pub balance_service: BalanceService,
}

impl SuidropContext {
    /// Connect to the node selected by `config`
    pub fn new(config: Config) -> Result<Self> {
        let node: Arc<dyn SuiNode> = Arc::new(SuiRpcClient::new(&config.rpc_url())?);
        Ok(Self::with_node(config, node))
    }

    /// Use an existing node handle
    pub fn with_node(config: Config, node: Arc<dyn SuiNode>) -> Self {
        let balance_service = BalanceService::new(Arc::clone(&node));
        Self {
            config,
            node,
            balance_service,
        }
    }

    /// Transfer service configured from the context settings
    pub fn transfer_service(&self, simulate_only: bool) -> TransferService {
        TransferService::new(
            Arc::clone(&self.node),
            TransferSettings {
                gas_budget: self.config.gas_budget,
                account_index: self.config.account_index,
                simulate_only,
                ..TransferSettings::default()
            },
        )
    }
}
