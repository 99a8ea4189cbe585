//! Transfer service - the sequential send loop
//!
//! Inputs are validated before any network call. After one preflight balance
//! check, each recipient goes through balance check, coin selection, build,
//! sign, dry run and execute. A failure in any step ends that recipient only.

use std::sync::Arc;

use crate::domain::amount::parse_amount;
use crate::domain::result::{Error, Result};
use crate::domain::{
    PreflightReport, RecipientReport, RunEvent, RunSummary, SuiAddress, SuiKeypair,
    TransferOutcome, SUI_COIN_TYPE, SUI_DECIMALS,
};
use crate::ports::{CoinRef, ExecutionStatus, InputProvider, PayRequest, SuiNode};

use super::balance::BalanceService;

/// Gas budget per transfer in MIST
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

/// Most input coins a single pay transaction may reference
pub const MAX_INPUT_COINS: usize = 255;

/// Knobs for a transfer run
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub gas_budget: u64,
    pub coin_type: String,
    pub decimals: u32,
    pub account_index: u32,
    /// Stop after a successful dry run
    pub simulate_only: bool,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            gas_budget: DEFAULT_GAS_BUDGET,
            coin_type: SUI_COIN_TYPE.to_string(),
            decimals: SUI_DECIMALS,
            account_index: 0,
            simulate_only: false,
        }
    }
}

/// Validated inputs of a run
#[derive(Debug)]
pub struct PreparedRun {
    pub keypair: SuiKeypair,
    /// Amount per recipient in base units
    pub amount: u64,
    pub recipients: Vec<String>,
}

/// Transfer service
pub struct TransferService {
    node: Arc<dyn SuiNode>,
    balance_service: BalanceService,
    settings: TransferSettings,
}

impl TransferService {
    pub fn new(node: Arc<dyn SuiNode>, settings: TransferSettings) -> Self {
        let balance_service = BalanceService::with_coin_type(Arc::clone(&node), &settings.coin_type);
        Self {
            node,
            balance_service,
            settings,
        }
    }

    /// Read and validate the mnemonic, amount and recipient list.
    ///
    /// Touches no network.
    pub fn prepare(&self, input: &dyn InputProvider) -> Result<PreparedRun> {
        let phrase = input.mnemonic()?;
        let keypair = SuiKeypair::from_mnemonic(&phrase, self.settings.account_index)?;

        let raw_amount = input.amount()?;
        let amount = parse_amount(&raw_amount, self.settings.decimals)?;

        let recipients = input.recipients()?;
        if recipients.is_empty() {
            return Err(Error::validation("No recipient addresses to send to"));
        }

        Ok(PreparedRun {
            keypair,
            amount,
            recipients,
        })
    }

    /// Query the sender balance once and compare it to the run total
    pub fn preflight(
        &self,
        sender: &SuiAddress,
        amount: u64,
        recipient_count: usize,
    ) -> Result<PreflightReport> {
        self.balance_service.preflight(sender, amount, recipient_count)
    }

    /// Process one recipient. Never fails; errors become `TransferOutcome::Error`.
    pub fn send_to(&self, keypair: &SuiKeypair, recipient: &str, amount: u64) -> TransferOutcome {
        match self.try_send(keypair, recipient, amount) {
            Ok(outcome) => outcome,
            Err(e) => TransferOutcome::Error {
                message: e.to_string(),
            },
        }
    }

    fn try_send(&self, keypair: &SuiKeypair, recipient: &str, amount: u64) -> Result<TransferOutcome> {
        let recipient = SuiAddress::parse(recipient)?;
        let sender = keypair.address();

        let balance = self.balance_service.get_balance(sender)?;
        if balance < amount {
            return Ok(TransferOutcome::Skipped { balance });
        }

        let coins = self.node.get_coins(sender, &self.settings.coin_type)?;
        let target = u128::from(amount) + u128::from(self.settings.gas_budget);
        let input_coins = select_coins(coins, target)?;

        let tx_bytes = self.node.build_pay_sui(&PayRequest {
            signer: sender.clone(),
            input_coins,
            recipient,
            amount,
            gas_budget: self.settings.gas_budget,
        })?;

        let signature = keypair.sign_transaction(&tx_bytes);

        if let ExecutionStatus::Failure(reason) = self.node.dry_run(&tx_bytes)? {
            return Err(Error::DryRun(reason));
        }

        if self.settings.simulate_only {
            return Ok(TransferOutcome::Simulated);
        }

        let executed = self.node.execute(&tx_bytes, &signature)?;
        Ok(match executed.status {
            ExecutionStatus::Success => TransferOutcome::Sent {
                digest: executed.digest,
            },
            ExecutionStatus::Failure(error) => TransferOutcome::Failed {
                digest: executed.digest,
                error,
            },
        })
    }

    /// Run the whole flow, reporting progress through `on_event`.
    ///
    /// Returns `Err` only for fatal problems: invalid input, a failed
    /// balance query, or a preflight shortfall.
    pub fn run<F>(&self, input: &dyn InputProvider, mut on_event: F) -> Result<RunSummary>
    where
        F: FnMut(&RunEvent),
    {
        let prepared = self.prepare(input)?;
        let sender = prepared.keypair.address().clone();
        let count = prepared.recipients.len();

        on_event(&RunEvent::Sender {
            address: sender.clone(),
            amount: prepared.amount,
            recipient_count: count,
        });

        let report = self.preflight(&sender, prepared.amount, count)?;
        on_event(&RunEvent::Preflight(report.clone()));

        if !report.is_sufficient() {
            return Err(Error::InsufficientBalance {
                available: report.balance,
                required: report.required,
            });
        }

        let mut summary = RunSummary::default();
        for (index, recipient) in prepared.recipients.iter().enumerate() {
            on_event(&RunEvent::Started {
                index,
                recipient: recipient.clone(),
            });

            let outcome = self.send_to(&prepared.keypair, recipient, prepared.amount);
            summary.record(&outcome);

            on_event(&RunEvent::Recipient(RecipientReport {
                index,
                recipient: recipient.clone(),
                outcome,
            }));
        }

        Ok(summary)
    }
}

/// Pick coins largest first until they cover `target`.
///
/// The first returned coin is the largest and pays gas.
pub fn select_coins(mut coins: Vec<CoinRef>, target: u128) -> Result<Vec<String>> {
    coins.sort_by(|a, b| b.balance.cmp(&a.balance));

    let mut selected = Vec::new();
    let mut covered: u128 = 0;

    for coin in coins.into_iter().take(MAX_INPUT_COINS) {
        if covered >= target {
            break;
        }
        covered += u128::from(coin.balance);
        selected.push(coin.object_id);
    }

    if covered < target {
        return Err(Error::InsufficientBalance {
            available: u64::try_from(covered).unwrap_or(u64::MAX),
            required: target,
        });
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, balance: u64) -> CoinRef {
        CoinRef {
            object_id: id.to_string(),
            balance,
        }
    }

    #[test]
    fn test_select_coins_largest_first() {
        let coins = vec![coin("a", 10), coin("b", 50), coin("c", 30)];
        let selected = select_coins(coins, 70).unwrap();
        assert_eq!(selected, vec!["b", "c"]);
    }

    #[test]
    fn test_select_coins_single_coin_enough() {
        let coins = vec![coin("a", 10), coin("b", 500)];
        assert_eq!(select_coins(coins, 100).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_select_coins_insufficient() {
        let coins = vec![coin("a", 10), coin("b", 20)];
        let err = select_coins(coins, 100).unwrap_err();
        match err {
            Error::InsufficientBalance {
                available,
                required,
            } => {
                assert_eq!(available, 30);
                assert_eq!(required, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_select_coins_caps_input_count() {
        let coins: Vec<CoinRef> = (0..300).map(|i| coin(&format!("c{i}"), 1)).collect();
        assert!(select_coins(coins.clone(), 255).is_ok());
        assert!(select_coins(coins, 256).is_err());
    }

    #[test]
    fn test_select_coins_empty() {
        assert!(select_coins(vec![], 1).is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = TransferSettings::default();
        assert_eq!(settings.gas_budget, 10_000_000);
        assert_eq!(settings.coin_type, "0x2::sui::SUI");
        assert_eq!(settings.decimals, 9);
        assert!(!settings.simulate_only);
    }
}
