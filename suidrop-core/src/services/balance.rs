//! Balance service - sender balance lookups and the preflight check

use std::sync::Arc;

use crate::domain::amount::total_required;
use crate::domain::result::Result;
use crate::domain::{PreflightReport, SuiAddress, SUI_COIN_TYPE};
use crate::ports::SuiNode;

/// Balance service for the sending account
pub struct BalanceService {
    node: Arc<dyn SuiNode>,
    coin_type: String,
}

impl BalanceService {
    pub fn new(node: Arc<dyn SuiNode>) -> Self {
        Self::with_coin_type(node, SUI_COIN_TYPE)
    }

    pub fn with_coin_type(node: Arc<dyn SuiNode>, coin_type: impl Into<String>) -> Self {
        Self {
            node,
            coin_type: coin_type.into(),
        }
    }

    pub fn coin_type(&self) -> &str {
        &self.coin_type
    }

    /// Current total balance in base units
    pub fn get_balance(&self, owner: &SuiAddress) -> Result<u64> {
        self.node.get_balance(owner, &self.coin_type)
    }

    /// One balance query compared against `amount * recipient_count`.
    ///
    /// Gas is not part of `required`; each transfer re-checks the balance.
    pub fn preflight(
        &self,
        sender: &SuiAddress,
        amount: u64,
        recipient_count: usize,
    ) -> Result<PreflightReport> {
        let balance = self.get_balance(sender)?;

        Ok(PreflightReport {
            sender: sender.clone(),
            balance,
            required: total_required(amount, recipient_count),
            recipient_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Error;
    use crate::ports::{CoinRef, ExecutionOutcome, ExecutionStatus, PayRequest};

    struct FixedBalance(u64);

    impl SuiNode for FixedBalance {
        fn endpoint(&self) -> &str {
            "fixed"
        }

        fn get_balance(&self, _owner: &SuiAddress, coin_type: &str) -> Result<u64> {
            assert_eq!(coin_type, SUI_COIN_TYPE);
            Ok(self.0)
        }

        fn get_coins(&self, _owner: &SuiAddress, _coin_type: &str) -> Result<Vec<CoinRef>> {
            Ok(vec![])
        }

        fn build_pay_sui(&self, _request: &PayRequest) -> Result<Vec<u8>> {
            Err(Error::rpc("not used"))
        }

        fn dry_run(&self, _tx_bytes: &[u8]) -> Result<ExecutionStatus> {
            Err(Error::rpc("not used"))
        }

        fn execute(&self, _tx_bytes: &[u8], _signature: &str) -> Result<ExecutionOutcome> {
            Err(Error::rpc("not used"))
        }
    }

    #[test]
    fn test_preflight_sufficient() {
        let service = BalanceService::new(Arc::new(FixedBalance(3_000_000_000)));
        let sender = SuiAddress::from_bytes([7; 32]);

        let report = service.preflight(&sender, 1_000_000_000, 3).unwrap();
        assert_eq!(report.required, 3_000_000_000);
        assert!(report.is_sufficient());
    }

    #[test]
    fn test_preflight_insufficient() {
        let service = BalanceService::new(Arc::new(FixedBalance(2_999_999_999)));
        let sender = SuiAddress::from_bytes([7; 32]);

        let report = service.preflight(&sender, 1_000_000_000, 3).unwrap();
        assert!(!report.is_sufficient());
        assert_eq!(report.recipient_count, 3);
    }

    #[test]
    fn test_preflight_large_totals_do_not_overflow() {
        let service = BalanceService::new(Arc::new(FixedBalance(u64::MAX)));
        let sender = SuiAddress::from_bytes([7; 32]);

        let report = service.preflight(&sender, u64::MAX, 2).unwrap();
        assert_eq!(report.required, u128::from(u64::MAX) * 2);
        assert!(!report.is_sufficient());
    }
}
