//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case.

mod balance;
pub mod logging;
mod transfer;

pub use balance::BalanceService;
pub use logging::{LogEntry, LogEvent, LogStats, LoggingService};
pub use transfer::{
    select_coins, PreparedRun, TransferService, TransferSettings, DEFAULT_GAS_BUDGET,
    MAX_INPUT_COINS,
};
