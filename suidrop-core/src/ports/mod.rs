//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits, not on concrete implementations.

mod input;
mod node;

pub use input::InputProvider;
pub use node::{CoinRef, ExecutionOutcome, ExecutionStatus, PayRequest, SuiNode};
