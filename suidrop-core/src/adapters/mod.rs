//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Sui JSON-RPC over blocking HTTP for `SuiNode`
//! - Address file on the local filesystem for the recipient list
//! - Scripted answers for `InputProvider`

pub mod address_file;
pub mod scripted;
pub mod sui_rpc;

#[cfg(test)]
pub mod sui_rpc_mock;
