//! Command payloads for the engine's write operations.

use crate::{ShareSpec, SplitMethod};

/// Create an expense split among group members.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub group_id: String,
    /// The member who fronted the money (not necessarily the caller).
    pub payer_id: String,
    pub amount_minor: i64,
    pub description: String,
    pub method: SplitMethod,
    pub shares: Vec<ShareSpec>,
    /// Authenticated caller.
    pub user_id: String,
}

/// Record a direct payment from the caller to another member.
#[derive(Clone, Debug)]
pub struct SettlementCmd {
    pub group_id: String,
    pub payee_id: String,
    pub amount_minor: i64,
    /// Authenticated caller; always the payer.
    pub user_id: String,
}
