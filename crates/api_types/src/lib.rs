use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        /// Usernames to add besides the creator; duplicates are ignored.
        #[serde(default)]
        pub members: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupCreated {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: String,
        pub name: String,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupDetailResponse {
        pub group: GroupView,
        pub members: Vec<String>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<String>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitMethod {
        Equal,
        Exact,
        Percent,
    }

    /// One member's requested share. `amount_minor` is read for `exact`
    /// splits, `percent_bp` (basis points) for `percent`; `equal` needs
    /// only the username.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ShareNew {
        pub user_id: String,
        pub amount_minor: Option<i64>,
        pub percent_bp: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub group_id: String,
        pub payer_id: String,
        pub amount_minor: i64,
        pub description: String,
        pub method: SplitMethod,
        pub shares: Vec<ShareNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub user_id: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub payer_id: String,
        pub amount_minor: i64,
        pub description: String,
        pub method: SplitMethod,
        pub archived: bool,
        pub created_at: DateTime<Utc>,
        pub splits: Vec<SplitView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementNew {
        pub group_id: String,
        pub payee_id: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementView {
        pub id: Uuid,
        pub payer_id: String,
        pub payee_id: String,
        pub amount_minor: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementsResponse {
        pub settlements: Vec<SettlementView>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub lender_id: String,
        pub borrower_id: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupBalancesResponse {
        pub balances: Vec<BalanceView>,
    }

    /// Consumer-facing summary across all groups.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceSummary {
        /// Total others owe the user (user is lender).
        pub total_owed_minor: i64,
        /// Total the user owes (user is borrower).
        pub total_due_minor: i64,
    }
}
