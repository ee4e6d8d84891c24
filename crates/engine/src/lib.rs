//! Divvy engine: shared-expense ledger and balance derivation.
//!
//! The engine owns the database and exposes every operation the outer
//! layers need: group management, expense and settlement recording, and
//! the derived simplified balances. Ledger rows (expenses, splits,
//! settlements) are append-only facts; balance rows are a materialized
//! view rebuilt from scratch inside the same transaction as each ledger
//! mutation, so stored balances can never drift from ledger truth.
//!
//! The derivation itself is pure and lives in [`netflow`] and
//! [`simplify`]: fold the ledger into one signed position per member,
//! then greedily match creditors against debtors.

pub use balances::{BalanceSummary, DebtEdge};
pub use commands::{ExpenseCmd, SettlementCmd};
pub use error::EngineError;
pub use expenses::{Expense, SplitMethod};
pub use groups::Group;
pub use ops::{Engine, EngineBuilder};
pub use settlements::Settlement;
pub use simplify::DUST_MINOR;
pub use splits::Split;

pub use allocation::ShareSpec;

mod allocation;
mod balances;
mod commands;
mod error;
mod expenses;
mod group_members;
mod groups;
mod netflow;
mod ops;
mod settlements;
mod simplify;
mod splits;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
