//! Stock Ledger
//!
//! Authoritative per-product stock. Reads here are either advisory (no lock) or taken
//! under row locks inside the caller's transaction; only the order commit decrements.

mod ledger;

pub use ledger::{StockLedgerError, StockLevels};
pub(crate) use ledger::PgStockLedger;
