//! Relational store port trait.

use crate::domain::error::PapertradeError;
use crate::domain::portfolio::{Holding, TransactionRecord, UserRecord};

/// Users and their transaction ledger.
///
/// `record_buy` and `record_sell` are atomic: the balance or holding check,
/// the cash update, and the ledger insert commit together or not at all, so
/// concurrent trades from one user cannot interleave between the check and
/// the writes.
pub trait StorePort {
    /// Insert a new user with the given password hash and starting cash.
    /// Returns the new row id; fails with `UsernameTaken` on a duplicate.
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        starting_cash: f64,
    ) -> Result<i64, PapertradeError>;

    fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, PapertradeError>;

    fn user_by_id(&self, id: i64) -> Result<Option<UserRecord>, PapertradeError>;

    /// Debit `cost` from the user's cash and append a positive ledger row.
    /// Fails with `InsufficientCash` (and no mutation) if cash would go
    /// negative.
    fn record_buy(
        &self,
        user_id: i64,
        symbol: &str,
        quantity: f64,
        cost: f64,
    ) -> Result<(), PapertradeError>;

    /// Credit `proceeds` to the user's cash and append a negative ledger
    /// row. Fails with `InsufficientShares` (and no mutation) if the user's
    /// net holding in `symbol` is below `quantity`.
    fn record_sell(
        &self,
        user_id: i64,
        symbol: &str,
        quantity: f64,
        proceeds: f64,
    ) -> Result<(), PapertradeError>;

    /// Net open positions: symbols whose signed quantity sum exceeds the
    /// dust epsilon, ordered by symbol.
    fn holdings(&self, user_id: i64) -> Result<Vec<Holding>, PapertradeError>;

    /// The user's full ledger, oldest first.
    fn transactions(&self, user_id: i64) -> Result<Vec<TransactionRecord>, PapertradeError>;
}
