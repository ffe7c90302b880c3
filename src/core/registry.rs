//! Account registry
//!
//! The registry owns the authoritative in-memory account state while the
//! process runs: a map from account identifier to the account itself, each
//! account behind its own mutex so the engine can lock exactly the accounts
//! an operation touches. A registry-level `RwLock` guards the map structure
//! (insertions and bulk replacement) without serializing balance operations
//! on unrelated accounts.

use crate::types::{Account, AccountId, LedgerError};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared lock handle for a single account
pub(crate) type AccountHandle = Arc<Mutex<Account>>;

/// Prefix of every account identifier
const ID_PREFIX: &str = "ACC";

/// Format the n-th account identifier (`ACC0001`, `ACC0002`, ...)
fn format_account_id(n: u64) -> AccountId {
    format!("{ID_PREFIX}{n:04}")
}

/// Extract the numeric suffix of an identifier, if well-formed
fn id_suffix(id: &str) -> Option<u64> {
    id.strip_prefix(ID_PREFIX).and_then(|s| s.parse().ok())
}

struct RegistryState {
    accounts: HashMap<AccountId, AccountHandle>,
    next_account_id: u64,
}

/// In-memory authoritative collection of all accounts
///
/// Constructed once at process start and handed to the engine and the
/// persistence glue by `Arc` — never a hidden singleton, so tests can use
/// fresh instances freely. Balance mutation is the engine's job; the
/// registry only creates accounts, hands out lock handles, and produces or
/// swaps whole-state snapshots.
pub struct AccountRegistry {
    inner: RwLock<RegistryState>,
}

impl AccountRegistry {
    /// Create an empty registry with the identifier counter at 1
    pub fn new() -> Self {
        AccountRegistry {
            inner: RwLock::new(RegistryState {
                accounts: HashMap::new(),
                next_account_id: 1,
            }),
        }
    }

    /// Create a new account and return its identifier
    ///
    /// Validates the owner name and starting balance, allocates the next
    /// sequential identifier, and inserts the account. The counter is
    /// untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `owner_name` is empty or blank (`InvalidName`)
    /// - `starting_balance` is negative (`NegativeBalance`)
    pub fn create_account(
        &self,
        owner_name: &str,
        starting_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        if owner_name.trim().is_empty() {
            return Err(LedgerError::InvalidName);
        }

        if starting_balance < Decimal::ZERO {
            return Err(LedgerError::negative_balance(starting_balance));
        }

        let mut state = self.inner.write();
        let id = format_account_id(state.next_account_id);
        state.next_account_id += 1;

        let account = Account::new(id.clone(), owner_name, starting_balance);
        state.accounts.insert(id.clone(), Arc::new(Mutex::new(account)));

        Ok(id)
    }

    /// Get a copy of the current state of an account
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the identifier does not exist.
    pub fn get(&self, id: &str) -> Result<Account, LedgerError> {
        let handle = self.handle(id)?;
        let account = handle.lock();
        Ok(account.clone())
    }

    /// Get the lock handle for an account
    ///
    /// Used by the engine to acquire account locks in sorted order. The map
    /// read lock is released before any account lock is taken.
    pub(crate) fn handle(&self, id: &str) -> Result<AccountHandle, LedgerError> {
        let state = self.inner.read();
        state
            .accounts
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Produce a consistent snapshot of all accounts, sorted by identifier
    ///
    /// Locks every account in sorted order before copying, so the snapshot
    /// never observes a transfer midway: it reflects a state between
    /// operations, which is what the storage backends persist.
    pub fn snapshot(&self) -> Vec<Account> {
        let handles: Vec<(AccountId, AccountHandle)> = {
            let state = self.inner.read();
            let mut pairs: Vec<_> = state
                .accounts
                .iter()
                .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
                .collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            pairs
        };

        let guards: Vec<_> = handles.iter().map(|(_, handle)| handle.lock()).collect();
        guards.iter().map(|guard| (**guard).clone()).collect()
    }

    /// Atomically replace the entire account set
    ///
    /// Used only when restoring from storage. The identifier counter becomes
    /// the larger of the persisted counter and the maximum loaded suffix
    /// plus one, so a stale persisted counter can never cause identifier
    /// reuse.
    pub fn replace_all(&self, accounts: Vec<Account>, next_account_id: u64) {
        let max_suffix = accounts
            .iter()
            .filter_map(|account| id_suffix(&account.id))
            .max()
            .unwrap_or(0);

        let mut state = self.inner.write();
        state.accounts = accounts
            .into_iter()
            .map(|account| (account.id.clone(), Arc::new(Mutex::new(account))))
            .collect();
        state.next_account_id = next_account_id.max(max_suffix + 1).max(1);
    }

    /// The identifier the next created account will receive
    pub fn next_account_id(&self) -> u64 {
        self.inner.read().next_account_id
    }

    /// Number of accounts currently registered
    pub fn len(&self) -> usize {
        self.inner.read().accounts.len()
    }

    /// Whether the registry holds no accounts
    pub fn is_empty(&self) -> bool {
        self.inner.read().accounts.is_empty()
    }

    /// Sum of all account balances
    ///
    /// Computed from a consistent snapshot; any successful transfer leaves
    /// this total unchanged.
    pub fn total_balance(&self) -> Decimal {
        self.snapshot()
            .iter()
            .map(|account| account.balance)
            .sum()
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_create_account_allocates_sequential_ids() {
        let registry = AccountRegistry::new();

        let first = registry.create_account("Alice", Decimal::new(100000, 2)).unwrap();
        let second = registry.create_account("Bob", Decimal::new(80000, 2)).unwrap();

        assert_eq!(first, "ACC0001");
        assert_eq!(second, "ACC0002");
        assert_eq!(registry.next_account_id(), 3);
    }

    #[test]
    fn test_create_account_stores_owner_and_balance() {
        let registry = AccountRegistry::new();

        let id = registry.create_account("Alice", Decimal::new(100000, 2)).unwrap();
        let account = registry.get(&id).unwrap();

        assert_eq!(account.owner_name, "Alice");
        assert_eq!(account.balance, Decimal::new(100000, 2));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    fn test_create_account_rejects_blank_name(#[case] name: &str) {
        let registry = AccountRegistry::new();

        let result = registry.create_account(name, Decimal::ZERO);

        assert!(matches!(result.unwrap_err(), LedgerError::InvalidName));
        // Counter must be untouched by the failed attempt
        assert_eq!(registry.next_account_id(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_account_rejects_negative_balance() {
        let registry = AccountRegistry::new();

        let result = registry.create_account("Alice", Decimal::new(-1, 2));

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::NegativeBalance { .. }
        ));
        assert_eq!(registry.next_account_id(), 1);
    }

    #[test]
    fn test_create_account_allows_zero_balance() {
        let registry = AccountRegistry::new();

        let id = registry.create_account("Alice", Decimal::ZERO).unwrap();

        assert_eq!(registry.get(&id).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_get_unknown_account_fails() {
        let registry = AccountRegistry::new();

        let result = registry.get("ACC9999");

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountNotFound { .. }
        ));
    }

    #[test]
    fn test_snapshot_is_sorted_by_id() {
        let registry = AccountRegistry::new();
        for name in ["Alice", "Bob", "Carol"] {
            registry.create_account(name, Decimal::ONE).unwrap();
        }

        let snapshot = registry.snapshot();

        let ids: Vec<_> = snapshot.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ACC0001", "ACC0002", "ACC0003"]);
    }

    #[test]
    fn test_snapshot_is_idempotent_without_mutation() {
        let registry = AccountRegistry::new();
        registry.create_account("Alice", Decimal::new(100000, 2)).unwrap();
        registry.create_account("Bob", Decimal::new(80000, 2)).unwrap();

        assert_eq!(registry.snapshot(), registry.snapshot());
    }

    #[test]
    fn test_replace_all_swaps_state_and_recomputes_counter() {
        let registry = AccountRegistry::new();
        registry.create_account("Old", Decimal::ONE).unwrap();

        let replacement = vec![
            Account::new("ACC0005".to_string(), "Alice", Decimal::new(100000, 2)),
            Account::new("ACC0002".to_string(), "Bob", Decimal::new(80000, 2)),
        ];
        registry.replace_all(replacement, 3);

        assert_eq!(registry.len(), 2);
        // Counter follows the max suffix, not the stale persisted value
        assert_eq!(registry.next_account_id(), 6);
        assert!(registry.get("ACC0001").is_err());
        assert_eq!(registry.get("ACC0005").unwrap().owner_name, "Alice");
    }

    #[test]
    fn test_replace_all_honors_larger_persisted_counter() {
        let registry = AccountRegistry::new();

        let accounts = vec![Account::new(
            "ACC0001".to_string(),
            "Alice",
            Decimal::ONE,
        )];
        registry.replace_all(accounts, 10);

        assert_eq!(registry.next_account_id(), 10);
    }

    #[test]
    fn test_replace_all_with_empty_set_resets_counter_to_one() {
        let registry = AccountRegistry::new();
        registry.create_account("Alice", Decimal::ONE).unwrap();

        registry.replace_all(Vec::new(), 0);

        assert!(registry.is_empty());
        assert_eq!(registry.next_account_id(), 1);
    }

    #[test]
    fn test_total_balance_sums_all_accounts() {
        let registry = AccountRegistry::new();
        registry.create_account("Alice", Decimal::new(100000, 2)).unwrap();
        registry.create_account("Bob", Decimal::new(80000, 2)).unwrap();

        assert_eq!(registry.total_balance(), Decimal::new(180000, 2));
    }

    #[rstest]
    #[case("ACC0001", Some(1))]
    #[case("ACC0042", Some(42))]
    #[case("ACC10000", Some(10000))]
    #[case("XYZ0001", None)]
    #[case("ACCx", None)]
    fn test_id_suffix_parsing(#[case] id: &str, #[case] expected: Option<u64>) {
        assert_eq!(id_suffix(id), expected);
    }

    #[test]
    fn test_id_formatting_widens_past_four_digits() {
        assert_eq!(format_account_id(1), "ACC0001");
        assert_eq!(format_account_id(9999), "ACC9999");
        assert_eq!(format_account_id(10000), "ACC10000");
    }
}
