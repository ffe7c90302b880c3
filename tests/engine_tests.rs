//! Engine integration tests
//!
//! Covers the end-to-end operation scenarios and the concurrency
//! properties of the engine: conservation of total balance, absence of
//! observable negative balances, atomicity under failure, and freedom
//! from deadlock when opposing transfers contend for the same accounts.

use bank_ledger::{
    AccountRegistry, Action, AuditLog, LedgerError, MemoryAuditLog, NullAuditLog, Outcome,
    TransactionEngine,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn engine() -> Arc<TransactionEngine> {
    Arc::new(TransactionEngine::new(
        Arc::new(AccountRegistry::new()),
        Arc::new(NullAuditLog) as Arc<dyn AuditLog>,
    ))
}

#[test]
fn test_basic_account_lifecycle() {
    let engine = engine();

    // Scenario: create, deposit, failed withdrawal, failed transfer, transfer
    let alice = engine.create_account("Alice", dec("1000.00")).unwrap();
    assert_eq!(alice, "ACC0001");
    assert_eq!(engine.registry().get(&alice).unwrap().balance, dec("1000.00"));

    assert_eq!(engine.deposit(&alice, dec("500.00")).unwrap(), dec("1500.00"));

    let err = engine.withdraw(&alice, dec("2000.00")).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(engine.registry().get(&alice).unwrap().balance, dec("1500.00"));

    let err = engine.transfer(&alice, "ACC9999", dec("300.00")).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound { .. }));
    assert_eq!(engine.registry().get(&alice).unwrap().balance, dec("1500.00"));

    let bob = engine.create_account("Bob", dec("800.00")).unwrap();
    let (from_balance, to_balance) = engine.transfer(&alice, &bob, dec("300.00")).unwrap();
    assert_eq!(from_balance, dec("1200.00"));
    assert_eq!(to_balance, dec("1100.00"));
}

#[test]
fn test_failed_creation_leaves_counter_unchanged() {
    let engine = engine();

    let err = engine.create_account("", dec("100.00")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidName));

    // The next successful creation still gets the first identifier
    let id = engine.create_account("Alice", dec("100.00")).unwrap();
    assert_eq!(id, "ACC0001");
}

#[test]
fn test_concurrent_deposits_all_apply() {
    let engine = engine();
    let id = engine.create_account("Alice", Decimal::ZERO).unwrap();

    let threads = 8;
    let per_thread = 100;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let id = id.clone();
            thread::spawn(move || {
                for _ in 0..per_thread {
                    engine.deposit(&id, dec("1.00")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = Decimal::from(threads * per_thread);
    assert_eq!(engine.registry().get(&id).unwrap().balance, expected);
}

#[test]
fn test_opposing_transfers_never_deadlock_and_conserve_total() {
    let engine = engine();
    let alice = engine.create_account("Alice", dec("10000.00")).unwrap();
    let bob = engine.create_account("Bob", dec("10000.00")).unwrap();
    let total_before = engine.registry().total_balance();

    // Half the threads push A->B while the other half push B->A over the
    // same two accounts. With sorted-order locking this contends heavily
    // but must terminate.
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let (from, to) = if i % 2 == 0 {
                (alice.clone(), bob.clone())
            } else {
                (bob.clone(), alice.clone())
            };
            thread::spawn(move || {
                for _ in 0..200 {
                    // Insufficient funds is an acceptable outcome mid-storm
                    let _ = engine.transfer(&from, &to, dec("1.00"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.registry().total_balance(), total_before);
    for account in engine.registry().snapshot() {
        assert!(account.balance >= Decimal::ZERO);
    }
}

#[test]
fn test_concurrent_overdraw_attempts_never_go_negative() {
    let engine = engine();
    let id = engine.create_account("Alice", dec("10.00")).unwrap();

    // 16 threads each try to withdraw 3.00; only three can succeed
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let id = id.clone();
            thread::spawn(move || engine.withdraw(&id, dec("3.00")).is_ok())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 3);
    assert_eq!(engine.registry().get(&id).unwrap().balance, dec("1.00"));
}

#[test]
fn test_transfers_on_disjoint_accounts_run_in_parallel() {
    let engine = engine();
    let mut ids = Vec::new();
    for i in 0..8 {
        ids.push(
            engine
                .create_account(&format!("Owner {i}"), dec("1000.00"))
                .unwrap(),
        );
    }
    let total_before = engine.registry().total_balance();

    let handles: Vec<_> = ids
        .chunks(2)
        .map(|pair| {
            let engine = Arc::clone(&engine);
            let from = pair[0].clone();
            let to = pair[1].clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    engine.transfer(&from, &to, dec("0.50")).unwrap();
                    engine.transfer(&to, &from, dec("0.50")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.registry().total_balance(), total_before);
    for id in &ids {
        assert_eq!(engine.registry().get(id).unwrap().balance, dec("1000.00"));
    }
}

#[test]
fn test_audit_trail_matches_operation_sequence() {
    let registry = Arc::new(AccountRegistry::new());
    let audit = Arc::new(MemoryAuditLog::new());
    let engine = TransactionEngine::new(registry, Arc::clone(&audit) as Arc<dyn AuditLog>);

    let alice = engine.create_account("Alice", dec("1000.00")).unwrap();
    let bob = engine.create_account("Bob", dec("500.00")).unwrap();
    engine.transfer(&alice, &bob, dec("100.00")).unwrap();
    let _ = engine.transfer(&alice, &alice, dec("1.00"));

    let records = audit.records();
    assert_eq!(records.len(), 4);

    let transfers = audit.records_for_action(Action::Transfer);
    assert_eq!(transfers.len(), 2);
    assert_eq!(transfers[0].outcome, Outcome::Success);
    assert_eq!(transfers[0].account_ids, vec![alice.clone(), bob.clone()]);
    assert_eq!(transfers[1].outcome, Outcome::Failure);
    assert_eq!(transfers[1].reason.as_deref(), Some("same_account"));

    assert_eq!(audit.records_for_account(&bob).len(), 2);
}
