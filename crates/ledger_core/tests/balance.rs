mod support;

use ledger_core::{
    balance_for, overall_stats, BalanceStatus, ItemAdjustmentType, LedgerState, PersonBalance,
    TransactionType,
};
use support::{adjustment, person, transaction};

#[test]
fn person_without_entries_is_balanced_at_zero() {
    let state = LedgerState {
        persons: vec![person("p1", "Hamza")],
        ..LedgerState::default()
    };

    let balance = balance_for(&state, "p1");
    assert_eq!(balance, PersonBalance::default());
    assert_eq!(balance.status(), BalanceStatus::Balanced);
}

#[test]
fn every_category_is_summed_and_netted() {
    let state = LedgerState {
        persons: vec![person("p1", "Hamza"), person("p2", "Zoya")],
        transactions: vec![
            transaction("t1", "p1", TransactionType::Borrowed, 1000.0),
            transaction("t2", "p1", TransactionType::Borrowed, 250.0),
            transaction("t3", "p1", TransactionType::Returned, 300.0),
            transaction("t4", "p1", TransactionType::Given, 50.0),
            transaction("t5", "p2", TransactionType::Borrowed, 9999.0),
        ],
        item_adjustments: vec![
            adjustment("a1", "p1", ItemAdjustmentType::GivenByMe, 120.0),
            adjustment("a2", "p1", ItemAdjustmentType::GivenToMe, 20.0),
        ],
        ..LedgerState::default()
    };

    let balance = balance_for(&state, "p1");
    assert_eq!(balance.total_borrowed, 1250.0);
    assert_eq!(balance.total_returned, 300.0);
    assert_eq!(balance.total_given, 50.0);
    assert_eq!(balance.total_items_given_by_me, 120.0);
    assert_eq!(balance.total_items_given_to_me, 20.0);
    assert_eq!(balance.final_balance, 1250.0 - 300.0 - 50.0 + 20.0 - 120.0);
    assert_eq!(balance.status(), BalanceStatus::IOwe);
}

#[test]
fn person_who_received_more_owes_the_user() {
    let state = LedgerState {
        transactions: vec![
            transaction("t1", "p1", TransactionType::Given, 700.0),
            transaction("t2", "p1", TransactionType::Borrowed, 200.0),
        ],
        ..LedgerState::default()
    };

    let balance = balance_for(&state, "p1");
    assert_eq!(balance.final_balance, -500.0);
    assert_eq!(balance.status(), BalanceStatus::OwedToMe);
}

#[test]
fn overall_stats_nets_two_people() {
    let state = LedgerState {
        persons: vec![person("p1", "Hamza"), person("p2", "Zoya")],
        transactions: vec![
            transaction("t1", "p1", TransactionType::Borrowed, 500.0),
            transaction("t2", "p2", TransactionType::Given, 300.0),
        ],
        ..LedgerState::default()
    };

    assert_eq!(balance_for(&state, "p1").final_balance, 500.0);
    assert_eq!(balance_for(&state, "p2").final_balance, -300.0);

    let stats = overall_stats(&state);
    assert_eq!(stats.overall_balance, 200.0);
    assert_eq!(stats.total_borrowed, 500.0);
    assert_eq!(stats.total_given, 300.0);
    assert_eq!(stats.total_adjustments, 0.0);
    assert_eq!(stats.status(), BalanceStatus::IOwe);
}

#[test]
fn overall_balance_equals_sum_of_person_balances() {
    let state = LedgerState {
        persons: vec![person("p1", "Hamza"), person("p2", "Zoya"), person("p3", "Omar")],
        transactions: vec![
            transaction("t1", "p1", TransactionType::Borrowed, 800.0),
            transaction("t2", "p2", TransactionType::Given, 150.0),
            transaction("t3", "p3", TransactionType::Returned, 40.0),
            transaction("t4", "p1", TransactionType::Returned, 100.0),
        ],
        item_adjustments: vec![
            adjustment("a1", "p2", ItemAdjustmentType::GivenToMe, 75.0),
            adjustment("a2", "p3", ItemAdjustmentType::GivenByMe, 60.0),
        ],
        ..LedgerState::default()
    };

    let per_person: f64 = state
        .persons
        .iter()
        .map(|person| balance_for(&state, &person.id).final_balance)
        .sum();
    let stats = overall_stats(&state);
    assert_eq!(stats.overall_balance, per_person);
    assert_eq!(stats.total_adjustments, 135.0);
}

#[test]
fn balance_is_deterministic() {
    let state = LedgerState {
        transactions: vec![transaction("t1", "p1", TransactionType::Borrowed, 12.5)],
        ..LedgerState::default()
    };

    assert_eq!(balance_for(&state, "p1"), balance_for(&state, "p1"));
    assert_eq!(balance_for(&state, "missing"), PersonBalance::default());
}
