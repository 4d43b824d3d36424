//! Property-style sweeps over sequences of ledger operations.

use chrono::Utc;
use provenance_common::product::ProductId;
use provenance_common::roles::Role;
use provenance_ledger::{Ledger, LedgerError};
use provenance_ledger_integration::{account_from_seed, random_account};

#[test]
fn ids_are_dense_increasing_and_start_at_one() {
    let admin = account_from_seed(1);
    let mut ledger = Ledger::new(admin);
    let now = Utc::now();

    let mut previous = 0u64;
    for i in 0..20 {
        let id = ledger
            .add_product(admin, &format!("Product {i}"), 10 + i as u128, 5, now)
            .unwrap();
        assert_eq!(id.0, previous + 1);
        previous = id.0;

        // Removing every third product must not disturb assignment.
        if i % 3 == 0 {
            ledger.remove_product(admin, id, now).unwrap();
        }
    }
    assert_eq!(ledger.product_count(), 20);
}

#[test]
fn stock_never_goes_negative() {
    let admin = account_from_seed(1);
    let mut ledger = Ledger::new(admin);
    let now = Utc::now();

    let id = ledger.add_product(admin, "Widget", 10, 5, now).unwrap();

    // Over-asking is rejected outright.
    for quantity in [6u32, 50, u32::MAX] {
        let payment = 10u128.saturating_mul(quantity as u128);
        let err = ledger
            .purchase_product(random_account(), id, quantity, payment, now)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert_eq!(ledger.product(id).unwrap().stock, 5);
    }

    // Buying everything lands exactly at zero.
    ledger
        .purchase_product(account_from_seed(2), id, 5, 50, now)
        .unwrap();
    assert_eq!(ledger.product(id).unwrap().stock, 0);
}

#[test]
fn final_customer_is_write_once() {
    let admin = account_from_seed(1);
    let first_buyer = account_from_seed(2);
    let mut ledger = Ledger::new(admin);
    let now = Utc::now();

    let id = ledger.add_product(admin, "Widget", 10, 100, now).unwrap();
    ledger.purchase_product(first_buyer, id, 1, 10, now).unwrap();

    for _ in 0..10 {
        let err = ledger
            .purchase_product(random_account(), id, 1, 10, now)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState(_)));
        assert_eq!(ledger.product(id).unwrap().final_customer, first_buyer);
    }
}

#[test]
fn history_grows_by_one_per_success_and_zero_per_failure() {
    let admin = account_from_seed(1);
    let customer = account_from_seed(2);
    let stranger = account_from_seed(3);
    let mut ledger = Ledger::new(admin);
    let now = Utc::now();

    let id = ledger.add_product(admin, "Widget", 100, 10, now).unwrap();
    assert_eq!(ledger.get_history(id).unwrap().len(), 1); // creation entry

    ledger.update_location(admin, id, "Hub", now).unwrap();
    assert_eq!(ledger.get_history(id).unwrap().len(), 2);

    ledger.update_location(stranger, id, "Hijack", now).unwrap_err();
    assert_eq!(ledger.get_history(id).unwrap().len(), 2);

    ledger.update_product_price(admin, id, 0, now).unwrap_err();
    assert_eq!(ledger.get_history(id).unwrap().len(), 2);

    ledger.update_product_price(admin, id, 120, now).unwrap();
    assert_eq!(ledger.get_history(id).unwrap().len(), 3);

    // Stale payment against the updated price.
    ledger.purchase_product(customer, id, 1, 100, now).unwrap_err();
    assert_eq!(ledger.get_history(id).unwrap().len(), 3);

    ledger.purchase_product(customer, id, 1, 120, now).unwrap();
    assert_eq!(ledger.get_history(id).unwrap().len(), 4);

    ledger.remove_product(admin, id, now).unwrap_err(); // sold
    assert_eq!(ledger.get_history(id).unwrap().len(), 4);

    ledger.mark_delivered(customer, id, now).unwrap();
    assert_eq!(ledger.get_history(id).unwrap().len(), 5);

    ledger.mark_delivered(customer, id, now).unwrap_err(); // terminal
    assert_eq!(ledger.get_history(id).unwrap().len(), 5);
}

#[test]
fn role_gates_hold_across_grants() {
    let admin = account_from_seed(1);
    let operator = account_from_seed(2);
    let mut ledger = Ledger::new(admin);
    let now = Utc::now();

    assert!(matches!(
        ledger.add_product(operator, "Widget", 100, 10, now),
        Err(LedgerError::Unauthorized(_))
    ));
    assert!(matches!(
        ledger.grant_role(operator, Role::Custodian, operator),
        Err(LedgerError::Unauthorized(_))
    ));

    ledger
        .grant_role(admin, Role::Administrator, operator)
        .unwrap();
    assert!(ledger.has_role(Role::Administrator, operator));

    let id = ledger.add_product(operator, "Widget", 100, 10, now).unwrap();
    assert_eq!(id, ProductId(1));
    assert_eq!(ledger.product(id).unwrap().owner, operator);
}
