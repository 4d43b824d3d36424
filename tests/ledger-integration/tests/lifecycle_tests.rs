//! Cumulative lifecycle tests.
//!
//! All steps run sequentially against a single ledger. Each step assumes
//! every previous step succeeded; if any step panics the entire run
//! stops immediately, mirroring how a dashboard session walks one product
//! through the supply chain.

use chrono::Utc;
use provenance_common::product::{LifecycleStage, ProductId};
use provenance_ledger::{Ledger, LedgerError};
use provenance_ledger_integration::account_from_seed;

#[test]
fn cumulative_lifecycle() {
    let admin = account_from_seed(1);
    let customer = account_from_seed(2);
    let latecomer = account_from_seed(3);
    let carrier = account_from_seed(4);

    let mut ledger = Ledger::new(admin);
    let now = Utc::now();

    // ═══════════════════════════════════════════════════════════════════
    // Step 1: admin registers a product
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 1: add_product assigns id 1 with creation defaults ──");
    let id = ledger.add_product(admin, "Widget", 100, 10, now).unwrap();
    assert_eq!(id, ProductId(1));
    assert_eq!(ledger.product_count(), 1);

    let basic = ledger.get_product_basic_details(id).unwrap();
    assert_eq!(basic.stock, 10);
    assert_eq!(basic.owner, admin);
    assert_eq!(basic.status, "Created");

    let delivery = ledger.get_product_delivery_details(id).unwrap();
    assert!(delivery.final_customer.is_zero());
    assert!(!delivery.is_delivered);
    println!("   PASSED");

    // ═══════════════════════════════════════════════════════════════════
    // Step 2: custody moves to a carrier before any sale
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 2: transfer_product reassigns custody, old owner locked out ──");
    ledger.transfer_product(admin, id, carrier, now).unwrap();
    assert_eq!(ledger.product(id).unwrap().owner, carrier);

    // The original owner can no longer touch custodian fields.
    assert!(matches!(
        ledger.update_location(admin, id, "Backdoor", now),
        Err(LedgerError::Unauthorized(_))
    ));
    ledger.update_location(carrier, id, "Distribution hub", now).unwrap();
    assert_eq!(ledger.product(id).unwrap().location, "Distribution hub");
    println!("   PASSED");

    // ═══════════════════════════════════════════════════════════════════
    // Step 3: a final customer purchases two units
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 3: purchase_product settles stock, customer, and payout ──");
    ledger.purchase_product(customer, id, 2, 200, now).unwrap();

    let product = ledger.product(id).unwrap();
    assert_eq!(product.stock, 8);
    assert_eq!(product.final_customer, customer);
    assert_eq!(product.status, "Purchased");
    assert_eq!(product.stage(), LifecycleStage::Purchased);
    // Payment lands with the custodian at the time of sale.
    assert_eq!(ledger.balance_of(carrier), 200);
    assert_eq!(ledger.balance_of(admin), 0);
    println!("   PASSED");

    // ═══════════════════════════════════════════════════════════════════
    // Step 4: the product is claimed; nobody else can buy it
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 4: second purchase fails InvalidState despite stock ──");
    let err = ledger.purchase_product(latecomer, id, 1, 100, now).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidState(_)));
    assert_eq!(ledger.product(id).unwrap().final_customer, customer);
    assert_eq!(ledger.product(id).unwrap().stock, 8);
    println!("   PASSED");

    // ═══════════════════════════════════════════════════════════════════
    // Step 5: delivery confirmation, once
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 5: mark_delivered is terminal ──");
    ledger.mark_delivered(customer, id, now).unwrap();
    let product = ledger.product(id).unwrap();
    assert!(product.is_delivered);
    assert_eq!(product.status, "Delivered");
    assert_eq!(product.stage(), LifecycleStage::Delivered);

    // Chosen convention: repeating the confirmation is InvalidState.
    assert!(matches!(
        ledger.mark_delivered(customer, id, now),
        Err(LedgerError::InvalidState(_))
    ));
    println!("   PASSED");

    // ═══════════════════════════════════════════════════════════════════
    // Step 6: sold products are permanent, unsold ones are not
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 6: remove_product gated on the unsold state ──");
    assert!(matches!(
        ledger.remove_product(carrier, id, now),
        Err(LedgerError::InvalidState(_))
    ));

    let second = ledger.add_product(admin, "Gadget", 50, 3, now).unwrap();
    assert_eq!(second, ProductId(2));
    ledger.remove_product(admin, second, now).unwrap();
    assert_eq!(
        ledger.product(second).unwrap_err(),
        LedgerError::NotFound(second)
    );
    // Removal does not reclaim the id or erase the trail.
    assert_eq!(ledger.product_count(), 2);
    assert_eq!(ledger.get_history(second).unwrap().len(), 2);
    println!("   PASSED");

    // ═══════════════════════════════════════════════════════════════════
    // Step 7: the audit trail matches the call order exactly
    // ═══════════════════════════════════════════════════════════════════
    println!("── Step 7: history is append-only and in call order ──");
    let descriptions: Vec<String> = ledger
        .get_history(id)
        .unwrap()
        .iter()
        .map(|e| e.description.clone())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Product Created".to_string(),
            format!("Ownership transferred to {carrier}"),
            "Location updated to Distribution hub".to_string(),
            format!("Product Purchased by {customer}"),
            "Delivered".to_string(),
        ]
    );
    println!("   PASSED");
}
