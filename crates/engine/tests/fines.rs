mod common;

use common::{ALICE, BOB, count, day, donate, engine_with_db};
use engine::{EngineError, FineStatus, MoneyCents};

/// Alice borrows two items and gets a fine on each loan, $5 then $8.
async fn alice_with_two_fines(engine: &engine::Engine) -> (i32, i32) {
    let first = donate(engine, "Dune").await;
    let second = donate(engine, "Dune Messiah").await;
    let loan_a = engine
        .borrow_item(ALICE, first.id, day(2026, 1, 5))
        .await
        .unwrap();
    let loan_b = engine
        .borrow_item(ALICE, second.id, day(2026, 1, 6))
        .await
        .unwrap();
    let fine_a = engine
        .record_fine(loan_a.borrow_id, MoneyCents::new(500))
        .await
        .unwrap();
    let fine_b = engine
        .record_fine(loan_b.borrow_id, MoneyCents::new(800))
        .await
        .unwrap();
    (fine_a.id, fine_b.id)
}

#[tokio::test]
async fn member_without_fines_owes_nothing() {
    let (engine, _db) = engine_with_db().await;
    assert_eq!(
        engine.outstanding_fines(ALICE).await.unwrap(),
        MoneyCents::ZERO
    );
    assert!(engine.unpaid_fines(ALICE).await.unwrap().is_empty());
}

#[tokio::test]
async fn outstanding_fines_sum_all_loans() {
    let (engine, _db) = engine_with_db().await;
    alice_with_two_fines(&engine).await;

    assert_eq!(
        engine.outstanding_fines(ALICE).await.unwrap(),
        MoneyCents::new(1300)
    );
    assert_eq!(
        engine.outstanding_fines(BOB).await.unwrap(),
        MoneyCents::ZERO
    );
}

#[tokio::test]
async fn fines_of_returned_loans_still_count() {
    let (engine, _db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;
    let loan = engine
        .borrow_item(ALICE, item.id, day(2026, 1, 5))
        .await
        .unwrap();
    engine
        .return_item(ALICE, item.id, day(2026, 2, 20))
        .await
        .unwrap();
    engine
        .record_fine(loan.borrow_id, MoneyCents::new(250))
        .await
        .unwrap();

    assert_eq!(
        engine.outstanding_fines(ALICE).await.unwrap(),
        MoneyCents::new(250)
    );
}

#[tokio::test]
async fn partial_payment_follows_fine_order() {
    let (engine, _db) = engine_with_db().await;
    let (first, second) = alice_with_two_fines(&engine).await;

    let receipt = engine
        .pay_fines(ALICE, MoneyCents::new(1000))
        .await
        .unwrap();
    assert_eq!(receipt.remaining, MoneyCents::new(300));
    assert!(!receipt.fully_paid());

    let open = engine.unpaid_fines(ALICE).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, second);
    assert_eq!(open[0].amount, MoneyCents::new(300));
    assert_eq!(open[0].status, FineStatus::Unpaid);
    assert!(open.iter().all(|f| f.id != first));
}

#[tokio::test]
async fn small_payment_only_reduces_first_fine() {
    let (engine, _db) = engine_with_db().await;
    let (first, second) = alice_with_two_fines(&engine).await;

    engine
        .pay_fines(ALICE, MoneyCents::new(200))
        .await
        .unwrap();

    let open = engine.unpaid_fines(ALICE).await.unwrap();
    assert_eq!(open.len(), 2);
    assert_eq!((open[0].id, open[0].amount), (first, MoneyCents::new(300)));
    assert_eq!((open[1].id, open[1].amount), (second, MoneyCents::new(800)));
}

#[tokio::test]
async fn exact_payment_clears_everything() {
    let (engine, db) = engine_with_db().await;
    alice_with_two_fines(&engine).await;

    let receipt = engine
        .pay_fines(ALICE, MoneyCents::new(1300))
        .await
        .unwrap();
    assert!(receipt.fully_paid());
    assert_eq!(
        engine.outstanding_fines(ALICE).await.unwrap(),
        MoneyCents::ZERO
    );
    assert!(engine.unpaid_fines(ALICE).await.unwrap().is_empty());
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) AS n FROM fines WHERE status = 'Paid' AND amount_minor = 0"
        )
        .await,
        2
    );
}

#[tokio::test]
async fn invalid_payments_leave_fines_untouched() {
    let (engine, _db) = engine_with_db().await;
    alice_with_two_fines(&engine).await;

    let err = engine
        .pay_fines(ALICE, MoneyCents::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .pay_fines(ALICE, MoneyCents::new(1301))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Overpayment {
            paid: "$13.01".to_string(),
            outstanding: "$13.00".to_string(),
        }
    );

    assert_eq!(
        engine.outstanding_fines(ALICE).await.unwrap(),
        MoneyCents::new(1300)
    );
}

#[tokio::test]
async fn balance_never_increases_across_payments() {
    let (engine, _db) = engine_with_db().await;
    alice_with_two_fines(&engine).await;

    let mut previous = engine.outstanding_fines(ALICE).await.unwrap();
    for cents in [150, 350, 1, 499, 300] {
        let receipt = engine
            .pay_fines(ALICE, MoneyCents::new(cents))
            .await
            .unwrap();
        assert!(receipt.remaining < previous);
        assert_eq!(receipt.remaining, previous - MoneyCents::new(cents));
        previous = receipt.remaining;
    }
    assert_eq!(previous, MoneyCents::ZERO);
}

#[tokio::test]
async fn record_fine_requires_existing_loan() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .record_fine(42, MoneyCents::new(100))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::BorrowNotFound(42));
}
