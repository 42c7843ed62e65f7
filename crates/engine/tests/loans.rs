mod common;

use common::{ALICE, BOB, count, day, donate, engine_with_db, scalar_text};
use engine::{EngineError, ItemStatus, LoanStatus};
use sea_orm::ConnectionTrait;

#[tokio::test]
async fn borrow_marks_item_unavailable_and_opens_loan() {
    let (engine, db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;
    let today = day(2026, 3, 2);

    let receipt = engine.borrow_item(ALICE, item.id, today).await.unwrap();
    assert_eq!(receipt.item_name, "Dune");
    assert_eq!(receipt.borrow_date, today);
    assert_eq!(receipt.return_date, day(2026, 3, 16));

    let item = engine.item(item.id).await.unwrap();
    assert_eq!(item.status, ItemStatus::Unavailable);

    let n = count(
        &db,
        &format!(
            "SELECT COUNT(*) AS n FROM borrows WHERE email = '{ALICE}' AND item_id = {} AND borrow_id = {}",
            item.id, receipt.borrow_id
        ),
    )
    .await;
    assert_eq!(n, 1);

    let history = engine.loan_history(ALICE).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, receipt.borrow_id);
    assert_eq!(history[0].status, LoanStatus::Open);
}

#[tokio::test]
async fn borrowing_unavailable_item_changes_nothing() {
    let (engine, db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;
    let today = day(2026, 3, 2);
    engine.borrow_item(ALICE, item.id, today).await.unwrap();

    let err = engine.borrow_item(BOB, item.id, today).await.unwrap_err();
    assert_eq!(err, EngineError::ItemUnavailable(item.id));

    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM borrows").await, 1);
    assert_eq!(
        count(&db, "SELECT COUNT(*) AS n FROM borrow_transactions").await,
        1
    );
    assert!(engine.borrowed_items(BOB).await.unwrap().is_empty());
}

#[tokio::test]
async fn borrow_requires_member_and_item() {
    let (engine, db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;
    let today = day(2026, 3, 2);

    let err = engine
        .borrow_item("ghost@x.com", item.id, today)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MemberNotFound("ghost@x.com".to_string()));

    let err = engine.borrow_item(ALICE, 999, today).await.unwrap_err();
    assert_eq!(err, EngineError::ItemNotFound(999));

    assert_eq!(
        count(&db, "SELECT COUNT(*) AS n FROM borrow_transactions").await,
        0
    );
}

#[tokio::test]
async fn borrow_then_return_restores_item() {
    let (engine, db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;

    let borrowed = engine
        .borrow_item(ALICE, item.id, day(2026, 3, 2))
        .await
        .unwrap();
    let returned = engine
        .return_item(ALICE, item.id, day(2026, 3, 9))
        .await
        .unwrap();
    assert_eq!(returned.borrow_id, borrowed.borrow_id);
    assert_eq!(returned.item_name, "Dune");

    assert!(engine.item(item.id).await.unwrap().is_available());
    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM borrows").await, 0);

    let history = engine.loan_history(ALICE).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, LoanStatus::Returned);
    assert_eq!(history[0].return_date, day(2026, 3, 9));
    assert_eq!(
        scalar_text(
            &db,
            &format!(
                "SELECT status AS v FROM borrow_transactions WHERE id = {}",
                borrowed.borrow_id
            ),
        )
        .await,
        "Returned"
    );
}

#[tokio::test]
async fn return_without_loan_fails() {
    let (engine, _db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;
    engine
        .borrow_item(ALICE, item.id, day(2026, 3, 2))
        .await
        .unwrap();

    let err = engine
        .return_item(BOB, item.id, day(2026, 3, 3))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NoActiveLoan {
            email: BOB.to_string(),
            item_id: item.id,
        }
    );
    assert_eq!(
        engine.item(item.id).await.unwrap().status,
        ItemStatus::Unavailable
    );
}

#[tokio::test]
async fn item_can_be_borrowed_again_after_return() {
    let (engine, db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;

    engine
        .borrow_item(ALICE, item.id, day(2026, 3, 2))
        .await
        .unwrap();
    engine
        .return_item(ALICE, item.id, day(2026, 3, 5))
        .await
        .unwrap();
    let second = engine
        .borrow_item(BOB, item.id, day(2026, 3, 6))
        .await
        .unwrap();

    let loans = engine.borrowed_items(BOB).await.unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].borrow_id, second.borrow_id);
    assert_eq!(loans[0].due_date, day(2026, 3, 20));
    assert_eq!(
        count(&db, "SELECT COUNT(*) AS n FROM borrow_transactions").await,
        2
    );
}

#[tokio::test]
async fn unavailable_items_always_have_an_open_loan() {
    let (engine, db) = engine_with_db().await;
    let dune = donate(&engine, "Dune").await;
    let messiah = donate(&engine, "Dune Messiah").await;
    let children = donate(&engine, "Children of Dune").await;

    engine
        .borrow_item(ALICE, dune.id, day(2026, 3, 2))
        .await
        .unwrap();
    engine
        .borrow_item(BOB, messiah.id, day(2026, 3, 2))
        .await
        .unwrap();
    engine
        .return_item(ALICE, dune.id, day(2026, 3, 4))
        .await
        .unwrap();
    engine
        .borrow_item(ALICE, children.id, day(2026, 3, 4))
        .await
        .unwrap();

    let mismatched = count(
        &db,
        "SELECT COUNT(*) AS n FROM items i \
         WHERE (i.status = 'Unavailable') != EXISTS (SELECT 1 FROM borrows b WHERE b.item_id = i.id)",
    )
    .await;
    assert_eq!(mismatched, 0);

    let orphans = count(
        &db,
        "SELECT COUNT(*) AS n FROM borrows b \
         WHERE NOT EXISTS (SELECT 1 FROM borrow_transactions t WHERE t.id = b.borrow_id)",
    )
    .await;
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn custom_loan_period_sets_return_date() {
    let (_, db) = engine_with_db().await;
    let engine = engine::Engine::builder()
        .database(db.clone())
        .loan_days(21)
        .build()
        .await
        .unwrap();
    let item = donate(&engine, "Dune").await;

    let receipt = engine
        .borrow_item(ALICE, item.id, day(2026, 3, 2))
        .await
        .unwrap();
    assert_eq!(receipt.return_date, day(2026, 3, 23));
}

#[tokio::test]
async fn failed_borrow_leaves_no_partial_rows() {
    let (engine, db) = engine_with_db().await;
    let item = donate(&engine, "Dune").await;
    engine
        .borrow_item(ALICE, item.id, day(2026, 3, 2))
        .await
        .unwrap();

    // Status says Available but the link still exists, so the link insert is
    // the write that fails, after the history row was already inserted.
    db.execute_unprepared(&format!(
        "UPDATE items SET status = 'Available' WHERE id = {}",
        item.id
    ))
    .await
    .unwrap();
    let err = engine
        .borrow_item(BOB, item.id, day(2026, 3, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    assert_eq!(
        count(&db, "SELECT COUNT(*) AS n FROM borrow_transactions").await,
        1
    );
    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM borrows").await, 1);
    assert!(engine.borrowed_items(BOB).await.unwrap().is_empty());
    assert!(engine.loan_history(BOB).await.unwrap().is_empty());
}
