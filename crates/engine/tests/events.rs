mod common;

use chrono::NaiveTime;
use common::{ALICE, BOB, count, day, engine_with_db};
use engine::{Audience, EngineError};

fn ten_am() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap()
}

#[tokio::test]
async fn registers_for_upcoming_event() {
    let (engine, db) = engine_with_db().await;
    let event = engine
        .schedule_event("Book club", day(2026, 4, 10), ten_am(), Audience::Adults)
        .await
        .unwrap();
    engine.assign_room(event.id, 12).await.unwrap();

    let registered = engine
        .register_for_event(ALICE, event.id, day(2026, 4, 1))
        .await
        .unwrap();
    assert_eq!(registered.name, "Book club");
    assert_eq!(registered.room, Some(12));
    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM attends").await, 1);
}

#[tokio::test]
async fn event_day_itself_is_still_open() {
    let (engine, _db) = engine_with_db().await;
    let event = engine
        .schedule_event("Story time", day(2026, 4, 10), ten_am(), Audience::Children)
        .await
        .unwrap();

    engine
        .register_for_event(ALICE, event.id, day(2026, 4, 10))
        .await
        .unwrap();
}

#[tokio::test]
async fn past_event_always_rejected() {
    let (engine, db) = engine_with_db().await;
    let event = engine
        .schedule_event("Poetry night", day(2026, 2, 1), ten_am(), Audience::AllAges)
        .await
        .unwrap();
    engine.assign_room(event.id, 3).await.unwrap();

    for who in [ALICE, BOB] {
        let err = engine
            .register_for_event(who, event.id, day(2026, 2, 2))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::EventPassed("Poetry night".to_string()));
    }
    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM attends").await, 0);
}

#[tokio::test]
async fn duplicate_registration_is_reported() {
    let (engine, db) = engine_with_db().await;
    let event = engine
        .schedule_event("Book club", day(2026, 4, 10), ten_am(), Audience::Adults)
        .await
        .unwrap();
    let today = day(2026, 4, 1);

    engine
        .register_for_event(ALICE, event.id, today)
        .await
        .unwrap();
    let err = engine
        .register_for_event(ALICE, event.id, today)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::AlreadyRegistered {
            email: ALICE.to_string(),
            event_id: event.id,
        }
    );

    // Another member is not affected.
    engine.register_for_event(BOB, event.id, today).await.unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM attends").await, 2);
}

#[tokio::test]
async fn unknown_event_or_member() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .register_for_event(ALICE, 77, day(2026, 4, 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EventNotFound(77));

    let event = engine
        .schedule_event("Book club", day(2026, 4, 10), ten_am(), Audience::Adults)
        .await
        .unwrap();
    let err = engine
        .register_for_event("ghost@x.com", event.id, day(2026, 4, 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MemberNotFound("ghost@x.com".to_string()));
}

#[tokio::test]
async fn calendar_splits_upcoming_and_past() {
    let (engine, _db) = engine_with_db().await;
    let late = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
    engine
        .schedule_event("Evening talk", day(2026, 4, 10), late, Audience::Adults)
        .await
        .unwrap();
    engine
        .schedule_event("Morning talk", day(2026, 4, 10), ten_am(), Audience::Adults)
        .await
        .unwrap();
    engine
        .schedule_event("Old fair", day(2026, 1, 10), ten_am(), Audience::AllAges)
        .await
        .unwrap();

    let calendar = engine.events(day(2026, 4, 1)).await.unwrap();
    let upcoming: Vec<_> = calendar.upcoming.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(upcoming, vec!["Morning talk", "Evening talk"]);
    assert_eq!(calendar.past.len(), 1);
    assert_eq!(calendar.past[0].name, "Old fair");
    assert_eq!(calendar.past[0].room, None);
}

#[tokio::test]
async fn recommends_by_audience() {
    let (engine, _db) = engine_with_db().await;
    engine
        .schedule_event("Lego club", day(2026, 5, 1), ten_am(), Audience::Children)
        .await
        .unwrap();
    engine
        .schedule_event("Wine & books", day(2026, 5, 2), ten_am(), Audience::Adults)
        .await
        .unwrap();

    let kids = engine
        .events_for_audience(Audience::Children)
        .await
        .unwrap();
    assert_eq!(kids.len(), 1);
    assert_eq!(kids[0].name, "Lego club");
    assert!(
        engine
            .events_for_audience(Audience::Volunteers)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn moving_an_event_to_another_room() {
    let (engine, _db) = engine_with_db().await;
    let event = engine
        .schedule_event("Book club", day(2026, 4, 10), ten_am(), Audience::Adults)
        .await
        .unwrap();
    engine.assign_room(event.id, 1).await.unwrap();
    engine.assign_room(event.id, 4).await.unwrap();

    assert_eq!(engine.event_details(event.id).await.unwrap().room, Some(4));
}

#[tokio::test]
async fn scheduling_into_a_room_is_atomic() {
    let (engine, db) = engine_with_db().await;
    let event = engine
        .schedule_event_in_room(
            "Chess club",
            day(2026, 4, 12),
            ten_am(),
            Audience::TeensAndAdults,
            7,
        )
        .await
        .unwrap();
    assert_eq!(event.room, Some(7));
    assert_eq!(engine.event_details(event.id).await.unwrap().room, Some(7));

    let err = engine
        .schedule_event_in_room(
            "Ghost club",
            day(2026, 4, 13),
            ten_am(),
            Audience::Adults,
            0,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM events").await, 1);
    assert_eq!(count(&db, "SELECT COUNT(*) AS n FROM located").await, 1);
}
