//! Lookups shared by the operations: each `require_*` turns a missing row
//! into the matching not-found error.

use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, borrow_transactions, events, items, located, members};

use super::Engine;

impl Engine {
    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        email: &str,
    ) -> ResultEngine<members::Model> {
        members::Entity::find_by_id(email.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::MemberNotFound(email.to_string()))
    }

    pub(super) async fn require_item(
        &self,
        db: &DatabaseTransaction,
        item_id: i32,
    ) -> ResultEngine<items::Model> {
        items::Entity::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or(EngineError::ItemNotFound(item_id))
    }

    pub(super) async fn require_borrow_transaction(
        &self,
        db: &DatabaseTransaction,
        borrow_id: i32,
    ) -> ResultEngine<borrow_transactions::Model> {
        borrow_transactions::Entity::find_by_id(borrow_id)
            .one(db)
            .await?
            .ok_or(EngineError::BorrowNotFound(borrow_id))
    }

    /// Loads an event together with its room assignment.
    pub(super) async fn require_event(
        &self,
        db: &DatabaseTransaction,
        event_id: i32,
    ) -> ResultEngine<(events::Model, Option<i32>)> {
        let (event, room) = events::Entity::find_by_id(event_id)
            .find_also_related(located::Entity)
            .one(db)
            .await?
            .ok_or(EngineError::EventNotFound(event_id))?;
        Ok((event, room.map(|r| r.room_num)))
    }
}
