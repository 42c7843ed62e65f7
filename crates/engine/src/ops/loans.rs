use chrono::{Days, NaiveDate};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    BorrowTransaction, EngineError, ItemStatus, LoanStatus, ResultEngine, borrow_transactions,
    borrows, items,
};

use super::{Engine, with_tx};

/// What the member gets back when borrowing an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorrowReceipt {
    pub borrow_id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub borrow_date: NaiveDate,
    pub return_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub borrow_id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub returned_on: NaiveDate,
}

/// An item a member currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveLoan {
    pub borrow_id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl Engine {
    /// Lend `item_id` to the member registered with `email`.
    ///
    /// In one DB transaction:
    /// - creates the `borrow_transactions` history row (`Open`, due date as
    ///   return date)
    /// - creates the `borrows` link pointing at it
    /// - marks the item `Unavailable`
    pub async fn borrow_item(
        &self,
        email: &str,
        item_id: i32,
        today: NaiveDate,
    ) -> ResultEngine<BorrowReceipt> {
        let email = email.trim();
        let due_date = today
            .checked_add_days(Days::new(u64::from(self.loan_days)))
            .ok_or_else(|| EngineError::InvalidInput("due date out of range".to_string()))?;

        let receipt = with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            let item = self.require_item(&db_tx, item_id).await?;
            if ItemStatus::try_from(item.status.as_str())? != ItemStatus::Available {
                return Err(EngineError::ItemUnavailable(item_id));
            }

            let history = borrow_transactions::ActiveModel {
                id: ActiveValue::NotSet,
                email: ActiveValue::Set(email.to_string()),
                item_id: ActiveValue::Set(item_id),
                borrow_date: ActiveValue::Set(today),
                return_date: ActiveValue::Set(due_date),
                status: ActiveValue::Set(LoanStatus::Open.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;

            borrows::ActiveModel {
                email: ActiveValue::Set(email.to_string()),
                item_id: ActiveValue::Set(item_id),
                borrow_id: ActiveValue::Set(history.id),
            }
            .insert(&db_tx)
            .await?;

            let item_model = items::ActiveModel {
                id: ActiveValue::Set(item_id),
                status: ActiveValue::Set(ItemStatus::Unavailable.as_str().to_string()),
                ..Default::default()
            };
            item_model.update(&db_tx).await?;

            Ok::<_, EngineError>(BorrowReceipt {
                borrow_id: history.id,
                item_id,
                item_name: item.name,
                borrow_date: today,
                return_date: due_date,
            })
        })?;

        tracing::debug!(
            email,
            item_id,
            borrow_id = receipt.borrow_id,
            "item borrowed"
        );
        Ok(receipt)
    }

    /// Close the member's open loan on `item_id`.
    ///
    /// In one DB transaction:
    /// - marks the item `Available`
    /// - closes the history row (`Returned`, return date = `today`)
    /// - deletes the `borrows` link
    pub async fn return_item(
        &self,
        email: &str,
        item_id: i32,
        today: NaiveDate,
    ) -> ResultEngine<ReturnReceipt> {
        let email = email.trim();

        let receipt = with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            let link = borrows::Entity::find_by_id((email.to_string(), item_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NoActiveLoan {
                    email: email.to_string(),
                    item_id,
                })?;
            let item = self.require_item(&db_tx, item_id).await?;

            let item_model = items::ActiveModel {
                id: ActiveValue::Set(item_id),
                status: ActiveValue::Set(ItemStatus::Available.as_str().to_string()),
                ..Default::default()
            };
            item_model.update(&db_tx).await?;

            let history = borrow_transactions::ActiveModel {
                id: ActiveValue::Set(link.borrow_id),
                status: ActiveValue::Set(LoanStatus::Returned.as_str().to_string()),
                return_date: ActiveValue::Set(today),
                ..Default::default()
            };
            history.update(&db_tx).await?;

            borrows::Entity::delete_by_id((email.to_string(), item_id))
                .exec(&db_tx)
                .await?;

            Ok::<_, EngineError>(ReturnReceipt {
                borrow_id: link.borrow_id,
                item_id,
                item_name: item.name,
                returned_on: today,
            })
        })?;

        tracing::debug!(
            email,
            item_id,
            borrow_id = receipt.borrow_id,
            "item returned"
        );
        Ok(receipt)
    }

    /// Items the member currently holds, oldest loan first.
    pub async fn borrowed_items(&self, email: &str) -> ResultEngine<Vec<ActiveLoan>> {
        let email = email.trim();
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;

            let links = borrows::Entity::find()
                .filter(borrows::Column::Email.eq(email))
                .find_also_related(items::Entity)
                .order_by_asc(borrows::Column::BorrowId)
                .all(&db_tx)
                .await?;

            let mut loans = Vec::with_capacity(links.len());
            for (link, item) in links {
                let item = item.ok_or(EngineError::ItemNotFound(link.item_id))?;
                let history = self
                    .require_borrow_transaction(&db_tx, link.borrow_id)
                    .await?;
                loans.push(ActiveLoan {
                    borrow_id: link.borrow_id,
                    item_id: link.item_id,
                    item_name: item.name,
                    borrow_date: history.borrow_date,
                    due_date: history.return_date,
                });
            }
            Ok(loans)
        })
    }

    /// Full loan history of a member (open and returned), oldest first.
    pub async fn loan_history(&self, email: &str) -> ResultEngine<Vec<BorrowTransaction>> {
        let email = email.trim();
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            let rows = borrow_transactions::Entity::find()
                .filter(borrow_transactions::Column::Email.eq(email))
                .order_by_asc(borrow_transactions::Column::Id)
                .all(&db_tx)
                .await?;
            rows.into_iter().map(BorrowTransaction::try_from).collect()
        })
    }
}
