use sea_orm::{
    ActiveValue, DatabaseTransaction, JoinType, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Fine, FineStatus, MoneyCents, PaymentReceipt, ResultEngine, allocate_payment,
    borrow_transactions, fines,
};

use super::{Engine, with_tx};

impl Engine {
    /// Fines attached to any loan of `email`, in payment order (oldest loan
    /// first, then insertion order within a loan).
    async fn member_fines(
        &self,
        db: &DatabaseTransaction,
        email: &str,
        unpaid_only: bool,
    ) -> ResultEngine<Vec<Fine>> {
        let mut query = fines::Entity::find()
            .join(JoinType::InnerJoin, fines::Relation::BorrowTransactions.def())
            .filter(borrow_transactions::Column::Email.eq(email));
        if unpaid_only {
            query = query.filter(fines::Column::Status.ne(FineStatus::Paid.as_str()));
        }
        let rows = query
            .order_by_asc(fines::Column::BorrowId)
            .order_by_asc(fines::Column::Id)
            .all(db)
            .await?;
        rows.into_iter().map(Fine::try_from).collect()
    }

    /// Total still owed by a member across all their loans, past and present.
    ///
    /// Returns zero when the member has no fines.
    pub async fn outstanding_fines(&self, email: &str) -> ResultEngine<MoneyCents> {
        let email = email.trim();
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            let fines = self.member_fines(&db_tx, email, false).await?;
            Ok(fines.iter().map(|f| f.amount).sum())
        })
    }

    /// Fines not yet fully paid, in the order a payment is applied to them.
    pub async fn unpaid_fines(&self, email: &str) -> ResultEngine<Vec<Fine>> {
        let email = email.trim();
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            self.member_fines(&db_tx, email, true).await
        })
    }

    /// Pay `amount` towards the member's unpaid fines.
    ///
    /// The payment is applied greedily in [`Engine::unpaid_fines`] order (see
    /// [`allocate_payment`]). Fails with [`EngineError::InvalidAmount`] for a
    /// non-positive amount and [`EngineError::Overpayment`] when the amount
    /// exceeds what is owed; nothing is written in either case.
    pub async fn pay_fines(&self, email: &str, amount: MoneyCents) -> ResultEngine<PaymentReceipt> {
        let email = email.trim();
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }

        let receipt = with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            let open = self.member_fines(&db_tx, email, true).await?;
            let updates = allocate_payment(&open, amount)?;

            for update in &updates {
                let model = fines::ActiveModel {
                    id: ActiveValue::Set(update.fine_id),
                    amount_minor: ActiveValue::Set(update.amount.cents()),
                    status: ActiveValue::Set(update.status.as_str().to_string()),
                    ..Default::default()
                };
                model.update(&db_tx).await?;
            }

            let remaining: MoneyCents = self
                .member_fines(&db_tx, email, false)
                .await?
                .iter()
                .map(|f| f.amount)
                .sum();

            Ok::<_, EngineError>(PaymentReceipt {
                paid: amount,
                remaining,
                updates,
            })
        })?;

        tracing::debug!(
            email,
            paid = %receipt.paid,
            remaining = %receipt.remaining,
            "fines paid"
        );
        Ok(receipt)
    }

    /// Record a new unpaid fine against a loan.
    ///
    /// This is the entry point for the accrual process; the engine itself
    /// never decides when a fine is due.
    pub async fn record_fine(&self, borrow_id: i32, amount: MoneyCents) -> ResultEngine<Fine> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "fine amount must be greater than zero".to_string(),
            ));
        }
        let fine = with_tx!(self, |db_tx| {
            self.require_borrow_transaction(&db_tx, borrow_id).await?;
            let model = fines::ActiveModel {
                id: ActiveValue::NotSet,
                borrow_id: ActiveValue::Set(borrow_id),
                amount_minor: ActiveValue::Set(amount.cents()),
                status: ActiveValue::Set(FineStatus::Unpaid.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;
            Fine::try_from(model)
        })?;

        tracing::debug!(borrow_id, fine_id = fine.id, amount = %amount, "fine recorded");
        Ok(fine)
    }
}
