//! Fines owed against a loan.
//!
//! Fines are created by the accrual process outside the console workflow and
//! are only ever paid down afterwards: the balance of a fine never grows and
//! never drops below zero.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FineStatus {
    Unpaid,
    Paid,
}

impl FineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }
}

impl TryFrom<&str> for FineStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidInput(format!(
                "invalid fine status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fine {
    pub id: i32,
    pub borrow_id: i32,
    pub amount: MoneyCents,
    pub status: FineStatus,
}

/// New balance of a single fine after a payment has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FineUpdate {
    pub fine_id: i32,
    pub amount: MoneyCents,
    pub status: FineStatus,
}

/// Outcome of a fine payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub paid: MoneyCents,
    pub remaining: MoneyCents,
    pub updates: Vec<FineUpdate>,
}

impl PaymentReceipt {
    pub fn fully_paid(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Spreads `payment` over `open_fines` in the given order.
///
/// Each fine is cleared in full (balance 0, `Paid`) while the payment covers
/// it; the first fine the remainder cannot cover is decremented and stays
/// `Unpaid`, and every fine after it is left untouched. Only the fines whose
/// balance changes appear in the result.
pub fn allocate_payment(
    open_fines: &[Fine],
    payment: MoneyCents,
) -> ResultEngine<Vec<FineUpdate>> {
    if !payment.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    let outstanding: MoneyCents = open_fines.iter().map(|f| f.amount).sum();
    if payment > outstanding {
        return Err(EngineError::Overpayment {
            paid: payment.to_string(),
            outstanding: outstanding.to_string(),
        });
    }

    let mut remaining = payment;
    let mut updates = Vec::new();
    for fine in open_fines {
        if remaining.is_zero() {
            break;
        }
        if remaining >= fine.amount {
            remaining -= fine.amount;
            updates.push(FineUpdate {
                fine_id: fine.id,
                amount: MoneyCents::ZERO,
                status: FineStatus::Paid,
            });
        } else {
            updates.push(FineUpdate {
                fine_id: fine.id,
                amount: fine.amount - remaining,
                status: FineStatus::Unpaid,
            });
            remaining = MoneyCents::ZERO;
        }
    }
    Ok(updates)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub borrow_id: i32,
    pub amount_minor: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::borrow_transactions::Entity",
        from = "Column::BorrowId",
        to = "super::borrow_transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    BorrowTransactions,
}

impl Related<super::borrow_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BorrowTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Fine {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            borrow_id: model.borrow_id,
            amount: MoneyCents::new(model.amount_minor),
            status: FineStatus::try_from(model.status.as_str())?,
        })
    }
}
