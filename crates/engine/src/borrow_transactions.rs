//! Loan history.
//!
//! One row per loan, created when the item is borrowed. `return_date` holds
//! the due date while the loan is open and the actual return date once it is
//! closed.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Open,
    Returned,
}

impl LoanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Returned => "Returned",
        }
    }
}

impl TryFrom<&str> for LoanStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Open" => Ok(Self::Open),
            "Returned" => Ok(Self::Returned),
            other => Err(EngineError::InvalidInput(format!(
                "invalid loan status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowTransaction {
    pub id: i32,
    pub email: String,
    pub item_id: i32,
    pub borrow_date: NaiveDate,
    pub return_date: NaiveDate,
    pub status: LoanStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "borrow_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub item_id: i32,
    pub borrow_date: Date,
    pub return_date: Date,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fines::Entity")]
    Fines,
}

impl Related<super::fines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BorrowTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            status: LoanStatus::try_from(model.status.as_str())?,
            email: model.email,
            item_id: model.item_id,
            borrow_date: model.borrow_date,
            return_date: model.return_date,
        })
    }
}
