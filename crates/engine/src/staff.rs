//! Staff employment records.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

pub const WORKING: &str = "Working";

/// Positions open to applicants, with their yearly wage in whole dollars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Librarian,
    AssistantLibrarian,
    Security,
    Cleaner,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Librarian,
        Position::AssistantLibrarian,
        Position::Security,
        Position::Cleaner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Librarian => "Librarian",
            Self::AssistantLibrarian => "Assistant Librarian",
            Self::Security => "Security",
            Self::Cleaner => "Cleaner",
        }
    }

    pub fn yearly_wage(self) -> i64 {
        match self {
            Self::Librarian => 20_000,
            Self::AssistantLibrarian => 15_000,
            Self::Security => 25_000,
            Self::Cleaner => 18_000,
        }
    }
}

impl TryFrom<&str> for Position {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown position: {needle}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub email: String,
    pub employment_date: NaiveDate,
    pub position: Position,
    pub wage: i64,
    pub employment_status: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub employment_date: Date,
    pub position: String,
    pub wage: i64,
    pub employment_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for StaffMember {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            position: Position::try_from(model.position.as_str())?,
            email: model.email,
            employment_date: model.employment_date,
            wage: model.wage,
            employment_status: model.employment_status,
        })
    }
}
