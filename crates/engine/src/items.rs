//! The catalog: everything a member can borrow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    Available,
    Unavailable,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
        }
    }
}

impl TryFrom<&str> for ItemStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Older rows were written by hand, so accept any casing.
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(EngineError::InvalidInput(format!(
                "invalid item status: {other}"
            ))),
        }
    }
}

/// Catalog column a search runs against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Author,
    Genre,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub category: String,
    pub genre: String,
    pub status: ItemStatus,
}

impl Item {
    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }
}

/// Result of a catalog search, split the way it is shown to members.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub available: Vec<Item>,
    pub unavailable: Vec<Item>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.unavailable.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub author: String,
    pub category: String,
    pub genre: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Item {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            status: ItemStatus::try_from(model.status.as_str())?,
            name: model.name,
            author: model.author,
            category: model.category,
            genre: model.genre,
        })
    }
}
