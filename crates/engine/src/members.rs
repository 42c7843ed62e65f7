//! Library members.
//!
//! Members are keyed by email, created once on registration and never
//! modified or deleted afterwards.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub email: String,
    pub name: String,
    pub birthday: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub name: String,
    pub birthday: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Member> for ActiveModel {
    fn from(member: &Member) -> Self {
        Self {
            email: ActiveValue::Set(member.email.clone()),
            name: ActiveValue::Set(member.name.clone()),
            birthday: ActiveValue::Set(member.birthday),
        }
    }
}

impl From<Model> for Member {
    fn from(model: Model) -> Self {
        Self {
            email: model.email,
            name: model.name,
            birthday: model.birthday,
        }
    }
}
