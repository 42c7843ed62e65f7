//! Library events and the audiences they target.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Audience an event is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    AllAges,
    Children,
    TeensAndAdults,
    Adults,
    Volunteers,
    ChildrenAndFamilies,
}

impl Audience {
    pub const ALL: [Audience; 6] = [
        Audience::AllAges,
        Audience::Children,
        Audience::TeensAndAdults,
        Audience::Adults,
        Audience::Volunteers,
        Audience::ChildrenAndFamilies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllAges => "All Ages",
            Self::Children => "Children",
            Self::TeensAndAdults => "Teens and Adults",
            Self::Adults => "Adults",
            Self::Volunteers => "Volunteers",
            Self::ChildrenAndFamilies => "Children and Families",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Audience {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown audience: {needle}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub audience: Audience,
    /// Room assigned through `located`, if any.
    pub room: Option<i32>,
}

impl Event {
    /// An event is still open for registration on its own day.
    pub fn has_passed(&self, today: NaiveDate) -> bool {
        self.scheduled_date < today
    }
}

/// All events, split around a reference day.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventCalendar {
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub scheduled_date: Date,
    pub scheduled_time: Time,
    pub target_audience: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::located::Entity")]
    Located,
    #[sea_orm(has_many = "super::attends::Entity")]
    Attends,
}

impl Related<super::located::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Located.def()
    }
}

impl Related<super::attends::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attends.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, Option<i32>)> for Event {
    type Error = EngineError;

    fn try_from((model, room): (Model, Option<i32>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            audience: Audience::try_from(model.target_audience.as_str())?,
            name: model.name,
            scheduled_date: model.scheduled_date,
            scheduled_time: model.scheduled_time,
            room,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_round_trips_through_labels() {
        for audience in Audience::ALL {
            assert_eq!(Audience::try_from(audience.as_str()).unwrap(), audience);
        }
        assert_eq!(
            Audience::try_from("teens and adults").unwrap(),
            Audience::TeensAndAdults
        );
        assert!(Audience::try_from("Seniors").is_err());
    }

    #[test]
    fn event_is_open_on_its_own_day() {
        let day = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let event = Event {
            id: 1,
            name: "Story time".to_string(),
            scheduled_date: day,
            scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            audience: Audience::Children,
            room: None,
        };
        assert!(!event.has_passed(day));
        assert!(event.has_passed(day.succ_opt().unwrap()));
    }
}
