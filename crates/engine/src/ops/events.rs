use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
    prelude::*,
};

use crate::{
    Audience, EngineError, Event, EventCalendar, ResultEngine, attends, events, located,
    util::normalize_required_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Every event ordered by date and time, split into upcoming (on or
    /// after `today`) and past.
    pub async fn events(&self, today: NaiveDate) -> ResultEngine<EventCalendar> {
        with_tx!(self, |db_tx| {
            let rows = events::Entity::find()
                .find_also_related(located::Entity)
                .order_by_asc(events::Column::ScheduledDate)
                .order_by_asc(events::Column::ScheduledTime)
                .all(&db_tx)
                .await?;

            let mut calendar = EventCalendar::default();
            for (model, room) in rows {
                let event = Event::try_from((model, room.map(|r| r.room_num)))?;
                if event.has_passed(today) {
                    calendar.past.push(event);
                } else {
                    calendar.upcoming.push(event);
                }
            }
            Ok(calendar)
        })
    }

    /// Events aimed at `audience`, ordered by date and time.
    pub async fn events_for_audience(&self, audience: Audience) -> ResultEngine<Vec<Event>> {
        with_tx!(self, |db_tx| {
            let rows = events::Entity::find()
                .filter(events::Column::TargetAudience.eq(audience.as_str()))
                .find_also_related(located::Entity)
                .order_by_asc(events::Column::ScheduledDate)
                .order_by_asc(events::Column::ScheduledTime)
                .all(&db_tx)
                .await?;
            rows.into_iter()
                .map(|(model, room)| Event::try_from((model, room.map(|r| r.room_num))))
                .collect()
        })
    }

    /// A single event with its room assignment.
    pub async fn event_details(&self, event_id: i32) -> ResultEngine<Event> {
        with_tx!(self, |db_tx| {
            let loaded = self.require_event(&db_tx, event_id).await?;
            Event::try_from(loaded)
        })
    }

    /// Register a member for an upcoming event.
    ///
    /// Events scheduled before `today` are closed ([`EngineError::EventPassed`]);
    /// a second registration for the same event is reported as
    /// [`EngineError::AlreadyRegistered`].
    pub async fn register_for_event(
        &self,
        email: &str,
        event_id: i32,
        today: NaiveDate,
    ) -> ResultEngine<Event> {
        let email = email.trim();
        let event = with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            let event = Event::try_from(self.require_event(&db_tx, event_id).await?)?;
            if event.has_passed(today) {
                return Err(EngineError::EventPassed(event.name));
            }

            let already_registered = || EngineError::AlreadyRegistered {
                email: email.to_string(),
                event_id,
            };
            let registration = attends::ActiveModel {
                email: ActiveValue::Set(email.to_string()),
                event_id: ActiveValue::Set(event_id),
            };
            match registration.insert(&db_tx).await {
                Ok(_) => {}
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    return Err(already_registered());
                }
                Err(err) => {
                    // Composite-key violations are not always classified as
                    // unique violations by the driver.
                    let exists = attends::Entity::find_by_id((email.to_string(), event_id))
                        .one(&db_tx)
                        .await?
                        .is_some();
                    if exists {
                        return Err(already_registered());
                    }
                    return Err(err.into());
                }
            }
            Ok::<_, EngineError>(event)
        })?;

        tracing::debug!(email, event_id, "registered for event");
        Ok(event)
    }

    /// Add an event to the calendar (staff only).
    pub async fn schedule_event(
        &self,
        name: &str,
        scheduled_date: NaiveDate,
        scheduled_time: NaiveTime,
        audience: Audience,
    ) -> ResultEngine<Event> {
        let name = normalize_required_text(name, "event name")?;
        with_tx!(self, |db_tx| {
            let model =
                insert_event(&db_tx, name, scheduled_date, scheduled_time, audience).await?;
            Event::try_from((model, None))
        })
    }

    /// Add an event already placed in a room. Event and room are written
    /// together or not at all.
    pub async fn schedule_event_in_room(
        &self,
        name: &str,
        scheduled_date: NaiveDate,
        scheduled_time: NaiveTime,
        audience: Audience,
        room_num: i32,
    ) -> ResultEngine<Event> {
        let name = normalize_required_text(name, "event name")?;
        check_room(room_num)?;
        with_tx!(self, |db_tx| {
            let model =
                insert_event(&db_tx, name, scheduled_date, scheduled_time, audience).await?;
            located::ActiveModel {
                event_id: ActiveValue::Set(model.id),
                room_num: ActiveValue::Set(room_num),
            }
            .insert(&db_tx)
            .await?;
            Event::try_from((model, Some(room_num)))
        })
    }

    /// Assign (or move) an event to a room.
    pub async fn assign_room(&self, event_id: i32, room_num: i32) -> ResultEngine<()> {
        check_room(room_num)?;
        with_tx!(self, |db_tx| {
            let (_, current) = self.require_event(&db_tx, event_id).await?;

            let active = located::ActiveModel {
                event_id: ActiveValue::Set(event_id),
                room_num: ActiveValue::Set(room_num),
            };
            match current {
                Some(_) => {
                    active.update(&db_tx).await?;
                }
                None => {
                    active.insert(&db_tx).await?;
                }
            }
            Ok(())
        })
    }
}

fn check_room(room_num: i32) -> ResultEngine<()> {
    if room_num <= 0 {
        return Err(EngineError::InvalidInput(
            "room number must be positive".to_string(),
        ));
    }
    Ok(())
}

async fn insert_event(
    db: &DatabaseTransaction,
    name: String,
    scheduled_date: NaiveDate,
    scheduled_time: NaiveTime,
    audience: Audience,
) -> ResultEngine<events::Model> {
    let model = events::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name),
        scheduled_date: ActiveValue::Set(scheduled_date),
        scheduled_time: ActiveValue::Set(scheduled_time),
        target_audience: ActiveValue::Set(audience.as_str().to_string()),
    }
    .insert(db)
    .await?;
    tracing::debug!(event_id = model.id, "event scheduled");
    Ok(model)
}
