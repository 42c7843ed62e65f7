use chrono::NaiveDate;
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    EngineError, Position, ResultEngine, StaffMember, staff, volunteers,
};

use super::{Engine, with_tx};

impl Engine {
    async fn is_volunteer(&self, db: &DatabaseTransaction, email: &str) -> ResultEngine<bool> {
        Ok(volunteers::Entity::find_by_id(email.to_string())
            .one(db)
            .await?
            .is_some())
    }

    async fn is_staff(&self, db: &DatabaseTransaction, email: &str) -> ResultEngine<bool> {
        Ok(staff::Entity::find_by_id(email.to_string())
            .one(db)
            .await?
            .is_some())
    }

    /// Sign a member up as a volunteer starting `today`.
    ///
    /// Staff members cannot volunteer.
    pub async fn volunteer(&self, email: &str, today: NaiveDate) -> ResultEngine<NaiveDate> {
        let email = email.trim();
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            if self.is_volunteer(&db_tx, email).await? {
                return Err(EngineError::AlreadyVolunteer(email.to_string()));
            }
            if self.is_staff(&db_tx, email).await? {
                return Err(EngineError::AlreadyStaff(email.to_string()));
            }

            volunteers::ActiveModel {
                email: ActiveValue::Set(email.to_string()),
                employment_date: ActiveValue::Set(today),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(email, "volunteer registered");
            Ok(today)
        })
    }

    /// Hire a member into one of the fixed [`Position`]s.
    ///
    /// Volunteers cannot be hired.
    pub async fn apply_staff(
        &self,
        email: &str,
        start_date: NaiveDate,
        position: Position,
    ) -> ResultEngine<StaffMember> {
        let email = email.trim();
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, email).await?;
            if self.is_staff(&db_tx, email).await? {
                return Err(EngineError::AlreadyStaff(email.to_string()));
            }
            if self.is_volunteer(&db_tx, email).await? {
                return Err(EngineError::AlreadyVolunteer(email.to_string()));
            }

            let model = staff::ActiveModel {
                email: ActiveValue::Set(email.to_string()),
                employment_date: ActiveValue::Set(start_date),
                position: ActiveValue::Set(position.as_str().to_string()),
                wage: ActiveValue::Set(position.yearly_wage()),
                employment_status: ActiveValue::Set(staff::WORKING.to_string()),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(email, position = position.as_str(), "staff hired");
            StaffMember::try_from(model)
        })
    }
}
