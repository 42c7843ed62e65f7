use chrono::NaiveDate;
use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Member, ResultEngine, members,
    util::{normalize_email, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Return the member registered with `email`.
    pub async fn member(&self, email: &str) -> ResultEngine<Member> {
        let email = email.trim();
        with_tx!(self, |db_tx| {
            let model = self.require_member(&db_tx, email).await?;
            Ok(Member::from(model))
        })
    }

    /// Register a new member.
    ///
    /// Fails with [`EngineError::MemberExists`] when the email is already taken.
    pub async fn register_member(
        &self,
        name: &str,
        birthday: NaiveDate,
        email: &str,
    ) -> ResultEngine<Member> {
        let name = normalize_required_text(name, "name")?;
        let email = normalize_email(email)?;
        let member = Member {
            email,
            name,
            birthday,
        };
        with_tx!(self, |db_tx| {
            let exists = members::Entity::find_by_id(member.email.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::MemberExists(member.email));
            }

            members::ActiveModel::from(&member).insert(&db_tx).await?;
            tracing::debug!(email = %member.email, "member registered");
            Ok(member)
        })
    }

    /// List every member, ordered by email.
    pub async fn members(&self) -> ResultEngine<Vec<Member>> {
        with_tx!(self, |db_tx| {
            let rows = members::Entity::find()
                .order_by_asc(members::Column::Email)
                .all(&db_tx)
                .await?;
            Ok(rows.into_iter().map(Member::from).collect())
        })
    }
}
