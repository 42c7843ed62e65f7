use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Item, ItemStatus, ResultEngine, SearchField, SearchResults, items,
    util::normalize_required_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return a single catalog item.
    pub async fn item(&self, item_id: i32) -> ResultEngine<Item> {
        with_tx!(self, |db_tx| {
            let model = self.require_item(&db_tx, item_id).await?;
            Item::try_from(model)
        })
    }

    /// Add a donated item to the catalog. New items are always available.
    pub async fn donate_item(
        &self,
        name: &str,
        author: &str,
        category: &str,
        genre: &str,
    ) -> ResultEngine<Item> {
        let name = normalize_required_text(name, "item name")?;
        let author = normalize_required_text(author, "author")?;
        let category = normalize_required_text(category, "category")?;
        let genre = normalize_required_text(genre, "genre")?;

        with_tx!(self, |db_tx| {
            let model = items::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                author: ActiveValue::Set(author),
                category: ActiveValue::Set(category),
                genre: ActiveValue::Set(genre),
                status: ActiveValue::Set(ItemStatus::Available.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(item_id = model.id, "item donated");
            Item::try_from(model)
        })
    }

    /// Substring search (case-insensitive) on one catalog column.
    ///
    /// An empty term matches every item.
    pub async fn search_items(&self, field: SearchField, term: &str) -> ResultEngine<SearchResults> {
        let term = term.trim();
        let column = match field {
            SearchField::Name => items::Column::Name,
            SearchField::Author => items::Column::Author,
            SearchField::Genre => items::Column::Genre,
        };

        with_tx!(self, |db_tx| {
            let rows = items::Entity::find()
                .filter(column.contains(term))
                .order_by_asc(items::Column::Id)
                .all(&db_tx)
                .await?;

            let mut results = SearchResults::default();
            for row in rows {
                let item = Item::try_from(row)?;
                if item.is_available() {
                    results.available.push(item);
                } else {
                    results.unavailable.push(item);
                }
            }
            Ok(results)
        })
    }
}
