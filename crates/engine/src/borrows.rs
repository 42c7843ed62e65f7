//! Open loans: one row per item currently out, deleted on return.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "borrows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: i32,
    pub borrow_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Items,
    #[sea_orm(
        belongs_to = "super::borrow_transactions::Entity",
        from = "Column::BorrowId",
        to = "super::borrow_transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    BorrowTransactions,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::borrow_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BorrowTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
