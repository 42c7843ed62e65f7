//! Initial schema migration for the library database.
//!
//! - `members`: library members keyed by email
//! - `items`: the catalog (books, media, ...)
//! - `borrow_transactions`: loan history, one row per loan
//! - `borrows`: open loans (member ↔ item), deleted on return
//! - `fines`: amounts owed against a loan
//! - `events`, `located`, `attends`: events, room assignments, registrations
//! - `staff`, `volunteers`: employment records

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Members {
    Table,
    Email,
    Name,
    Birthday,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    Name,
    Author,
    Category,
    Genre,
    Status,
}

#[derive(Iden)]
enum BorrowTransactions {
    Table,
    Id,
    Email,
    ItemId,
    BorrowDate,
    ReturnDate,
    Status,
}

#[derive(Iden)]
enum Borrows {
    Table,
    Email,
    ItemId,
    BorrowId,
}

#[derive(Iden)]
enum Fines {
    Table,
    Id,
    BorrowId,
    AmountMinor,
    Status,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    Name,
    ScheduledDate,
    ScheduledTime,
    TargetAudience,
}

#[derive(Iden)]
enum Located {
    Table,
    EventId,
    RoomNum,
}

#[derive(Iden)]
enum Attends {
    Table,
    Email,
    EventId,
}

#[derive(Iden)]
enum Staff {
    Table,
    Email,
    EmploymentDate,
    Position,
    Wage,
    EmploymentStatus,
}

#[derive(Iden)]
enum Volunteers {
    Table,
    Email,
    EmploymentDate,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Birthday).date().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(ColumnDef::new(Items::Author).string().not_null())
                    .col(ColumnDef::new(Items::Category).string().not_null())
                    .col(ColumnDef::new(Items::Genre).string().not_null())
                    .col(
                        ColumnDef::new(Items::Status)
                            .string()
                            .not_null()
                            .default("Available"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Borrow transactions (loan history)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BorrowTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BorrowTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BorrowTransactions::Email).string().not_null())
                    .col(
                        ColumnDef::new(BorrowTransactions::ItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowTransactions::BorrowDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowTransactions::ReturnDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowTransactions::Status)
                            .string()
                            .not_null()
                            .default("Open"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrow_transactions-email")
                            .from(BorrowTransactions::Table, BorrowTransactions::Email)
                            .to(Members::Table, Members::Email),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrow_transactions-item_id")
                            .from(BorrowTransactions::Table, BorrowTransactions::ItemId)
                            .to(Items::Table, Items::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-borrow_transactions-email")
                    .table(BorrowTransactions::Table)
                    .col(BorrowTransactions::Email)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Borrows (open loans)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Borrows::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Borrows::Email).string().not_null())
                    .col(ColumnDef::new(Borrows::ItemId).integer().not_null())
                    .col(ColumnDef::new(Borrows::BorrowId).integer().not_null())
                    .primary_key(Index::create().col(Borrows::Email).col(Borrows::ItemId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrows-email")
                            .from(Borrows::Table, Borrows::Email)
                            .to(Members::Table, Members::Email),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrows-item_id")
                            .from(Borrows::Table, Borrows::ItemId)
                            .to(Items::Table, Items::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrows-borrow_id")
                            .from(Borrows::Table, Borrows::BorrowId)
                            .to(BorrowTransactions::Table, BorrowTransactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One open loan per item.
        manager
            .create_index(
                Index::create()
                    .name("idx-borrows-item_id-unique")
                    .table(Borrows::Table)
                    .col(Borrows::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Fines
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Fines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fines::BorrowId).integer().not_null())
                    .col(ColumnDef::new(Fines::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Fines::Status)
                            .string()
                            .not_null()
                            .default("Unpaid"),
                    )
                    .check(Expr::col(Fines::AmountMinor).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fines-borrow_id")
                            .from(Fines::Table, Fines::BorrowId)
                            .to(BorrowTransactions::Table, BorrowTransactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fines-borrow_id")
                    .table(Fines::Table)
                    .col(Fines::BorrowId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Events, rooms and registrations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::ScheduledDate).date().not_null())
                    .col(ColumnDef::new(Events::ScheduledTime).time().not_null())
                    .col(ColumnDef::new(Events::TargetAudience).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Located::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Located::EventId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Located::RoomNum).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-located-event_id")
                            .from(Located::Table, Located::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attends::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attends::Email).string().not_null())
                    .col(ColumnDef::new(Attends::EventId).integer().not_null())
                    .primary_key(Index::create().col(Attends::Email).col(Attends::EventId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attends-email")
                            .from(Attends::Table, Attends::Email)
                            .to(Members::Table, Members::Email),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attends-event_id")
                            .from(Attends::Table, Attends::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Staff and volunteers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Staff::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Staff::EmploymentDate).date().not_null())
                    .col(ColumnDef::new(Staff::Position).string().not_null())
                    .col(ColumnDef::new(Staff::Wage).big_integer().not_null())
                    .col(ColumnDef::new(Staff::EmploymentStatus).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-staff-email")
                            .from(Staff::Table, Staff::Email)
                            .to(Members::Table, Members::Email),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Volunteers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Volunteers::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Volunteers::EmploymentDate).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-volunteers-email")
                            .from(Volunteers::Table, Volunteers::Email)
                            .to(Members::Table, Members::Email),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order (FK dependencies).
        manager
            .drop_table(Table::drop().table(Volunteers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attends::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Located::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Borrows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BorrowTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        Ok(())
    }
}
