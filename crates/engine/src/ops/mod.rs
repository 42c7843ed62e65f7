use sea_orm::DatabaseConnection;

mod access;
mod catalog;
mod events;
mod fines;
mod loans;
mod members;
mod staff;

pub use loans::{ActiveLoan, BorrowReceipt, ReturnReceipt};

/// Default loan period, in days, used to compute the return date.
pub const DEFAULT_LOAN_DAYS: u32 = 14;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The transaction is dropped without commit on every early return (`?`),
/// which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Handle to the library database.
///
/// Every public operation opens its own transaction, so each call is applied
/// entirely or not at all.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    loan_days: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Loan period applied by [`Engine::borrow_item`].
    pub fn loan_days(&self) -> u32 {
        self.loan_days
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    loan_days: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            loan_days: DEFAULT_LOAN_DAYS,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the loan period (days between borrow and due date).
    pub fn loan_days(mut self, days: u32) -> EngineBuilder {
        self.loan_days = days;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        if self.loan_days == 0 {
            return Err(crate::EngineError::InvalidInput(
                "loan period must be at least one day".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            loan_days: self.loan_days,
        })
    }
}
