//! Library engine: catalog, membership, loans, fines, events and staff,
//! persisted through sea-orm.
//!
//! All state lives in the database; [`Engine`] only holds the connection and
//! runs every multi-step workflow inside a single database transaction.

pub use borrow_transactions::{BorrowTransaction, LoanStatus};
pub use error::{EngineError, ErrorKind};
pub use events::{Audience, Event, EventCalendar};
pub use fines::{Fine, FineStatus, FineUpdate, PaymentReceipt, allocate_payment};
pub use items::{Item, ItemStatus, SearchField, SearchResults};
pub use members::Member;
pub use money::MoneyCents;
pub use ops::{ActiveLoan, BorrowReceipt, DEFAULT_LOAN_DAYS, Engine, EngineBuilder, ReturnReceipt};
pub use staff::{Position, StaffMember};
pub use util::{is_valid_email, normalize_email, parse_date};

mod attends;
mod borrow_transactions;
mod borrows;
mod error;
mod events;
mod fines;
mod items;
mod located;
mod members;
mod money;
mod ops;
mod staff;
mod util;
mod volunteers;

type ResultEngine<T> = Result<T, EngineError>;
