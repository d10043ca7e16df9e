pub mod account;
pub mod position;

pub use account::{Account, LedgerError};
pub use position::Position;
