pub mod account;
pub mod common;
pub mod pagination;
pub mod topup;
pub mod transaction;
pub mod transfer;
pub mod voucher;

pub use account::*;
pub use common::*;
pub use pagination::*;
pub use topup::*;
pub use transaction::*;
pub use transfer::*;
pub use voucher::*;
