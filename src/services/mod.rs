pub mod ledger;
pub mod topup_service;
pub mod transfer_service;
pub mod voucher_service;
pub mod wallet_service;

pub use topup_service::*;
pub use transfer_service::*;
pub use voucher_service::*;
pub use wallet_service::*;
