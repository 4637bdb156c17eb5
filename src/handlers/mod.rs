pub mod admin;
pub mod listings;
pub mod wallet;

pub use admin::admin_config;
pub use listings::listings_config;
pub use wallet::wallet_config;
