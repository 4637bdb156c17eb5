pub mod code_generator;
pub mod phone;

pub use code_generator::{generate_voucher_code, normalize_voucher_code};
pub use phone::*;
