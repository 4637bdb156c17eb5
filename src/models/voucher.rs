use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Voucher {
    pub code: String,
    pub amount: i64,
    pub redeemed: bool,
    pub redeemed_by: Option<String>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemVoucherRequest {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemVoucherResponse {
    /// Credited amount in NAD cents.
    pub amount: i64,
    pub new_balance: i64,
    pub transaction_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueVouchersRequest {
    /// Face value of each voucher, NAD cents.
    pub amount: i64,
    /// How many codes to issue (1..=100), defaults to one.
    pub count: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoucherResponse {
    pub code: String,
    pub amount: i64,
    pub redeemed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Voucher> for VoucherResponse {
    fn from(v: Voucher) -> Self {
        Self {
            code: v.code,
            amount: v.amount,
            redeemed: v.redeemed,
            created_at: v.created_at,
        }
    }
}
