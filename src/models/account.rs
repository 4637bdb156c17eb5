use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A wallet account. `balance` is NAD cents and never goes negative.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub phone: Option<String>,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// Current spendable balance in NAD cents.
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub email: String,
    /// Namibian number; accepted with a leading `+264` or `0`.
    pub phone: Option<String>,
    /// Opening balance in NAD cents, defaults to zero.
    #[serde(default)]
    pub opening_balance: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub phone: Option<String>,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            phone: a.phone,
            balance: a.balance,
            created_at: a.created_at,
        }
    }
}
