use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TopUpStatus {
    Pending,
    Approved,
    Rejected,
}

/// A mobile-money payment claim. Money moves only when an administrator
/// approves it; rejection never touches the balance.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct TopUpRequest {
    pub id: String,
    pub account_id: String,
    pub amount: i64,
    pub bank: String,
    pub receipt_url: String,
    pub status: TopUpStatus,
    /// The pending ledger row created at submission.
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitTopUpRequest {
    /// Claimed deposit amount, NAD cents.
    pub amount: i64,
    pub bank: String,
    /// Where the uploaded receipt image lives; the upload itself is out of band.
    pub receipt_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopUpRequestResponse {
    pub id: String,
    pub account_id: String,
    pub amount: i64,
    pub bank: String,
    pub receipt_url: String,
    pub status: TopUpStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<TopUpRequest> for TopUpRequestResponse {
    fn from(r: TopUpRequest) -> Self {
        Self {
            id: r.id,
            account_id: r.account_id,
            amount: r.amount,
            bank: r.bank,
            receipt_url: r.receipt_url,
            status: r.status,
            created_at: r.created_at,
            resolved_at: r.resolved_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopUpResolutionResponse {
    pub id: String,
    pub status: TopUpStatus,
    /// Account balance after approval; absent on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopUpQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
