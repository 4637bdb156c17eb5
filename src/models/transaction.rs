use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TxType {
    /// Mobile-money top-up (credited only once approved).
    Topup,
    TransferIn,
    TransferOut,
    /// Single-use voucher credit.
    Voucher,
    Trade,
    ListingFee,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
}

/// One row of the append-only ledger. `balance_after` is the account's balance
/// at commit time and is never rewritten; only `status` may move, once, from
/// pending to a terminal state.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct WalletTransaction {
    pub id: String,
    pub account_id: String,
    pub tx_type: TxType,
    pub amount: i64,
    pub fee: i64,
    pub balance_after: Option<i64>,
    pub status: TxStatus,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub related_user_id: Option<String>,
    pub related_listing_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WalletTransactionResponse {
    pub id: String,
    pub tx_type: TxType,
    /// Amount moved, NAD cents, always positive; direction comes from `tx_type`.
    pub amount: i64,
    pub fee: i64,
    pub balance_after: Option<i64>,
    pub status: TxStatus,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub related_user_id: Option<String>,
    pub related_listing_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<WalletTransaction> for WalletTransactionResponse {
    fn from(t: WalletTransaction) -> Self {
        Self {
            id: t.id,
            tx_type: t.tx_type,
            amount: t.amount,
            fee: t.fee,
            balance_after: t.balance_after,
            status: t.status,
            description: t.description,
            reference: t.reference,
            related_user_id: t.related_user_id,
            related_listing_id: t.related_listing_id,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
