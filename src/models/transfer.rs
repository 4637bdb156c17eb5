use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Recipient phone number or email address.
    pub recipient: String,
    /// Amount debited from the sender, NAD cents.
    pub amount: i64,
    /// Optional client idempotency key; a retry with the same reference
    /// replays the original result instead of moving money again.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferResponse {
    /// Sender balance after the debit.
    pub new_balance: i64,
    pub amount: i64,
    pub fee: i64,
    /// What actually landed on the recipient side: `amount - fee`.
    pub recipient_credit: i64,
    pub transfer_out_id: String,
    pub transfer_in_id: String,
}
