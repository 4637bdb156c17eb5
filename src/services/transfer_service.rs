use crate::config::WalletConfig;
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Account, TransferRequest, TransferResponse, TxType};
use crate::services::ledger::{self, TxMeta};
use crate::utils::normalize_na_phone;
use chrono::Utc;
use sqlx::SqliteConnection;

#[derive(Clone)]
pub struct TransferService {
    pool: DbPool,
    min_transfer_cents: i64,
    fee_percent: i64,
}

impl TransferService {
    pub fn new(pool: DbPool, config: &WalletConfig) -> Self {
        Self {
            pool,
            min_transfer_cents: config.min_transfer_cents,
            fee_percent: config.transfer_fee_percent,
        }
    }

    /// Move credits from `sender_id` to the account matching
    /// `request.recipient`. The sender is debited exactly `amount`; the
    /// recipient receives `amount - fee`. Both ledger legs commit together
    /// or not at all.
    pub async fn transfer(
        &self,
        sender_id: &str,
        request: TransferRequest,
    ) -> AppResult<TransferResponse> {
        if request.amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Transfer amount must be positive".to_string(),
            ));
        }
        if request.amount < self.min_transfer_cents {
            return Err(AppError::InvalidAmount(format!(
                "Minimum transfer is {} cents",
                self.min_transfer_cents
            )));
        }

        // Fee is taken out of the sent amount, not added on top. Integer
        // floor keeps debit == credit + fee exact.
        let recipient_credit = request.amount - request.amount * self.fee_percent / 100;
        let fee = request.amount - recipient_credit;

        let mut tx = self.pool.begin().await?;

        // A retry carrying the same reference replays the original outcome
        // instead of moving money twice.
        if let Some(reference) = request.reference.as_deref() {
            let stored: Option<String> = sqlx::query_scalar(
                "SELECT response FROM idempotency_keys WHERE key = ?1 AND account_id = ?2",
            )
            .bind(reference)
            .bind(sender_id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(stored) = stored {
                let response: TransferResponse = serde_json::from_str(&stored)?;
                log::info!("Replaying transfer {reference} for account {sender_id}");
                return Ok(response);
            }
        }

        let recipient = resolve_recipient(&mut tx, &request.recipient).await?;
        if recipient.id == sender_id {
            return Err(AppError::SelfTransferNotAllowed);
        }

        let out_description = request
            .description
            .clone()
            .unwrap_or_else(|| format!("Transfer to {}", recipient.email));
        let (new_balance, transfer_out_id) = ledger::apply_delta(
            &mut tx,
            sender_id,
            -request.amount,
            TxType::TransferOut,
            TxMeta {
                fee,
                description: Some(&out_description),
                reference: request.reference.as_deref(),
                related_user_id: Some(&recipient.id),
                ..Default::default()
            },
        )
        .await?;

        let in_description = format!("Transfer received from account {sender_id}");
        let (_, transfer_in_id) = ledger::apply_delta(
            &mut tx,
            &recipient.id,
            recipient_credit,
            TxType::TransferIn,
            TxMeta {
                description: Some(&in_description),
                reference: request.reference.as_deref(),
                related_user_id: Some(sender_id),
                ..Default::default()
            },
        )
        .await?;

        let response = TransferResponse {
            new_balance,
            amount: request.amount,
            fee,
            recipient_credit,
            transfer_out_id,
            transfer_in_id,
        };

        if let Some(reference) = request.reference.as_deref() {
            sqlx::query(
                r#"
                INSERT INTO idempotency_keys (key, account_id, operation, response, created_at)
                VALUES (?1, ?2, 'transfer', ?3, ?4)
                "#,
            )
            .bind(reference)
            .bind(sender_id)
            .bind(serde_json::to_string(&response)?)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        log::info!(
            "Transfer of {} cents (fee {}) from {} to {}",
            request.amount,
            fee,
            sender_id,
            recipient.id
        );

        Ok(response)
    }
}

/// Look up exactly one account by phone number or email address. Zero matches
/// is `RecipientNotFound`; more than one is `AmbiguousRecipient` (defensive —
/// both columns are unique).
async fn resolve_recipient(conn: &mut SqliteConnection, identifier: &str) -> AppResult<Account> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::ValidationError(
            "Recipient must not be empty".to_string(),
        ));
    }

    let mut matches: Vec<Account> = if identifier.contains('@') {
        sqlx::query_as(
            "SELECT id, email, phone, balance, created_at FROM accounts WHERE email = ?1",
        )
        .bind(identifier.to_lowercase())
        .fetch_all(&mut *conn)
        .await?
    } else {
        let phone = normalize_na_phone(identifier)?;
        sqlx::query_as(
            "SELECT id, email, phone, balance, created_at FROM accounts WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_all(&mut *conn)
        .await?
    };

    match matches.len() {
        0 => Err(AppError::RecipientNotFound),
        1 => Ok(matches.remove(0)),
        _ => Err(AppError::AmbiguousRecipient),
    }
}
