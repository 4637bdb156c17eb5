//! Balance-store primitives. `adjust_balance` and `apply_delta` are the only
//! code paths that mutate an account balance; every engine (transfer, voucher,
//! top-up approval) is built on top of them. Both take a caller-supplied
//! connection so that several deltas can share one SQL transaction.

use crate::error::{AppError, AppResult};
use crate::models::{TxStatus, TxType};
use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

/// Optional fields for the ledger row appended by [`apply_delta`].
#[derive(Debug, Clone, Copy)]
pub struct TxMeta<'a> {
    pub fee: i64,
    pub status: TxStatus,
    pub description: Option<&'a str>,
    pub reference: Option<&'a str>,
    pub related_user_id: Option<&'a str>,
    pub related_listing_id: Option<&'a str>,
}

impl Default for TxMeta<'_> {
    fn default() -> Self {
        Self {
            fee: 0,
            status: TxStatus::Completed,
            description: None,
            reference: None,
            related_user_id: None,
            related_listing_id: None,
        }
    }
}

/// Adjust the stored balance by `delta` (positive or negative), refusing to
/// drive it negative. The check and the mutation are a single guarded UPDATE,
/// so concurrent debits cannot both pass on a stale read.
pub async fn adjust_balance(
    conn: &mut SqliteConnection,
    account_id: &str,
    delta: i64,
) -> AppResult<i64> {
    let result =
        sqlx::query("UPDATE accounts SET balance = balance + ?1 WHERE id = ?2 AND balance + ?1 >= 0")
            .bind(delta)
            .bind(account_id)
            .execute(&mut *conn)
            .await?;

    if result.rows_affected() == 0 {
        // The guard blocked us: either no such account, or the debit would
        // overdraw it.
        let balance: Option<i64> = sqlx::query_scalar("SELECT balance FROM accounts WHERE id = ?1")
            .bind(account_id)
            .fetch_optional(&mut *conn)
            .await?;

        return match balance {
            None => Err(AppError::AccountNotFound),
            Some(_) => Err(AppError::InsufficientFunds),
        };
    }

    let balance: i64 = sqlx::query_scalar("SELECT balance FROM accounts WHERE id = ?1")
        .bind(account_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(balance)
}

/// Atomically adjust the balance and append the documenting ledger row with
/// `balance_after` snapshotting the result. Returns the new balance and the
/// id of the appended transaction.
pub async fn apply_delta(
    conn: &mut SqliteConnection,
    account_id: &str,
    delta: i64,
    tx_type: TxType,
    meta: TxMeta<'_>,
) -> AppResult<(i64, String)> {
    let new_balance = adjust_balance(conn, account_id, delta).await?;

    let tx_id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, account_id, tx_type, amount, fee, balance_after, status,
            description, reference, related_user_id, related_listing_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&tx_id)
    .bind(account_id)
    .bind(tx_type)
    .bind(delta.abs())
    .bind(meta.fee)
    .bind(new_balance)
    .bind(meta.status)
    .bind(meta.description)
    .bind(meta.reference)
    .bind(meta.related_user_id)
    .bind(meta.related_listing_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok((new_balance, tx_id))
}
