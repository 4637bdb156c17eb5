use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    PaginatedResponse, PaginationParams, SubmitTopUpRequest, TopUpQuery, TopUpRequest,
    TopUpRequestResponse, TopUpResolutionResponse, TopUpStatus, TxStatus, TxType,
};
use crate::services::ledger;
use chrono::Utc;
use uuid::Uuid;

const TOPUP_SELECT: &str = r#"
    SELECT id, account_id, amount, bank, receipt_url, status, transaction_id,
           created_at, resolved_at
    FROM topup_requests
"#;

#[derive(Clone)]
pub struct TopUpService {
    pool: DbPool,
}

impl TopUpService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record a mobile-money payment claim. This queues a pending request and
    /// a pending ledger row; no balance moves until an administrator approves.
    pub async fn submit(
        &self,
        account_id: &str,
        request: SubmitTopUpRequest,
    ) -> AppResult<TopUpRequestResponse> {
        if request.amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Top-up amount must be positive".to_string(),
            ));
        }
        if request.bank.trim().is_empty() {
            return Err(AppError::ValidationError("Bank is required".to_string()));
        }
        if request.receipt_url.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Receipt URL is required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM accounts WHERE id = ?1")
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::AccountNotFound);
        }

        let now = Utc::now();
        let request_id = Uuid::new_v4().to_string();
        let transaction_id = Uuid::new_v4().to_string();
        let description = format!("Mobile money top-up via {}", request.bank.trim());

        // Pending ledger row: balance_after stays NULL until approval.
        sqlx::query(
            r#"
            INSERT INTO transactions (id, account_id, tx_type, amount, status, description, reference, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&transaction_id)
        .bind(account_id)
        .bind(TxType::Topup)
        .bind(request.amount)
        .bind(TxStatus::Pending)
        .bind(&description)
        .bind(&request_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO topup_requests (id, account_id, amount, bank, receipt_url, status, transaction_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&request_id)
        .bind(account_id)
        .bind(request.amount)
        .bind(request.bank.trim())
        .bind(request.receipt_url.trim())
        .bind(TopUpStatus::Pending)
        .bind(&transaction_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        log::info!(
            "Top-up request {} queued for account {} ({} cents via {})",
            request_id,
            account_id,
            request.amount,
            request.bank.trim()
        );

        Ok(TopUpRequestResponse {
            id: request_id,
            account_id: account_id.to_string(),
            amount: request.amount,
            bank: request.bank.trim().to_string(),
            receipt_url: request.receipt_url.trim().to_string(),
            status: TopUpStatus::Pending,
            created_at: now,
            resolved_at: None,
        })
    }

    /// Approve a pending claim: the request flips to approved, the balance is
    /// credited and the linked ledger row completes with its balance snapshot,
    /// all in one SQL transaction.
    pub async fn approve(&self, request_id: &str) -> AppResult<TopUpResolutionResponse> {
        let mut tx = self.pool.begin().await?;

        let request = load_request(&mut tx, request_id).await?;
        let resolved_at = Utc::now();

        // Guarded flip; a concurrent approve/reject loses here.
        let flipped = sqlx::query(
            "UPDATE topup_requests SET status = ?1, resolved_at = ?2 WHERE id = ?3 AND status = ?4",
        )
        .bind(TopUpStatus::Approved)
        .bind(resolved_at)
        .bind(request_id)
        .bind(TopUpStatus::Pending)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() == 0 {
            return Err(AppError::AlreadyResolved);
        }

        let new_balance =
            ledger::adjust_balance(&mut tx, &request.account_id, request.amount).await?;

        // Complete the pending ledger row instead of appending a second one.
        sqlx::query("UPDATE transactions SET status = ?1, balance_after = ?2 WHERE id = ?3")
            .bind(TxStatus::Completed)
            .bind(new_balance)
            .bind(&request.transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!(
            "Top-up request {} approved, account {} credited {} cents",
            request_id,
            request.account_id,
            request.amount
        );

        Ok(TopUpResolutionResponse {
            id: request_id.to_string(),
            status: TopUpStatus::Approved,
            new_balance: Some(new_balance),
        })
    }

    /// Reject a pending claim. The linked ledger row fails; the balance is
    /// never touched and the request can not be approved afterwards.
    pub async fn reject(&self, request_id: &str) -> AppResult<TopUpResolutionResponse> {
        let mut tx = self.pool.begin().await?;

        let request = load_request(&mut tx, request_id).await?;

        let flipped = sqlx::query(
            "UPDATE topup_requests SET status = ?1, resolved_at = ?2 WHERE id = ?3 AND status = ?4",
        )
        .bind(TopUpStatus::Rejected)
        .bind(Utc::now())
        .bind(request_id)
        .bind(TopUpStatus::Pending)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() == 0 {
            return Err(AppError::AlreadyResolved);
        }

        sqlx::query("UPDATE transactions SET status = ?1 WHERE id = ?2")
            .bind(TxStatus::Failed)
            .bind(&request.transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("Top-up request {request_id} rejected");

        Ok(TopUpResolutionResponse {
            id: request_id.to_string(),
            status: TopUpStatus::Rejected,
            new_balance: None,
        })
    }

    /// Pending claims, oldest first — the administrative work queue.
    pub async fn list_pending(
        &self,
        query: &TopUpQuery,
    ) -> AppResult<PaginatedResponse<TopUpRequestResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM topup_requests WHERE status = ?1")
                .bind(TopUpStatus::Pending)
                .fetch_one(&self.pool)
                .await?;

        let requests: Vec<TopUpRequest> = sqlx::query_as(&format!(
            "{TOPUP_SELECT} WHERE status = ?1 ORDER BY created_at ASC LIMIT ?2 OFFSET ?3"
        ))
        .bind(TopUpStatus::Pending)
        .bind(params.get_limit())
        .bind(params.get_offset())
        .fetch_all(&self.pool)
        .await?;

        let items: Vec<TopUpRequestResponse> = requests
            .into_iter()
            .map(TopUpRequestResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1).max(1),
            params.get_limit(),
            total,
        ))
    }
}

async fn load_request(
    conn: &mut sqlx::SqliteConnection,
    request_id: &str,
) -> AppResult<TopUpRequest> {
    let request: Option<TopUpRequest> = sqlx::query_as(&format!("{TOPUP_SELECT} WHERE id = ?1"))
        .bind(request_id)
        .fetch_optional(&mut *conn)
        .await?;

    request.ok_or_else(|| AppError::NotFound("Top-up request not found".to_string()))
}
