use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    Account, CreateAccountRequest, PaginatedResponse, PaginationParams, TransactionQuery,
    WalletTransaction, WalletTransactionResponse,
};
use crate::utils::normalize_na_phone;
use chrono::Utc;
use uuid::Uuid;

#[derive(Clone)]
pub struct WalletService {
    pool: DbPool,
}

impl WalletService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_balance(&self, account_id: &str) -> AppResult<i64> {
        let balance: Option<i64> = sqlx::query_scalar("SELECT balance FROM accounts WHERE id = ?1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        balance.ok_or(AppError::AccountNotFound)
    }

    pub async fn get_account(&self, account_id: &str) -> AppResult<Account> {
        let account: Option<Account> = sqlx::query_as(
            "SELECT id, email, phone, balance, created_at FROM accounts WHERE id = ?1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or(AppError::AccountNotFound)
    }

    /// Administrative provisioning; self-service registration lives upstream.
    pub async fn create_account(&self, request: CreateAccountRequest) -> AppResult<Account> {
        let email = request.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::ValidationError(
                "Invalid email address".to_string(),
            ));
        }
        if request.opening_balance < 0 {
            return Err(AppError::InvalidAmount(
                "Opening balance must not be negative".to_string(),
            ));
        }
        let phone = match request.phone.as_deref() {
            Some(p) => Some(normalize_na_phone(p)?),
            None => None,
        };

        let account = Account {
            id: Uuid::new_v4().to_string(),
            email,
            phone,
            balance: request.opening_balance,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO accounts (id, email, phone, balance, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&account.id)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(account.balance)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(d) if d.is_unique_violation() => AppError::ValidationError(
                "An account with this email or phone already exists".to_string(),
            ),
            e => AppError::from(e),
        })?;

        log::info!("Provisioned account {} ({})", account.id, account.email);

        Ok(account)
    }

    pub async fn get_transactions(
        &self,
        account_id: &str,
        query: &TransactionQuery,
    ) -> AppResult<PaginatedResponse<WalletTransactionResponse>> {
        // Surface AccountNotFound rather than an empty page for bad ids.
        self.get_balance(account_id).await?;

        let params = PaginationParams::new(query.page, query.per_page);
        let offset = params.get_offset();
        let limit = params.get_limit();

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE account_id = ?1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        let transactions: Vec<WalletTransaction> = sqlx::query_as(
            r#"
            SELECT
                id, account_id, tx_type, amount, fee, balance_after, status,
                description, reference, related_user_id, related_listing_id, created_at
            FROM transactions
            WHERE account_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let items: Vec<WalletTransactionResponse> = transactions
            .into_iter()
            .map(WalletTransactionResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1).max(1),
            limit,
            total,
        ))
    }
}
