use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    IssueVouchersRequest, RedeemVoucherRequest, RedeemVoucherResponse, TxType, Voucher,
    VoucherResponse,
};
use crate::services::ledger::{self, TxMeta};
use crate::utils::{generate_voucher_code, normalize_voucher_code};
use chrono::Utc;

#[derive(Clone)]
pub struct VoucherService {
    pool: DbPool,
}

impl VoucherService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Redeem a voucher for the calling account. Marking the voucher consumed
    /// and crediting the balance happen in one SQL transaction: if the credit
    /// fails the claim rolls back and the voucher stays redeemable.
    pub async fn redeem(
        &self,
        account_id: &str,
        request: RedeemVoucherRequest,
    ) -> AppResult<RedeemVoucherResponse> {
        let code = normalize_voucher_code(&request.code)?;

        let mut tx = self.pool.begin().await?;

        let voucher: Option<Voucher> = sqlx::query_as(
            "SELECT code, amount, redeemed, redeemed_by, redeemed_at, created_at FROM vouchers WHERE code = ?1",
        )
        .bind(&code)
        .fetch_optional(&mut *tx)
        .await?;

        let voucher = voucher.ok_or(AppError::VoucherNotFound)?;
        if voucher.redeemed {
            return Err(AppError::VoucherAlreadyRedeemed);
        }

        // Guarded claim: a concurrent redeem of the same code loses here.
        let claimed = sqlx::query(
            "UPDATE vouchers SET redeemed = 1, redeemed_by = ?1, redeemed_at = ?2 WHERE code = ?3 AND redeemed = 0",
        )
        .bind(account_id)
        .bind(Utc::now())
        .bind(&code)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            return Err(AppError::VoucherAlreadyRedeemed);
        }

        let description = format!("Voucher {code}");
        let (new_balance, transaction_id) = ledger::apply_delta(
            &mut tx,
            account_id,
            voucher.amount,
            TxType::Voucher,
            TxMeta {
                description: Some(&description),
                reference: Some(&code),
                ..Default::default()
            },
        )
        .await?;

        tx.commit().await?;

        log::info!(
            "Voucher {} redeemed by {} for {} cents",
            code,
            account_id,
            voucher.amount
        );

        Ok(RedeemVoucherResponse {
            amount: voucher.amount,
            new_balance,
            transaction_id,
        })
    }

    /// Issue freshly generated single-use codes (administrative).
    pub async fn issue(&self, request: IssueVouchersRequest) -> AppResult<Vec<VoucherResponse>> {
        if request.amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Voucher amount must be positive".to_string(),
            ));
        }
        let count = request.count.unwrap_or(1);
        if count == 0 || count > 100 {
            return Err(AppError::ValidationError(
                "Voucher count must be between 1 and 100".to_string(),
            ));
        }

        let mut issued = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let voucher = self.insert_with_fresh_code(request.amount).await?;
            issued.push(VoucherResponse::from(voucher));
        }

        Ok(issued)
    }

    async fn insert_with_fresh_code(&self, amount: i64) -> AppResult<Voucher> {
        // Collisions in a 10-digit space are rare; retry a few times anyway.
        for _ in 0..5 {
            let voucher = Voucher {
                code: generate_voucher_code(),
                amount,
                redeemed: false,
                redeemed_by: None,
                redeemed_at: None,
                created_at: Utc::now(),
            };

            let result = sqlx::query(
                "INSERT INTO vouchers (code, amount, redeemed, created_at) VALUES (?1, ?2, 0, ?3)",
            )
            .bind(&voucher.code)
            .bind(voucher.amount)
            .bind(voucher.created_at)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => return Ok(voucher),
                Err(sqlx::Error::Database(d)) if d.is_unique_violation() => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::OperationFailed(
            "Could not allocate a unique voucher code".to_string(),
        ))
    }
}
