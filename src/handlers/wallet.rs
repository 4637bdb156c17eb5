use crate::error::{AppError, AppResult};
use crate::middlewares::AccountId;
use crate::models::*;
use crate::services::{TopUpService, TransferService, VoucherService, WalletService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_account_id(req: &HttpRequest) -> AppResult<String> {
    req.extensions()
        .get::<AccountId>()
        .map(|a| a.0.clone())
        .ok_or_else(|| AppError::AuthError("Missing account identity".to_string()))
}

#[utoipa::path(
    get,
    path = "/wallet/balance",
    tag = "wallet",
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Current balance in NAD cents", body = BalanceResponse),
        (status = 401, description = "Missing identity"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_balance(
    wallet_service: web::Data<WalletService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let account_id = match get_account_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match wallet_service.get_balance(&account_id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": BalanceResponse { balance }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wallet/transactions",
    tag = "wallet",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page")
    ),
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Paginated ledger history, newest first"),
        (status = 401, description = "Missing identity")
    )
)]
pub async fn get_transactions(
    wallet_service: web::Data<WalletService>,
    req: HttpRequest,
    query: web::Query<TransactionQuery>,
) -> Result<HttpResponse> {
    let account_id = match get_account_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match wallet_service.get_transactions(&account_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wallet/transfer",
    tag = "wallet",
    request_body = TransferRequest,
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Transfer executed", body = TransferResponse),
        (status = 400, description = "Invalid amount, insufficient funds or self transfer"),
        (status = 404, description = "Recipient not found"),
        (status = 409, description = "Recipient ambiguous")
    )
)]
pub async fn transfer(
    transfer_service: web::Data<TransferService>,
    req: HttpRequest,
    request: web::Json<TransferRequest>,
) -> Result<HttpResponse> {
    let account_id = match get_account_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match transfer_service
        .transfer(&account_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wallet/vouchers/redeem",
    tag = "wallet",
    request_body = RedeemVoucherRequest,
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Voucher credited", body = RedeemVoucherResponse),
        (status = 404, description = "Voucher not found"),
        (status = 409, description = "Voucher already redeemed")
    )
)]
pub async fn redeem_voucher(
    voucher_service: web::Data<VoucherService>,
    req: HttpRequest,
    request: web::Json<RedeemVoucherRequest>,
) -> Result<HttpResponse> {
    let account_id = match get_account_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match voucher_service
        .redeem(&account_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wallet/topups",
    tag = "wallet",
    request_body = SubmitTopUpRequest,
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Top-up claim queued as pending", body = TopUpRequestResponse),
        (status = 400, description = "Invalid claim")
    )
)]
pub async fn submit_topup(
    topup_service: web::Data<TopUpService>,
    req: HttpRequest,
    request: web::Json<SubmitTopUpRequest>,
) -> Result<HttpResponse> {
    let account_id = match get_account_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match topup_service
        .submit(&account_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn wallet_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wallet")
            .route("/balance", web::get().to(get_balance))
            .route("/transactions", web::get().to(get_transactions))
            .route("/transfer", web::post().to(transfer))
            .route("/vouchers/redeem", web::post().to(redeem_voucher))
            .route("/topups", web::post().to(submit_topup)),
    );
}
