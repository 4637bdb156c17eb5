//! Administrative endpoints: account provisioning, voucher issuance and the
//! mobile-money approval queue. The upstream gateway restricts these routes
//! to back-office operators.

use crate::models::*;
use crate::services::{TopUpService, VoucherService, WalletService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/admin/accounts",
    tag = "admin",
    request_body = CreateAccountRequest,
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Account provisioned", body = AccountResponse),
        (status = 400, description = "Invalid email, phone or opening balance")
    )
)]
pub async fn create_account(
    wallet_service: web::Data<WalletService>,
    request: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse> {
    match wallet_service.create_account(request.into_inner()).await {
        Ok(account) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": AccountResponse::from(account)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/vouchers",
    tag = "admin",
    request_body = IssueVouchersRequest,
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Vouchers issued"),
        (status = 400, description = "Invalid amount or count")
    )
)]
pub async fn issue_vouchers(
    voucher_service: web::Data<VoucherService>,
    request: web::Json<IssueVouchersRequest>,
) -> Result<HttpResponse> {
    match voucher_service.issue(request.into_inner()).await {
        Ok(vouchers) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": vouchers
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/topups",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page")
    ),
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Pending top-up claims, oldest first")
    )
)]
pub async fn list_pending_topups(
    topup_service: web::Data<TopUpService>,
    query: web::Query<TopUpQuery>,
) -> Result<HttpResponse> {
    match topup_service.list_pending(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/topups/{id}/approve",
    tag = "admin",
    params(
        ("id" = String, Path, description = "Top-up request id")
    ),
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Claim approved and balance credited", body = TopUpResolutionResponse),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already resolved")
    )
)]
pub async fn approve_topup(
    topup_service: web::Data<TopUpService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match topup_service.approve(&path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/topups/{id}/reject",
    tag = "admin",
    params(
        ("id" = String, Path, description = "Top-up request id")
    ),
    security(
        ("account_identity" = [])
    ),
    responses(
        (status = 200, description = "Claim rejected, balance untouched", body = TopUpResolutionResponse),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already resolved")
    )
)]
pub async fn reject_topup(
    topup_service: web::Data<TopUpService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match topup_service.reject(&path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/accounts", web::post().to(create_account))
            .route("/vouchers", web::post().to(issue_vouchers))
            .route("/topups", web::get().to(list_pending_topups))
            .route("/topups/{id}/approve", web::post().to(approve_topup))
            .route("/topups/{id}/reject", web::post().to(reject_topup)),
    );
}
