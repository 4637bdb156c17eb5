use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::fees::{FeatureSelections, ListingCharge, ListingChargeQuoteRequest};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "account_identity",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Account-Id"))),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::wallet::get_balance,
        handlers::wallet::get_transactions,
        handlers::wallet::transfer,
        handlers::wallet::redeem_voucher,
        handlers::wallet::submit_topup,
        handlers::listings::quote_listing_charge,
        handlers::admin::create_account,
        handlers::admin::issue_vouchers,
        handlers::admin::list_pending_topups,
        handlers::admin::approve_topup,
        handlers::admin::reject_topup,
    ),
    components(
        schemas(
            Account,
            AccountResponse,
            CreateAccountRequest,
            BalanceResponse,
            TxType,
            TxStatus,
            WalletTransaction,
            WalletTransactionResponse,
            TransactionQuery,
            TransferRequest,
            TransferResponse,
            Voucher,
            VoucherResponse,
            RedeemVoucherRequest,
            RedeemVoucherResponse,
            IssueVouchersRequest,
            TopUpStatus,
            TopUpRequest,
            TopUpRequestResponse,
            TopUpResolutionResponse,
            SubmitTopUpRequest,
            TopUpQuery,
            FeatureSelections,
            ListingChargeQuoteRequest,
            ListingCharge,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "wallet", description = "Wallet ledger API"),
        (name = "listings", description = "Listing charge quotes"),
        (name = "admin", description = "Back-office API"),
    ),
    info(
        title = "SwopNet Wallet API",
        version = "1.0.0",
        description = "Wallet ledger service for the SwopNet barter marketplace"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
