use crate::fees;
use crate::fees::{ListingCharge, ListingChargeQuoteRequest};
use actix_web::{HttpResponse, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/listings/quote",
    tag = "listings",
    request_body = ListingChargeQuoteRequest,
    responses(
        (status = 200, description = "Listing charge breakdown", body = ListingCharge)
    )
)]
pub async fn quote_listing_charge(
    request: web::Json<ListingChargeQuoteRequest>,
) -> Result<HttpResponse> {
    let charge = fees::total_listing_charge(request.value, &request.features);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": charge
    })))
}

pub fn listings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/listings").route("/quote", web::post().to(quote_listing_charge)));
}
