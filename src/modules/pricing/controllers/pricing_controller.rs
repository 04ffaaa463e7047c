use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::modules::price_lists::SupplierDiscountService;
use crate::modules::pricing::models::{
    CalculateBatchRequest, CalculatePriceRequest, RegisterSupplierDiscountRequest,
};
use crate::modules::pricing::services::PricingService;

/// Price one item
/// POST /api/prices/calculate
pub async fn calculate_price(
    service: web::Data<Arc<PricingService>>,
    request: web::Json<CalculatePriceRequest>,
) -> Result<HttpResponse, AppError> {
    let result = service.calculate_price(&request).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Price every line of an order
/// POST /api/prices/calculate-batch
pub async fn calculate_batch(
    service: web::Data<Arc<PricingService>>,
    request: web::Json<CalculateBatchRequest>,
) -> Result<HttpResponse, AppError> {
    let result = service.calculate_batch(&request).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Record a supplier discount on a stored base price
/// POST /api/prices/supplier-discount
pub async fn register_supplier_discount(
    service: web::Data<Arc<SupplierDiscountService>>,
    request: web::Json<RegisterSupplierDiscountRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let updated = service
        .register(
            request.item_base_price_id,
            request.percentage,
            request.notes.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/prices")
            .route("/calculate", web::post().to(calculate_price))
            .route("/calculate-batch", web::post().to(calculate_batch))
            .route("/supplier-discount", web::post().to(register_supplier_discount)),
    );
}
