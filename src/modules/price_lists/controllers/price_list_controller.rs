use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::AppError;
use crate::modules::price_lists::models::{
    BasePriceInput, DuplicatePriceList, NewPriceList, SalesChannel,
};
use crate::modules::price_lists::services::{PriceListQuery, PriceListService};

/// Body of a cost check
#[derive(Debug, Deserialize)]
pub struct PriceCheckRequest {
    pub item_id: i64,
    pub price: Decimal,
}

/// Query string of a current-list lookup
#[derive(Debug, Deserialize)]
pub struct CurrentListParams {
    pub company_id: i64,
    pub branch_id: Option<i64>,
    pub channel: Option<SalesChannel>,
    pub as_of_date: Option<NaiveDate>,
}

impl From<CurrentListParams> for PriceListQuery {
    fn from(params: CurrentListParams) -> Self {
        PriceListQuery {
            company_id: params.company_id,
            branch_id: params.branch_id,
            channel: params.channel,
            as_of: params.as_of_date,
        }
    }
}

/// GET /api/price-lists/current
pub async fn current_price_list(
    service: web::Data<Arc<PriceListService>>,
    params: web::Query<CurrentListParams>,
) -> Result<HttpResponse, AppError> {
    let query = PriceListQuery::from(params.into_inner());
    let detail = service.current_list(&query).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// GET /api/price-lists/{id}
pub async fn get_price_list(
    service: web::Data<Arc<PriceListService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = service.list_detail(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// POST /api/price-lists/{id}/duplicate
pub async fn duplicate_price_list(
    service: web::Data<Arc<PriceListService>>,
    path: web::Path<i64>,
    request: web::Json<DuplicatePriceList>,
) -> Result<HttpResponse, AppError> {
    let duplicated = service
        .duplicate_price_list(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(duplicated))
}

/// POST /api/price-lists
pub async fn create_price_list(
    service: web::Data<Arc<PriceListService>>,
    request: web::Json<NewPriceList>,
) -> Result<HttpResponse, AppError> {
    let created = service.create_price_list(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/price-lists/{id}/prices
pub async fn upsert_base_price(
    service: web::Data<Arc<PriceListService>>,
    path: web::Path<i64>,
    request: web::Json<BasePriceInput>,
) -> Result<HttpResponse, AppError> {
    let stored = service
        .upsert_base_price(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(stored))
}

/// Bulk load; answers 200 even when some rows were rejected
/// POST /api/price-lists/{id}/prices/bulk
pub async fn bulk_load_prices(
    service: web::Data<Arc<PriceListService>>,
    path: web::Path<i64>,
    request: web::Json<Vec<BasePriceInput>>,
) -> Result<HttpResponse, AppError> {
    let result = service
        .bulk_load_prices(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/price-lists/cost-check
pub async fn check_price(
    service: web::Data<Arc<PriceListService>>,
    request: web::Json<PriceCheckRequest>,
) -> Result<HttpResponse, AppError> {
    let check = service.check_price(request.item_id, request.price).await?;

    Ok(HttpResponse::Ok().json(check))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/price-lists")
            .route("", web::post().to(create_price_list))
            .route("/cost-check", web::post().to(check_price))
            .route("/current", web::get().to(current_price_list))
            .route("/{id}", web::get().to(get_price_list))
            .route("/{id}/duplicate", web::post().to(duplicate_price_list))
            .route("/{id}/prices", web::put().to(upsert_base_price))
            .route("/{id}/prices/bulk", web::post().to(bulk_load_prices)),
    );
}
