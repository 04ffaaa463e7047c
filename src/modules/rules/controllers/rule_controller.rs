use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::modules::rules::models::{PricingRule, ProductBundle};
use crate::modules::rules::services::RuleService;

/// POST /api/rules
pub async fn create_rule(
    service: web::Data<Arc<RuleService>>,
    request: web::Json<PricingRule>,
) -> Result<HttpResponse, AppError> {
    let created = service.create_rule(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(created))
}

/// POST /api/bundles
pub async fn create_bundle(
    service: web::Data<Arc<RuleService>>,
    request: web::Json<ProductBundle>,
) -> Result<HttpResponse, AppError> {
    let created = service.create_bundle(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(created))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/rules", web::post().to(create_rule))
        .route("/api/bundles", web::post().to(create_bundle));
}
