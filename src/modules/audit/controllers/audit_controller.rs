use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::modules::audit::services::AuditHistoryService;

/// GET /api/audit/items/{item_id}
pub async fn item_history(
    service: web::Data<Arc<AuditHistoryService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let entries = service.item_history(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(entries))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/audit").route("/items/{item_id}", web::get().to(item_history)));
}
