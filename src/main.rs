use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use precios::app::AppServices;
use precios::config::Config;
use precios::middleware::{RateLimiter, RequestId};
use precios::modules::audit::{AuditDispatcher, MySqlAuditSink};
use precios::modules::catalog::MySqlCatalogStore;
use precios::modules::health;
use precios::modules::price_lists::MySqlPriceListRepository;
use precios::modules::rules::MySqlRuleRepository;

const AUDIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

fn init_tracing(log_format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "precios=debug,actix_web=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    init_tracing(&config.app.log_format);

    tracing::info!("Starting Precios pricing engine");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config.database.create_pool().await?;

    tracing::info!(
        "Database pool initialized ({}-{} connections)",
        config.database.pool_size,
        config.database.max_connections
    );

    let (audit, audit_writer) = AuditDispatcher::spawn(
        Arc::new(MySqlAuditSink::new(db_pool.clone())),
        config.pricing.audit_queue_capacity,
    );

    let services = AppServices::new(
        Arc::new(MySqlPriceListRepository::new(db_pool.clone())),
        Arc::new(MySqlRuleRepository::new(db_pool.clone())),
        Arc::new(MySqlCatalogStore::new(db_pool.clone())),
        audit,
        Arc::new(MySqlAuditSink::new(db_pool.clone())),
        config.pricing.clock()?,
    );

    let rate_limit_per_hour = config.pricing.rate_limit_per_hour;
    // one limiter shared by every worker
    let limiter = RateLimiter::per_hour(rate_limit_per_hour)?;
    // forget callers whose bucket has refilled
    let _pruner = limiter.spawn_pruner(RATE_LIMIT_PRUNE_INTERVAL);

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(limiter.clone())
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .app_data(web::Data::new(db_pool.clone()))
            .configure(health::configure)
            .configure(|cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;

    // give the writer a moment to drain queued audit records
    if tokio::time::timeout(AUDIT_DRAIN_TIMEOUT, audit_writer).await.is_err() {
        tracing::warn!("Audit writer did not drain before shutdown");
    }

    Ok(())
}
