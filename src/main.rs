mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::extractor::ProxyPolicy;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::auth;
use crate::features::auth::routes as auth_routes;
use crate::features::newsletter::{
    routes as newsletter_routes, NewsletterService, PgNewsletterRepository,
};
use crate::features::notifications::{
    routes as notifications_routes, ConfirmationMailer, EmailTransport, LogTransport,
    ResendTransport,
};
use crate::features::rate_limits::{
    routes as rate_limits_routes, PgRateLimitStore, PgSecuritySettingsStore, RateLimitService,
    SecuritySettingsService, TrackingJanitor,
};
use crate::features::references::{
    routes as references_routes, PgReferenceGenerator, ReferenceService,
};
use crate::features::submissions::{
    routes as submissions_routes, PgSubmissionRepository, SubmissionService,
};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn_with_state, Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Configuration loaded: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        &config.auth.jwt_secret,
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    tracing::info!("Auth configuration initialized");

    // Initialize rate limiting
    let security_settings_store = Arc::new(PgSecuritySettingsStore::new(pool.clone()));
    let rate_limit_service = Arc::new(RateLimitService::new(
        Arc::new(PgRateLimitStore::new(pool.clone())),
        security_settings_store.clone(),
        config.rate_limits.clone(),
    ));
    let security_settings_service =
        Arc::new(SecuritySettingsService::new(security_settings_store));
    tracing::info!(
        "Rate limit services initialized ({} endpoint policies)",
        config.rate_limits.policies.len()
    );

    // Initialize reference generator
    let reference_service = Arc::new(ReferenceService::new(Arc::new(
        PgReferenceGenerator::new(pool.clone()),
    )));

    // Initialize confirmation mailer
    let transport: Arc<dyn EmailTransport> = match &config.mailer.api_key {
        Some(api_key) => {
            let resend = ResendTransport::new(&config.mailer, api_key.clone())
                .map_err(|e| anyhow::anyhow!("Failed to create mail client: {}", e))?;
            tracing::info!("Confirmation mailer using Resend ({})", config.mailer.api_url);
            Arc::new(resend)
        }
        None => {
            tracing::warn!("RESEND_API_KEY not set, confirmation e-mails will only be logged");
            Arc::new(LogTransport)
        }
    };
    let mailer = Arc::new(ConfirmationMailer::new(transport));

    // Initialize submission services
    let submission_repository = Arc::new(PgSubmissionRepository::new(pool.clone()));
    let newsletter_repository = Arc::new(PgNewsletterRepository::new(pool.clone()));
    let submission_service = Arc::new(SubmissionService::new(
        submission_repository.clone(),
        Arc::clone(&reference_service),
        Arc::clone(&rate_limit_service),
        Arc::clone(&mailer),
    ));
    let newsletter_service = Arc::new(NewsletterService::new(
        newsletter_repository.clone(),
        Arc::clone(&rate_limit_service),
    ));
    let admin_service = Arc::new(AdminService::new(
        submission_repository,
        newsletter_repository,
    ));
    tracing::info!("Submission services initialized");

    // Spawn rate limit tracking janitor
    let janitor = TrackingJanitor::new(
        Arc::clone(&rate_limit_service),
        config.rate_limits.cleanup_interval,
        config.rate_limits.retention,
    );
    tokio::spawn(async move {
        janitor.run().await;
    });

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };
    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::swagger_basic_auth,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(rate_limits_routes::admin_routes(security_settings_service))
        .nest("/api/admin", admin_routes::routes(admin_service))
        .route_layer(from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }

    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required, rate limited per client)
    let public_routes = Router::new()
        .merge(submissions_routes::routes(submission_service))
        .merge(newsletter_routes::routes(newsletter_service))
        .merge(references_routes::routes(
            reference_service,
            Arc::clone(&rate_limit_service),
        ))
        .merge(notifications_routes::routes(mailer, rate_limit_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(Extension(ProxyPolicy {
            trust_forwarded_headers: config.rate_limits.trust_proxy_headers,
        }))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;

    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    // Client addresses feed the rate limiter when no trusted proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
