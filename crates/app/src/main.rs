use dioxus::prelude::*;

mod auth;
mod format;
mod notices;
mod routes;

use auth::AuthState;
use routes::Route;

const PORTAL_CSS: Asset = asset!("/assets/portal.css");

/// Extra room on top of the upload ceiling for multipart framing and the
/// other form fields, so oversized files reach the handler's own check.
#[cfg(feature = "server")]
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        server::config::load_feature_flags();
        let flags = server::config::feature_flags();

        if flags.telemetry {
            if let Err(e) = server::telemetry::init_telemetry() {
                tracing::error!(error = %e, "telemetry disabled");
            }
        }
        server::health::record_start_time();

        let pool = server::db::create_pool();
        if let Err(e) = server::db::run_migrations(&pool).await {
            tracing::error!(error = %e, "database migrations failed");
            std::process::exit(1);
        }

        if flags.demo_seed {
            if let Err(e) = server::seed::seed_demo_data(&pool).await {
                tracing::error!(error = %e, "demo seeding failed");
            }
        }

        let state = server::db::AppState { pool: pool.clone() };

        let mut router = dioxus::server::router(App).merge(server::openapi::api_router(pool));

        if flags.telemetry {
            router = router.layer(server::telemetry::OtelTraceLayer);
        }

        let max_body = server::config::max_upload_bytes() + MULTIPART_OVERHEAD;

        let router = router
            .layer(axum::extract::DefaultBodyLimit::max(max_body))
            .layer(axum::middleware::from_fn_with_state(
                state,
                server::auth::middleware::auth_middleware,
            ))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(server::config::cors_layer())
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(AuthState::new);

    rsx! {
        document::Link { rel: "stylesheet", href: PORTAL_CSS }
        shared_ui::ToastProvider {
            Router::<Route> {}
        }
    }
}
