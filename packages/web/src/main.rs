use dioxus::prelude::*;

use ui::{AuthProvider, CheckoutRequest, ToastProvider};
use views::{CourseDetail, Courses, Login, Profile, Register};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/courses")]
    Courses {},
    #[route("/courses/:course_id")]
    CourseDetail { course_id: String },
    #[route("/profile")]
    Profile {},
}

const FAVICON: Asset = asset!("/assets/favicon.ico");
const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use axum::routing::get;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use std::time::Duration;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{Expiry, SessionManagerLayer};
    use tower_sessions_sqlx_store::PostgresStore;

    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    // Initialize database pool
    let pool = api::db::get_pool()
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!("../api/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");

    // Create session store
    let session_store = PostgresStore::new(pool.clone());

    // Session layer configuration
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            Duration::from_secs(60 * 60 * 24 * 7).try_into().unwrap(),
        )); // 7 days

    // Build the Dioxus app with custom routes
    let router = axum::Router::new()
        // Profile photos are stored server-side and served from here
        .route("/media/photo/{user_id}", get(profile_photo))
        // Then serve the Dioxus application
        .serve_dioxus_application(ServeConfig::new(), App)
        // Add session layer to all routes
        .layer(session_layer);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .unwrap();
}

#[cfg(feature = "server")]
async fn profile_photo(
    axum::extract::Path(user_id): axum::extract::Path<String>,
) -> axum::response::Response {
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;

    let Ok(pool) = api::db::get_pool().await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let Ok(user_uuid) = uuid::Uuid::parse_str(&user_id) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let row: Option<(Option<Vec<u8>>, Option<String>)> =
        match sqlx::query_as("SELECT photo, photo_content_type FROM users WHERE id = $1")
            .bind(user_uuid)
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("photo lookup failed: {e}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

    match row {
        Some((Some(bytes), content_type)) => (
            [(
                header::CONTENT_TYPE,
                content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            )],
            bytes,
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

#[component]
fn App() -> Element {
    // Checkout collaborator: hosted checkout pages get a redirect; local
    // (gateway-less) orders confirm immediately.
    ui::provide_checkout(Callback::new(move |req: CheckoutRequest| {
        match req.checkout_url.clone() {
            Some(url) => {
                #[cfg(target_arch = "wasm32")]
                {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href(&url);
                    }
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let _ = url;
                }
            }
            None => {
                spawn(async move {
                    match api::confirm_purchase(req.order_ref.clone()).await {
                        Ok(message) => req.on_success.call(message),
                        Err(e) => req.on_failure.call(e.to_string()),
                    }
                });
            }
        }
    }));

    rsx! {
        // Global app resources
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ToastProvider {
            AuthProvider {
                Router::<Route> {}
            }
        }
    }
}

/// Redirect `/` to `/courses`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Courses {});
    rsx! {}
}
