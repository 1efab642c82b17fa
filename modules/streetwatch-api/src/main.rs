use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nominatim_client::NominatimClient;
use streetwatch_common::{Config, SeverityTable};
use streetwatch_graph::{migrate, CrimeReader, CrimeWriter, GraphClient};

mod auth;
mod rest;

pub struct AppState {
    pub reader: CrimeReader,
    pub writer: CrimeWriter,
    pub geocoder: NominatimClient,
    pub severity: SeverityTable,
    pub alert_radius_m: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("streetwatch_api=info".parse()?)
                .add_directive("streetwatch_graph=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    let client =
        GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await?;
    migrate::migrate(&client).await?;

    let state = Arc::new(AppState {
        reader: CrimeReader::new(client.clone()),
        writer: CrimeWriter::new(client),
        geocoder: NominatimClient::new(&config.nominatim_url),
        severity: SeverityTable::with_extra(&config.extra_red_types, &config.extra_yellow_types),
        alert_radius_m: config.alert_radius_m,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Accounts
        .route("/api/register", post(rest::users::api_register))
        .route("/api/login", post(rest::users::api_login))
        // Crime records
        .route(
            "/api/crimes",
            post(rest::api_submit_crime).get(rest::api_list_crimes),
        )
        .route("/api/crimes/nearest", get(rest::api_nearest_crime))
        .route("/api/crimes/alerts", get(rest::api_proximity_alerts))
        .route("/api/crimes/{id}/upvote", post(rest::api_upvote))
        .route("/api/crimes/{id}/downvote", post(rest::api_downvote))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // The browser map polls the feed after every mutation; intermediaries
        // must not serve stale records.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only (no query params)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("StreetWatch API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
