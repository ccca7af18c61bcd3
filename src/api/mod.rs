// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Internal audits API surface.
//!
//! Health probes are public. Everything under `/v1` sits behind the
//! trust middleware: requests without a gateway-forwarded identity that
//! matches a local user record never reach a handler.

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{UpdateRoleRequest, UserListResponse, UserResponse},
    state::AppState,
    trust::trust_gateway,
};

pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route("/users", get(users::list_users))
        .route("/users/{subject}/role", put(users::update_user_role))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trust_gateway,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/healthz", get(health::liveness))
        .route("/readyz", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        users::get_current_user,
        users::list_users,
        users::update_user_role
    ),
    components(
        schemas(
            UserResponse,
            UserListResponse,
            UpdateRoleRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "User records and role management")
    )
)]
struct ApiDoc;
