mod extract;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{
    analytics, auth, contracts, customers, documents, matches, merchants, packages, payments,
    rides, subscriptions, users,
};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/public/auth/login", post(auth::public_login))
        .route("/api/public/customer/data", get(customers::data))
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/:id",
            get(users::find).put(users::update).delete(users::delete),
        )
        .route("/api/users/:id/notifications", post(users::notify))
        .route(
            "/api/contracts",
            get(contracts::list)
                .post(contracts::create)
                .put(contracts::update)
                .delete(contracts::delete),
        )
        .route("/api/contracts/:id", get(contracts::find))
        .route(
            "/api/documents",
            get(documents::list)
                .post(documents::generate)
                .delete(documents::delete),
        )
        .route("/api/matches", get(matches::list).post(matches::create))
        .route(
            "/api/matches/:id",
            get(matches::find).put(matches::update_status),
        )
        .route("/api/packages", get(packages::list).post(packages::create))
        .route("/api/packages/:id", get(packages::find))
        .route("/api/rides", get(rides::list).post(rides::create))
        .route("/api/rides/:id", get(rides::find))
        .route("/api/payments", get(payments::list).post(payments::record))
        .route("/api/merchants", get(merchants::list))
        .route("/api/merchants/products", get(merchants::list_products))
        .route(
            "/api/merchants/products/:id",
            get(merchants::find_product).delete(merchants::delete_product),
        )
        .route(
            "/api/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route("/api/subscriptions/:id", put(subscriptions::update))
        .route("/api/analytics", get(analytics::show))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;

    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}
