//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Message;
pub use response::Success;

mod auth;
mod budgets;
mod current_user;
mod fields;
mod itineraries;
mod memos;
mod place_search;
mod pois;
mod request;
mod response;
mod utils;

/// Get the Axum router for all API routes
pub fn router() -> Router {
    let auth = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/me", put(auth::update_me))
        .route("/me", delete(auth::delete_me));

    let pois = Router::new()
        .route("/", get(pois::list))
        .route("/", post(pois::create))
        .route("/{poi}", put(pois::update))
        .route("/{poi}", delete(pois::delete));

    let itineraries = Router::new()
        .route("/", get(itineraries::list))
        .route("/", post(itineraries::create))
        .route("/{itinerary}", put(itineraries::update))
        .route("/{itinerary}", delete(itineraries::delete));

    let budgets = Router::new()
        .route("/", get(budgets::list))
        .route("/", post(budgets::create))
        .route("/{budget}", put(budgets::update))
        .route("/{budget}", delete(budgets::delete));

    let memos = Router::new()
        .route("/", get(memos::list))
        .route("/", post(memos::create))
        .route("/{memo}", put(memos::update))
        .route("/{memo}", delete(memos::delete));

    Router::new()
        .nest("/auth", auth)
        .nest("/pois", pois)
        .nest("/itineraries", itineraries)
        .nest("/budgets", budgets)
        .nest("/memos", memos)
        .route("/amap/place/text", get(place_search::text))
        .route("/docs", get(crate::root::docs))
}
