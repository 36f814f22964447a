use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{ads, auth, catalog, comments, favorites, hello, home, pictures};

/// All application routes. Transport layers (CORS, tracing) are added by the
/// server binary.
pub fn build(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(home::home))
        .route("/hello", get(hello::hello))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/ads", get(ads::list_ads))
        .route("/ads/{ad_id}", get(ads::ad_detail))
        .route("/ads/{ad_id}/picture", get(pictures::stream_picture))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/ads/create", post(ads::create_ad))
        .route("/ads/{ad_id}/edit", get(ads::edit_ad))
        .route("/ads/{ad_id}/update", post(ads::update_ad))
        .route("/ads/{ad_id}/delete", post(ads::delete_ad))
        .route("/ads/{ad_id}/comments", post(comments::create_comment))
        .route("/comments/{comment_id}/delete", post(comments::delete_comment))
        .route("/ads/{ad_id}/favorite", post(favorites::add_favorite))
        .route("/ads/{ad_id}/unfavorite", post(favorites::remove_favorite))
        .route("/cats", get(catalog::list_cats).post(catalog::create_cat))
        .route("/cats/{cat_id}/update", post(catalog::update_cat))
        .route("/cats/{cat_id}/delete", post(catalog::delete_cat))
        .route("/cats/breeds", get(catalog::list_breeds).post(catalog::create_breed))
        .route("/cats/breeds/{breed_id}/update", post(catalog::update_breed))
        .route("/cats/breeds/{breed_id}/delete", post(catalog::delete_breed))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
