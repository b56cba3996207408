/**
 * API Route Handlers
 *
 * Routes mounted under `/api/v1`.
 *
 * # Routes
 *
 * ## Public
 * - `POST /users/register`
 * - `POST /users/login`
 * - `POST /users/refresh-token`
 *
 * ## Authenticated
 * - users: logout, change-password, me, profile, follow-unfollow,
 *   get-suggested-users, update-user
 * - posts: all, following, likes, user, create, like, comment, update, delete
 * - notifications: list, delete
 */

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::backend::auth::{change_password, get_me, login, logout, refresh_token, register};
use crate::backend::graph::handlers::{follow_unfollow, get_profile, suggested_users, update_user};
use crate::backend::middleware::auth_middleware;
use crate::backend::notifications::handlers::{delete_notification, get_notifications};
use crate::backend::posts::handlers::{
    all_posts, comment_on_post, create_post, delete_post, following_posts, like_unlike,
    liked_posts, update_comment, user_posts,
};
use crate::backend::server::state::AppState;

/// Routes reachable without an access token
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/refresh-token", post(refresh_token))
}

/// Routes behind [`auth_middleware`]
fn protected_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/logout", post(logout))
        .route("/users/change-password", post(change_password))
        .route("/users/me", get(get_me))
        .route("/users/profile/{username}", get(get_profile))
        .route("/users/follow-unfollow/{id}", post(follow_unfollow))
        .route("/users/get-suggested-users", get(suggested_users))
        .route("/users/update-user", post(update_user))
        .route("/posts/all", get(all_posts))
        .route("/posts/following", get(following_posts))
        .route("/posts/likes/{id}", get(liked_posts))
        .route("/posts/user/{username}", get(user_posts))
        .route("/posts/create", post(create_post))
        .route("/posts/like/{id}", post(like_unlike))
        .route("/posts/comment/{id}", post(comment_on_post))
        .route("/posts/update/{id}", post(update_comment))
        .route("/posts/{id}", delete(delete_post))
        .route("/notifications", get(get_notifications))
        .route("/notifications/{id}", delete(delete_notification))
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware))
}

/// Configure API routes
///
/// The returned router is meant to be nested under `/api/v1`.
pub fn configure_api_routes(app_state: AppState) -> Router<AppState> {
    public_routes().merge(protected_routes(app_state))
}
