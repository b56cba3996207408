/**
 * Post Handlers
 *
 * Feeds, post creation and deletion, comments and likes under
 * `/api/v1/posts`. Every route requires authentication.
 */

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::media::Submission;
use crate::backend::middleware::AuthUser;
use crate::backend::posts::db::{
    add_comment, create_post as store_post, delete_post as remove_post, edit_comment, toggle_like,
};
use crate::backend::posts::feed::{compose_feed, FeedMode};
use crate::backend::server::state::AppState;
use crate::shared::{
    ApiResponse, CommentView, CreatePostRequest, EditCommentRequest, LikeToggle,
    NewCommentRequest, PostView,
};

type IdPath = WithRejection<Path<Uuid>, BackendError>;

async fn feed(
    state: &AppState,
    viewer_id: Uuid,
    mode: FeedMode,
) -> BackendResult<ApiResponse<Vec<PostView>>> {
    let posts = compose_feed(&state.db_pool, viewer_id, mode).await?;
    Ok(ApiResponse::ok(posts, "Posts fetched successfully"))
}

/// GET /posts/all
pub async fn all_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<ApiResponse<Vec<PostView>>> {
    feed(&state, user.user_id, FeedMode::All).await
}

/// GET /posts/following
pub async fn following_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<ApiResponse<Vec<PostView>>> {
    feed(&state, user.user_id, FeedMode::Following).await
}

/// GET /posts/likes/{id}
pub async fn liked_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(user_id), _): IdPath,
) -> BackendResult<ApiResponse<Vec<PostView>>> {
    feed(&state, user.user_id, FeedMode::Liked(user_id)).await
}

/// GET /posts/user/{username}
pub async fn user_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(username), _): WithRejection<Path<String>, BackendError>,
) -> BackendResult<ApiResponse<Vec<PostView>>> {
    feed(&state, user.user_id, FeedMode::ByUser(username)).await
}

/// POST /posts/create
///
/// JSON `{ "text": ... }` or a multipart form with `text` and an `img` file.
/// The image is stored first and released again if the post is rejected.
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    submission: Submission<CreatePostRequest>,
) -> BackendResult<ApiResponse<PostView>> {
    let (text, img) = match submission {
        Submission::Json(body) => (body.text, None),
        Submission::Form(mut form) => {
            let img = state.media.save_optional(form.take_file("img")).await?;
            (form.text("text"), img)
        }
    };

    match store_post(&state.db_pool, user.user_id, text.as_deref(), img.clone()).await {
        Ok(post) => Ok(ApiResponse::ok(post, "Post created successfully")),
        Err(e) => {
            if let Some(url) = img {
                state.media.discard(&url).await;
            }
            Err(e)
        }
    }
}

/// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(post_id), _): IdPath,
) -> BackendResult<ApiResponse<()>> {
    let post = remove_post(&state.db_pool, post_id, user.user_id).await?;
    if !post.img.is_empty() {
        state.media.discard(&post.img).await;
    }
    Ok(ApiResponse::message_only("Post deleted successfully"))
}

/// POST /posts/comment/{id}
pub async fn comment_on_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(post_id), _): IdPath,
    WithRejection(Json(body), _): WithRejection<Json<NewCommentRequest>, BackendError>,
) -> BackendResult<ApiResponse<CommentView>> {
    let comment = add_comment(&state.db_pool, post_id, user.user_id, &body.text).await?;
    Ok(ApiResponse::ok(comment, "Comment added successfully"))
}

/// POST /posts/update/{id} with `{ "commentId": ..., "text": ... }`
pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(post_id), _): IdPath,
    WithRejection(Json(body), _): WithRejection<Json<EditCommentRequest>, BackendError>,
) -> BackendResult<ApiResponse<CommentView>> {
    let comment =
        edit_comment(&state.db_pool, post_id, body.comment_id, user.user_id, &body.text).await?;
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

/// POST /posts/like/{id}
pub async fn like_unlike(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(post_id), _): IdPath,
) -> BackendResult<ApiResponse<LikeToggle>> {
    let toggle = toggle_like(&state.db_pool, post_id, user.user_id).await?;
    let message = toggle.message();
    Ok(ApiResponse::ok(toggle, message))
}
