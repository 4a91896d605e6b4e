use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::{
    database::conn::LazyConn,
    database::posts as db,
    database::users::get_min_user,
    entities::post::Post,
    entities::user::User,
    extractors::auth::AuthSession,
    get_conn,
    utils::{
        response::{ApiResponse, AppError, FuncError, response},
        state::ArcAppState,
    },
};

/// Anything that does not parse as a snowflake can't name a post;
/// same signal as an absent one.
fn check_post_id(post_id: &str) -> Result<(), FuncError> {
    post_id
        .parse::<u64>()
        .map(|_| ())
        .map_err(|_| FuncError::PostNotFound)
}

async fn load_post(post_id: &str, conn: &mut LazyConn) -> Result<Post, AppError> {
    check_post_id(post_id)?;
    let post = db::get_post(post_id, conn).await?;
    Ok(post.ok_or(FuncError::PostNotFound)?)
}

/// Author name/avatar are copied into posts and comments at write time,
/// as bare storage keys. A valid token whose account is gone gets
/// USER_NOT_FOUND.
async fn caller_snapshot(session: &AuthSession, conn: &mut LazyConn) -> Result<User, AppError> {
    let user = get_min_user(&session.user_id, conn).await?;
    Ok(user.ok_or(FuncError::UserNotFound)?)
}

mod create {
    use serde::Deserialize;
    use validator::Validate;

    use super::*;
    use crate::utils::{snowflake::SnowflakeGenerator, validate::ValidatedJson};

    #[derive(Debug, Deserialize, Validate)]
    pub struct Payload {
        #[validate(length(min = 1, max = 4096))]
        pub text: String,
    }

    pub async fn handler(
        session: AuthSession,
        State(state): State<ArcAppState>,
        ValidatedJson(payload): ValidatedJson<Payload>,
    ) -> Result<ApiResponse<Post>, AppError> {
        let mut conn = get_conn!(state);
        let author = caller_snapshot(&session, &mut conn).await?;

        let post_id = state.snowflake.generate();
        let post = Post {
            post_id: post_id.to_string(),
            user_id: session.user_id,
            display_name: author.display_name,
            avatar_url: author.avatar_url,
            content: payload.text,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: SnowflakeGenerator::parse(post_id).0,
        };
        db::insert_post(&post, &mut conn).await?;

        Ok(response(post.into_public(&state.config), StatusCode::OK))
    }
}

mod list {
    use super::*;

    pub async fn handler(
        _session: AuthSession,
        State(state): State<ArcAppState>,
    ) -> Result<ApiResponse<Vec<Post>>, AppError> {
        let mut conn = get_conn!(state);
        let posts = db::list_posts(&mut conn).await?;
        let posts = posts
            .into_iter()
            .map(|p| p.into_public(&state.config))
            .collect();
        Ok(response(posts, StatusCode::OK))
    }
}

mod get_one {
    use axum::extract::Path;

    use super::*;

    pub async fn handler(
        _session: AuthSession,
        State(state): State<ArcAppState>,
        Path(post_id): Path<String>,
    ) -> Result<ApiResponse<Post>, AppError> {
        let mut conn = get_conn!(state);
        let post = load_post(&post_id, &mut conn).await?;
        Ok(response(post.into_public(&state.config), StatusCode::OK))
    }
}

mod remove {
    use axum::extract::Path;

    use super::*;

    #[derive(Debug, Serialize)]
    pub struct Returns {
        pub msg: &'static str,
    }

    pub async fn handler(
        session: AuthSession,
        State(state): State<ArcAppState>,
        Path(post_id): Path<String>,
    ) -> Result<ApiResponse<Returns>, AppError> {
        let mut conn = get_conn!(state);
        let post = load_post(&post_id, &mut conn).await?;

        post.ensure_author(&session.user_id)?;
        db::delete_post(&post.post_id, &mut conn).await?;

        Ok(response(Returns { msg: "Post removed" }, StatusCode::OK))
    }
}

mod like {
    use axum::extract::Path;

    use super::*;
    use crate::entities::post::Like;

    pub async fn handler(
        session: AuthSession,
        State(state): State<ArcAppState>,
        Path(post_id): Path<String>,
    ) -> Result<ApiResponse<Vec<Like>>, AppError> {
        let mut conn = get_conn!(state);
        let mut post = load_post(&post_id, &mut conn).await?;

        post.like(&session.user_id)?;
        db::update_likes(&post, &mut conn).await?;

        Ok(response(post.likes, StatusCode::OK))
    }
}

mod unlike {
    use axum::extract::Path;

    use super::*;

    #[derive(Debug, Serialize)]
    pub struct Returns {
        pub msg: &'static str,
    }

    pub async fn handler(
        session: AuthSession,
        State(state): State<ArcAppState>,
        Path(post_id): Path<String>,
    ) -> Result<ApiResponse<Returns>, AppError> {
        let mut conn = get_conn!(state);
        let mut post = load_post(&post_id, &mut conn).await?;

        post.unlike(&session.user_id)?;
        db::update_likes(&post, &mut conn).await?;

        Ok(response(Returns { msg: "Like removed" }, StatusCode::OK))
    }
}

mod add_comment {
    use axum::extract::Path;
    use serde::Deserialize;
    use validator::Validate;

    use super::*;
    use crate::{
        entities::post::Comment,
        utils::{snowflake::SnowflakeGenerator, validate::ValidatedJson},
    };

    #[derive(Debug, Deserialize, Validate)]
    pub struct Payload {
        #[validate(length(min = 1, max = 4096))]
        pub text: String,
    }

    pub async fn handler(
        session: AuthSession,
        State(state): State<ArcAppState>,
        Path(post_id): Path<String>,
        ValidatedJson(payload): ValidatedJson<Payload>,
    ) -> Result<ApiResponse<Vec<Comment>>, AppError> {
        let mut conn = get_conn!(state);
        let mut post = load_post(&post_id, &mut conn).await?;
        let author = caller_snapshot(&session, &mut conn).await?;

        let comment_id = state.snowflake.generate();
        post.add_comment(Comment {
            comment_id: comment_id.to_string(),
            user_id: session.user_id,
            display_name: author.display_name,
            avatar_url: author.avatar_url,
            content: payload.text,
            created_at: SnowflakeGenerator::parse(comment_id).0,
        });
        db::update_comments(&post, &mut conn).await?;

        Ok(response(
            post.into_public(&state.config).comments,
            StatusCode::OK,
        ))
    }
}

mod remove_comment {
    use axum::extract::Path;

    use super::*;

    #[derive(Debug, Serialize)]
    pub struct Returns {
        pub msg: &'static str,
    }

    pub async fn handler(
        session: AuthSession,
        State(state): State<ArcAppState>,
        Path((post_id, comment_id)): Path<(String, String)>,
    ) -> Result<ApiResponse<Returns>, AppError> {
        let mut conn = get_conn!(state);
        let mut post = load_post(&post_id, &mut conn).await?;

        post.remove_comment(&comment_id, &session.user_id)?;
        db::update_comments(&post, &mut conn).await?;

        Ok(response(
            Returns {
                msg: "Comment removed",
            },
            StatusCode::OK,
        ))
    }
}

pub fn router() -> Router<ArcAppState> {
    Router::new()
        .route("/", post(create::handler).get(list::handler))
        .route("/{post_id}", get(get_one::handler).delete(remove::handler))
        .route("/like/{post_id}", put(like::handler))
        .route("/unlike/{post_id}", put(unlike::handler))
        .route("/comment/{post_id}", post(add_comment::handler))
        .route(
            "/comment/{post_id}/{comment_id}",
            delete(remove_comment::handler),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn malformed_post_id_reads_as_not_found() {
        assert_eq!(check_post_id("not-a-snowflake"), Err(FuncError::PostNotFound));
        assert_eq!(check_post_id("-5"), Err(FuncError::PostNotFound));
        assert!(check_post_id("184467440737095516").is_ok());
    }

    #[test]
    fn empty_text_fails_validation() {
        let payload = create::Payload {
            text: String::new(),
        };
        assert!(payload.validate().is_err());

        let payload = create::Payload {
            text: "hello".to_string(),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn empty_comment_fails_validation() {
        let payload = add_comment::Payload {
            text: "   ".to_string(),
        };
        // whitespace is still content; only truly empty text is refused
        assert!(payload.validate().is_ok());

        let payload = add_comment::Payload {
            text: String::new(),
        };
        assert!(payload.validate().is_err());
    }
}
