use axum::Router;

use crate::utils::state::ArcAppState;

pub mod posts;

pub fn create_router() -> Router<ArcAppState> {
    Router::new().nest("/posts", posts::router())
}
