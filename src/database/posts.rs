use tokio_postgres::Row;
use tokio_postgres::types::Json;

use crate::{
    database::conn::{LazyConn, ResultError},
    entities::post::{Comment, Like, Post},
};

static POST_SQL: &str = "
    SELECT post_id, user_id, display_name, avatar_url, content,
           likes, comments,
           EXTRACT(EPOCH FROM created_at)::double precision AS created_at
    FROM posts
";

// Avatars stay as bare storage keys in rows and in memory;
// Post::into_public expands them at the response edge.
fn row_to_post(row: Row) -> Post {
    let Json(likes): Json<Vec<Like>> = row.get("likes");
    let Json(comments): Json<Vec<Comment>> = row.get("comments");
    Post {
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        display_name: row.get("display_name"),
        avatar_url: row.get("avatar_url"),
        content: row.get("content"),
        likes,
        comments,
        created_at: row.get("created_at"),
    }
}

pub async fn insert_post(post: &Post, conn: &mut LazyConn) -> Result<(), ResultError> {
    let db = conn.get_client().await?;
    db.execute(
        "
        INSERT INTO posts
            (post_id, user_id, display_name, avatar_url, content,
             likes, comments, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, to_timestamp($8))
        ",
        &[
            &post.post_id,
            &post.user_id,
            &post.display_name,
            &post.avatar_url,
            &post.content,
            &Json(&post.likes),
            &Json(&post.comments),
            &post.created_at,
        ],
    )
    .await?;
    Ok(())
}

pub async fn get_post(post_id: &str, conn: &mut LazyConn) -> Result<Option<Post>, ResultError> {
    let db = conn.get_client().await?;
    let sql = format!("{} WHERE post_id = $1", POST_SQL);
    let row = db.query_opt(&sql, &[&post_id]).await?;
    Ok(row.map(row_to_post))
}

/// All posts, newest first.
pub async fn list_posts(conn: &mut LazyConn) -> Result<Vec<Post>, ResultError> {
    let db = conn.get_client().await?;
    let sql = format!("{} ORDER BY created_at DESC", POST_SQL);
    let rows = db.query(&sql, &[]).await?;
    Ok(rows.into_iter().map(row_to_post).collect())
}

// Whole-array writes: the row read earlier wins over anyone who wrote
// in between. Accepted trade-off, same as the embedded-document model.
pub async fn update_likes(post: &Post, conn: &mut LazyConn) -> Result<(), ResultError> {
    let db = conn.get_client().await?;
    db.execute(
        "UPDATE posts SET likes = $2 WHERE post_id = $1",
        &[&post.post_id, &Json(&post.likes)],
    )
    .await?;
    Ok(())
}

pub async fn update_comments(post: &Post, conn: &mut LazyConn) -> Result<(), ResultError> {
    let db = conn.get_client().await?;
    db.execute(
        "UPDATE posts SET comments = $2 WHERE post_id = $1",
        &[&post.post_id, &Json(&post.comments)],
    )
    .await?;
    Ok(())
}

/// Returns false when the post was already gone.
pub async fn delete_post(post_id: &str, conn: &mut LazyConn) -> Result<bool, ResultError> {
    let db = conn.get_client().await?;
    let affected = db
        .execute("DELETE FROM posts WHERE post_id = $1", &[&post_id])
        .await?;
    Ok(affected > 0)
}
