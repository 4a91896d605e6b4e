use tokio_postgres::Row;

use crate::{
    database::conn::{LazyConn, ResultError},
    entities::user::User,
};

// avatar_url is the bare storage key, exactly as the identity
// service wrote it; snapshots copy it unchanged.
fn row_to_user(row: Row) -> User {
    User {
        user_id: row.get("user_id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        avatar_url: row.get("avatar_url"),
    }
}

/// Minimal user projection for author snapshots. The users table is
/// maintained by the identity service; we only ever read it.
pub async fn get_min_user(user_id: &str, conn: &mut LazyConn) -> Result<Option<User>, ResultError> {
    let db = conn.get_client().await?;
    let sql = "
        SELECT user_id, username, display_name, avatar_url
        FROM users
        WHERE user_id = $1
    ";
    let row = db.query_opt(sql, &[&user_id]).await?;
    Ok(row.map(row_to_user))
}
