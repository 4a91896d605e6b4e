pub mod conn;
pub mod posts;
pub mod users;
