#[macro_export]
macro_rules! get_conn {
    ($state:expr) => {
        $crate::database::conn::LazyConn::new($state.db_pool.clone())
    };
}
