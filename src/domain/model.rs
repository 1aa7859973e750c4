use sqlx::FromRow;

#[derive(FromRow)]
pub struct DbInviter {
    pub user_id: i64,
    pub(crate) username: Option<String>,
}
