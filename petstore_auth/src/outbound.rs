/// UserRepository on top of sqlite
pub mod sqlite_user_repo;
