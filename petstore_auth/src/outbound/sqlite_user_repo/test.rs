use cool_asserts::assert_matches;
use petstore_db_migrator::PETSTORE_DB_MIGRATIONS;
use sqlx::{Pool, Sqlite};

use super::*;

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        first_name: "Marta".to_string(),
        last_name: "Lopez".to_string(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: "hash-marta".to_string(),
        role: Role::User,
    }
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("users"))
)]
async fn test_find_by_username(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let repo = SqliteUserRepository::new(pool);

    let admin = repo
        .find_by_username("admin".to_string())
        .await?
        .expect("admin is in the fixture");
    assert_eq!(admin.id, 1);
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.email, "admin@petstore.com");

    assert!(repo.find_by_username("ghost".to_string()).await?.is_none());

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("users"))
)]
async fn test_insert_user(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let repo = SqliteUserRepository::new(pool);

    let marta = repo
        .insert_user(new_user("marta", "marta@petstore.com"))
        .await?;
    assert_eq!(marta.id, 3);
    assert_eq!(marta.role, Role::User);
    assert_eq!(repo.count_users().await?, 3);

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("users"))
)]
async fn test_duplicates_are_conflicts(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let repo = SqliteUserRepository::new(pool);

    assert_matches!(
        repo.insert_user(new_user("admin", "marta@petstore.com")).await,
        Err(AuthError::UsernameTaken)
    );
    assert_matches!(
        repo.insert_user(new_user("marta", "user@petstore.com")).await,
        Err(AuthError::EmailTaken)
    );
    assert_eq!(repo.count_users().await?, 2);

    Ok(())
}

#[sqlx::test(migrator = "PETSTORE_DB_MIGRATIONS")]
async fn test_count_on_empty_table(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let repo = SqliteUserRepository::new(pool);
    assert_eq!(repo.count_users().await?, 0);

    Ok(())
}
