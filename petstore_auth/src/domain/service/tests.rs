use cool_asserts::assert_matches;
use mockall::predicate::eq;

use crate::domain::ports::MockUserRepository;

use super::*;

fn issuer() -> TokenIssuer {
    TokenIssuer::new("service-test-secret", 600)
}

fn stored_user(password: &str) -> User {
    User {
        id: 7,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john@petstore.com".to_string(),
        username: "john".to_string(),
        password_hash: Passwords::default().hash(password).unwrap(),
        role: Role::User,
    }
}

fn registration() -> Registration {
    Registration {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john@petstore.com".to_string(),
        username: "john".to_string(),
        password: "secret1".to_string(),
    }
}

#[tokio::test]
async fn register_stores_a_hashed_regular_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert_user()
        .withf(|user| {
            user.username == "john"
                && user.role == Role::User
                && user.password_hash != "secret1"
                && Passwords::default()
                    .verify("secret1", &user.password_hash)
                    .unwrap()
        })
        .times(1)
        .returning(|user| {
            Box::pin(async move {
                Ok(User {
                    id: 7,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    username: user.username,
                    password_hash: user.password_hash,
                    role: user.role,
                })
            })
        });

    let service = AuthServiceImpl::new(repo, issuer());
    let token = service.register(registration()).await.unwrap();

    assert_eq!(token.expires_in, 600);
    let claims = service.tokens().validate(&token.token).unwrap();
    assert_eq!(claims.sub, "john");
    assert_eq!(claims.id, 7);
    assert_eq!(claims.role, Role::User);
}

#[tokio::test]
async fn register_validates_before_storing() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert_user().never();

    let err = AuthServiceImpl::new(repo, issuer())
        .register(Registration {
            password: "123".to_string(),
            ..registration()
        })
        .await
        .unwrap_err();

    assert_matches!(err, AuthError::ValidationFailed(errors) => {
        assert_eq!(errors.get("password"), Some("password must be at least 6 characters"));
    });
}

#[tokio::test]
async fn register_passes_conflicts_through() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert_user()
        .times(1)
        .returning(|_| Box::pin(async { Err(AuthError::UsernameTaken) }));

    let err = AuthServiceImpl::new(repo, issuer())
        .register(registration())
        .await
        .unwrap_err();

    assert_matches!(err, AuthError::UsernameTaken);
}

#[tokio::test]
async fn login_issues_a_token_for_the_right_password() {
    let user = stored_user("secret1");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .with(eq("john".to_string()))
        .times(1)
        .returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });

    let service = AuthServiceImpl::new(repo, issuer());
    let token = service
        .login(Credentials {
            username: "john".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(service.tokens().extract_username(&token.token).unwrap(), "john");
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let user = stored_user("secret1");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });

    let err = AuthServiceImpl::new(repo, issuer())
        .login(Credentials {
            username: "john".to_string(),
            password: "secret2".to_string(),
        })
        .await
        .unwrap_err();

    assert_matches!(err, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn login_of_an_unknown_user_looks_like_a_wrong_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .returning(|_| Box::pin(async { Ok(None) }));

    let err = AuthServiceImpl::new(repo, issuer())
        .login(Credentials {
            username: "ghost".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();

    assert_matches!(err, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn authenticate_resolves_the_subject() {
    let user = stored_user("secret1");
    let token = issuer().issue(&user).unwrap();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .with(eq("john".to_string()))
        .times(1)
        .returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });

    let authenticated = AuthServiceImpl::new(repo, issuer())
        .authenticate(&token)
        .await
        .unwrap();

    assert_eq!(
        authenticated,
        AuthenticatedUser {
            id: 7,
            username: "john".to_string(),
            role: Role::User,
        }
    );
}

#[tokio::test]
async fn authenticate_rejects_deleted_subjects() {
    let token = issuer().issue(&stored_user("secret1")).unwrap();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .returning(|_| Box::pin(async { Ok(None) }));

    let err = AuthServiceImpl::new(repo, issuer())
        .authenticate(&token)
        .await
        .unwrap_err();

    assert_matches!(err, AuthError::InvalidToken(_));
}

#[tokio::test]
async fn authenticate_does_not_look_up_bad_tokens() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().never();

    let err = AuthServiceImpl::new(repo, issuer())
        .authenticate("garbage")
        .await
        .unwrap_err();

    assert_matches!(err, AuthError::InvalidToken(_));
}

#[tokio::test]
async fn seeding_creates_admin_and_user_on_an_empty_table() {
    let mut repo = MockUserRepository::new();
    repo.expect_count_users()
        .times(1)
        .returning(|| Box::pin(async { Ok(0) }));
    repo.expect_insert_user()
        .withf(|user| user.username == "admin" && user.role == Role::Admin)
        .times(1)
        .returning(|_| Box::pin(async { Ok(stored_user("admin123")) }));
    repo.expect_insert_user()
        .withf(|user| user.username == "user" && user.role == Role::User)
        .times(1)
        .returning(|_| Box::pin(async { Ok(stored_user("user123")) }));

    let created = AuthServiceImpl::new(repo, issuer())
        .seed_default_users()
        .await
        .unwrap();

    assert_eq!(created, 2);
}

#[tokio::test]
async fn seeding_leaves_existing_users_alone() {
    let mut repo = MockUserRepository::new();
    repo.expect_count_users()
        .times(1)
        .returning(|| Box::pin(async { Ok(3) }));
    repo.expect_insert_user().never();

    let created = AuthServiceImpl::new(repo, issuer())
        .seed_default_users()
        .await
        .unwrap();

    assert_eq!(created, 0);
}
