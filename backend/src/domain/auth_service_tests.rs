//! Tests for the authentication service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockGoogleIdentity, MockPasswordHasher, MockTokenCodec, MockUserRepository,
};
use crate::domain::{AccessToken, Email, ErrorCode};

fn user(email: &str, username: &str, hash: Option<&str>) -> User {
    let now = Utc::now();
    User {
        id: UserId::random(),
        email: Email::new(email).expect("valid email"),
        username: Username::new(username).expect("valid username"),
        role: Role::User,
        password_hash: hash.map(str::to_owned),
        google_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn persisted(new_user: &NewUser) -> User {
    let now = Utc::now();
    User {
        id: UserId::random(),
        email: new_user.email.clone(),
        username: new_user.username.clone(),
        role: new_user.role,
        password_hash: new_user.password_hash.clone(),
        google_id: new_user.google_id.clone(),
        created_at: now,
        updated_at: now,
    }
}

struct Doubles {
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenCodec,
    google: MockGoogleIdentity,
}

#[fixture]
fn doubles() -> Doubles {
    Doubles {
        users: MockUserRepository::new(),
        hasher: MockPasswordHasher::new(),
        tokens: MockTokenCodec::new(),
        google: MockGoogleIdentity::new(),
    }
}

fn service(doubles: Doubles) -> AuthServiceImpl<MockUserRepository> {
    AuthServiceImpl::new(
        Arc::new(doubles.users),
        Arc::new(doubles.hasher),
        Arc::new(doubles.tokens),
        Arc::new(doubles.google),
    )
}

fn expect_token(tokens: &mut MockTokenCodec) {
    tokens
        .expect_issue()
        .returning(|_| Ok(AccessToken::new("signed.jwt.token")));
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_creates_user(mut doubles: Doubles) {
    doubles.users.expect_find_by_email().returning(|_| Ok(None));
    doubles.users.expect_find_by_username().returning(|_| Ok(None));
    doubles
        .hasher
        .expect_hash()
        .withf(|password| password == "secret1")
        .returning(|_| Ok("$argon2id$hash".to_owned()));
    doubles
        .users
        .expect_create()
        .withf(|new_user| {
            new_user.password_hash.as_deref() == Some("$argon2id$hash")
                && new_user.role == Role::User
        })
        .returning(|new_user| Ok(persisted(new_user)));

    let registration =
        Registration::try_from_parts("rider", "Rider@Example.com", "secret1").expect("valid");
    let created = service(doubles)
        .register(&registration)
        .await
        .expect("registration succeeds");
    assert_eq!(created.email.as_ref(), "rider@example.com");
}

#[rstest]
#[tokio::test]
async fn register_rejects_existing_email(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_email()
        .returning(|_| Ok(Some(user("rider@example.com", "rider", None))));
    doubles.users.expect_find_by_username().returning(|_| Ok(None));
    doubles.hasher.expect_hash().never();

    let registration =
        Registration::try_from_parts("other", "rider@example.com", "secret1").expect("valid");
    let err = service(doubles)
        .register(&registration)
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("code")),
        Some(&json!("user_exists"))
    );
}

#[rstest]
#[tokio::test]
async fn register_race_on_insert_reports_user_exists(mut doubles: Doubles) {
    doubles.users.expect_find_by_email().returning(|_| Ok(None));
    doubles.users.expect_find_by_username().returning(|_| Ok(None));
    doubles
        .hasher
        .expect_hash()
        .returning(|_| Ok("$argon2id$hash".to_owned()));
    doubles
        .users
        .expect_create()
        .returning(|_| Err(UserPersistenceError::conflict("users_email_key")));

    let registration =
        Registration::try_from_parts("rider", "rider@example.com", "secret1").expect("valid");
    let err = service(doubles)
        .register(&registration)
        .await
        .expect_err("insert lost the race");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("code")),
        Some(&json!("user_exists"))
    );
}

#[rstest]
#[tokio::test]
async fn login_issues_token_for_matching_password(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_email()
        .returning(|_| Ok(Some(user("admin@example.com", "adminUser", Some("hash")))));
    doubles.hasher.expect_verify().returning(|_, _| Ok(true));
    expect_token(&mut doubles.tokens);

    let creds = LoginCredentials::try_from_parts("admin@example.com", "admin123").expect("valid");
    let signed = service(doubles).login(&creds).await.expect("login succeeds");
    assert_eq!(signed.token.bearer(), "Bearer signed.jwt.token");
    assert_eq!(signed.user.username.as_ref(), "adminUser");
}

#[rstest]
#[case::unknown_email(None, true)]
#[case::wrong_password(Some("hash"), false)]
#[case::google_only_account(None, false)]
#[tokio::test]
async fn login_failures_share_one_message(
    mut doubles: Doubles,
    #[case] hash: Option<&'static str>,
    #[case] unknown: bool,
) {
    doubles.users.expect_find_by_email().returning(move |_| {
        Ok((!unknown).then(|| user("admin@example.com", "adminUser", hash)))
    });
    doubles.hasher.expect_verify().returning(|_, _| Ok(false));
    doubles.tokens.expect_issue().never();

    let creds = LoginCredentials::try_from_parts("admin@example.com", "nope").expect("valid");
    let err = service(doubles).login(&creds).await.expect_err("login fails");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[case(TokenError::expired())]
#[case(TokenError::invalid("bad signature"))]
fn authenticate_maps_token_failures_to_forbidden(mut doubles: Doubles, #[case] error: TokenError) {
    doubles
        .tokens
        .expect_verify()
        .return_once(move |_| Err(error));
    let err = service(doubles)
        .authenticate("abc")
        .expect_err("rejected token");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn repository_connection_failure_is_service_unavailable(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_id()
        .returning(|_| Err(UserPersistenceError::connection("refused")));
    let err = service(doubles)
        .current_user(UserId::random())
        .await
        .expect_err("connection failure");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

fn google_profile() -> GoogleProfile {
    GoogleProfile {
        google_id: "g-123".into(),
        email: Email::new("ada@example.com").expect("valid email"),
        display_name: Some("Ada Lovelace".into()),
    }
}

#[rstest]
#[tokio::test]
async fn google_sign_in_links_existing_email(mut doubles: Doubles) {
    doubles
        .google
        .expect_exchange()
        .returning(|_, _| Ok(google_profile()));
    doubles.users.expect_find_by_google_id().returning(|_| Ok(None));
    let existing = user("ada@example.com", "ada", Some("hash"));
    let existing_id = existing.id;
    let returned = existing.clone();
    doubles
        .users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(existing)));
    doubles
        .users
        .expect_link_google_id()
        .withf(move |id, google_id| *id == existing_id && google_id == "g-123")
        .return_once(move |_, google_id| {
            let mut linked = returned;
            linked.google_id = Some(google_id.to_owned());
            Ok(Some(linked))
        });
    doubles.users.expect_create().never();
    expect_token(&mut doubles.tokens);

    let signed = service(doubles)
        .google_sign_in("code", "verifier")
        .await
        .expect("sign in succeeds");
    assert_eq!(signed.user.google_id.as_deref(), Some("g-123"));
}

#[rstest]
#[tokio::test]
async fn google_sign_in_creates_user_with_free_username(mut doubles: Doubles) {
    doubles
        .google
        .expect_exchange()
        .returning(|_, _| Ok(google_profile()));
    doubles.users.expect_find_by_google_id().returning(|_| Ok(None));
    doubles.users.expect_find_by_email().returning(|_| Ok(None));
    doubles.users.expect_find_by_username().returning(|name| {
        Ok((name.as_ref() == "Ada_Lovelace").then(|| user("x@example.com", "Ada_Lovelace", None)))
    });
    doubles
        .users
        .expect_create()
        .withf(|new_user| {
            new_user.username.as_ref() == "Ada_Lovelace_1" && new_user.password_hash.is_none()
        })
        .returning(|new_user| Ok(persisted(new_user)));
    expect_token(&mut doubles.tokens);

    let signed = service(doubles)
        .google_sign_in("code", "verifier")
        .await
        .expect("sign in succeeds");
    assert_eq!(signed.user.username.as_ref(), "Ada_Lovelace_1");
}

#[rstest]
fn google_not_configured_is_service_unavailable(mut doubles: Doubles) {
    doubles
        .google
        .expect_authorize()
        .returning(|| Err(GoogleIdentityError::not_configured()));
    let err = service(doubles)
        .google_authorization()
        .expect_err("not configured");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
