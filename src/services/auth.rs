use chrono::Utc;

use crate::auth::{self, AuthConfig, TokenUse};
use crate::domain::customer::Customer;
use crate::domain::types::UserId;
use crate::domain::user::{NewUser, User};
use crate::forms::auth::{RefreshForm, RegisterPayload, TokenForm};
use crate::repository::errors::RepositoryError;
use crate::repository::{DeletedFilter, UserReader, UserWriter};
use crate::services::map_repo_err;

use super::{ServiceError, ServiceResult};

/// An issued token pair plus the identity summary returned with it.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Registers a new user account together with its customer profile. The
/// password is hashed before it ever reaches the repository.
pub fn register<R>(payload: RegisterPayload, repo: &R) -> ServiceResult<(User, Customer)>
where
    R: UserWriter,
{
    let password_hash = auth::hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let now = Utc::now().naive_utc();
    let new_user = NewUser {
        username: payload.username,
        password_hash,
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        created_at: now,
        updated_at: now,
    };

    match repo.create_user_with_customer(&new_user) {
        Ok(pair) => Ok(pair),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict {
            field: "username",
            message: "a user with that username already exists",
        }),
        Err(e) => Err(map_repo_err("Failed to register user", e)),
    }
}

/// Exchanges credentials for an access/refresh token pair. Unknown users and
/// wrong passwords are indistinguishable to the caller.
pub fn issue_tokens<R>(form: TokenForm, repo: &R, config: &AuthConfig) -> ServiceResult<IssuedTokens>
where
    R: UserReader,
{
    let (user, password_hash) = repo
        .get_user_with_credential(&form.username)
        .map_err(|e| map_repo_err("Failed to look up user", e))?
        .ok_or(ServiceError::Unauthorized)?;

    auth::verify_password(&form.password, &password_hash)
        .map_err(|_| ServiceError::Unauthorized)?;

    let access_token = auth::issue_access_token(&user, config).map_err(|e| {
        log::error!("Failed to issue access token: {e}");
        ServiceError::Internal
    })?;
    let refresh_token = auth::issue_refresh_token(&user, config).map_err(|e| {
        log::error!("Failed to issue refresh token: {e}");
        ServiceError::Internal
    })?;

    Ok(IssuedTokens {
        access_token,
        refresh_token,
        user,
    })
}

/// Exchanges a refresh token for a fresh access token. The account must
/// still exist and not be soft-deleted.
pub fn refresh_access_token<R>(
    form: RefreshForm,
    repo: &R,
    config: &AuthConfig,
) -> ServiceResult<String>
where
    R: UserReader,
{
    let claims = auth::decode_token(&form.refresh_token, TokenUse::Refresh, config)
        .map_err(|_| ServiceError::Unauthorized)?;

    let user_id = UserId::new(claims.sub).map_err(|_| ServiceError::Unauthorized)?;
    let user = repo
        .get_user_by_id(user_id, DeletedFilter::ActiveOnly)
        .map_err(|e| map_repo_err("Failed to look up user", e))?
        .ok_or(ServiceError::Unauthorized)?;

    auth::issue_access_token(&user, config).map_err(|e| {
        log::error!("Failed to issue access token: {e}");
        ServiceError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailAddress, Username};
    use crate::repository::test::TestRepository;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 7,
        }
    }

    fn register_payload(username: &str) -> RegisterPayload {
        RegisterPayload {
            username: Username::new(username).unwrap(),
            password: "correct horse battery".into(),
            email: EmailAddress::new("maria@example.com").unwrap(),
            first_name: "Maria".into(),
            last_name: "Silva".into(),
        }
    }

    #[test]
    fn registration_hashes_the_password_and_creates_a_profile() {
        let repo = TestRepository::new();

        let (user, customer) = register(register_payload("maria"), &repo).unwrap();
        assert_eq!(customer.user_id, user.id);

        let (_, stored_hash) = repo.get_user_with_credential("maria").unwrap().unwrap();
        assert_ne!(stored_hash, "correct horse battery");
        assert!(auth::verify_password("correct horse battery", &stored_hash).is_ok());
    }

    #[test]
    fn duplicate_usernames_are_conflicts() {
        let repo = TestRepository::new();

        register(register_payload("maria"), &repo).unwrap();
        assert!(matches!(
            register(register_payload("maria"), &repo),
            Err(ServiceError::Conflict {
                field: "username",
                ..
            })
        ));
    }

    #[test]
    fn token_issuance_succeeds_with_correct_credentials() {
        let repo = TestRepository::new();
        let config = test_config();
        register(register_payload("maria"), &repo).unwrap();

        let issued = issue_tokens(
            TokenForm {
                username: "maria".into(),
                password: "correct horse battery".into(),
            },
            &repo,
            &config,
        )
        .unwrap();

        assert_eq!(issued.user.username, "maria");
        let claims = auth::decode_token(&issued.access_token, TokenUse::Access, &config).unwrap();
        assert_eq!(claims.sub, issued.user.id.get());
    }

    #[test]
    fn token_issuance_fails_closed() {
        let repo = TestRepository::new();
        let config = test_config();
        register(register_payload("maria"), &repo).unwrap();

        let wrong_password = issue_tokens(
            TokenForm {
                username: "maria".into(),
                password: "wrong".into(),
            },
            &repo,
            &config,
        );
        assert!(matches!(wrong_password, Err(ServiceError::Unauthorized)));

        let unknown_user = issue_tokens(
            TokenForm {
                username: "nobody".into(),
                password: "whatever".into(),
            },
            &repo,
            &config,
        );
        assert!(matches!(unknown_user, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn refresh_exchanges_for_a_new_access_token() {
        let repo = TestRepository::new();
        let config = test_config();
        register(register_payload("maria"), &repo).unwrap();

        let issued = issue_tokens(
            TokenForm {
                username: "maria".into(),
                password: "correct horse battery".into(),
            },
            &repo,
            &config,
        )
        .unwrap();

        let access = refresh_access_token(
            RefreshForm {
                refresh_token: issued.refresh_token.clone(),
            },
            &repo,
            &config,
        )
        .unwrap();
        assert!(auth::decode_token(&access, TokenUse::Access, &config).is_ok());

        // An access token is not accepted where a refresh token is expected.
        let result = refresh_access_token(
            RefreshForm {
                refresh_token: issued.access_token,
            },
            &repo,
            &config,
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
