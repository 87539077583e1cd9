use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::types::{EmailAddress, Username};
use crate::forms::FormError;

/// Body accepted by the open registration endpoint. The password is
/// write-only: it is hashed before storage and never echoed back.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterPayload {
    pub username: Username,
    pub password: String,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = FormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
            email: EmailAddress::new(value.email)?,
            first_name: value.first_name.unwrap_or_default(),
            last_name: value.last_name.unwrap_or_default(),
        })
    }
}

/// Body accepted by the token issuance endpoint. Malformed credentials are
/// indistinguishable from wrong ones: both come back 401.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

/// Body accepted by the token refresh endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshForm {
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_names_default_to_empty() {
        let form = RegisterForm {
            username: "maria".to_string(),
            password: "correct horse".to_string(),
            email: "maria@example.com".to_string(),
            first_name: None,
            last_name: None,
        };

        let payload: RegisterPayload = form.try_into().unwrap();
        assert_eq!(payload.first_name, "");
        assert_eq!(payload.last_name, "");
    }

    #[test]
    fn rejects_short_passwords_and_bad_emails() {
        let form = RegisterForm {
            username: "maria".to_string(),
            password: "short".to_string(),
            email: "maria@example.com".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(matches!(
            RegisterPayload::try_from(form),
            Err(FormError::Validation(_))
        ));

        let form = RegisterForm {
            username: "maria".to_string(),
            password: "correct horse".to_string(),
            email: "not-an-email".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(matches!(
            RegisterPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }
}
