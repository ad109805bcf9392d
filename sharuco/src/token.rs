//! Personal access token gate.
//!
//! The token lets the web app create gists on the user's behalf. It is stored
//! as-is: no format check, no round trip to GitHub.

use std::fmt;

use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    errors::{Result, ValidationError, ValidationResult},
    identity::AuthContext,
    store::{DocumentStore, get_or_error, patch},
    types::{AccessToken, DocumentRef, User},
};

pub const TOKEN_FIELD: &str = "personalAccessToken";

pub const TOKEN_REQUIRED_MESSAGE: &str = "You must enter a token";

pub const TOKEN_SAVED_MESSAGE: &str = "Your personal access token has been added / updated";

/// The token form as submitted.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenForm {
    #[serde(default)]
    pub personal_access_token: Option<String>,
}

impl fmt::Debug for TokenForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.personal_access_token.as_ref().map(|_| "<redacted>");
        f.debug_struct("TokenForm").field("personal_access_token", &shown).finish()
    }
}

impl TokenForm {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            personal_access_token: Some(value.into()),
        }
    }

    /// Surrounding whitespace is dropped; nothing else is checked.
    pub fn validate(&self) -> ValidationResult<AccessToken> {
        match self.personal_access_token.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Ok(AccessToken::new(value)),
            _ => Err(ValidationError::single(TOKEN_FIELD, "required", TOKEN_REQUIRED_MESSAGE)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenUpdate {
    Added,
    Updated,
}

/// Validates the form and overwrites the signed-in user's token.
pub async fn update_token<S>(store: &S, ctx: &AuthContext, form: &TokenForm) -> Result<TokenUpdate>
where
    S: DocumentStore,
{
    let token = form.validate()?;
    let handle = ctx.require()?;

    let user_ref = DocumentRef::user(handle);
    let user = User::from_document(get_or_error(store, &user_ref).await?)?;
    let outcome = if user.personal_access_token.is_some() {
        TokenUpdate::Updated
    } else {
        TokenUpdate::Added
    };

    store
        .update(&user_ref, patch(TOKEN_FIELD, Value::String(token.expose().to_string())))
        .await?;
    info!("personal access token {} for {handle}", match outcome {
        TokenUpdate::Added => "added",
        TokenUpdate::Updated => "replaced",
    });
    Ok(outcome)
}

/// Whether the signed-in user already stored a token.
pub async fn has_token<S>(store: &S, ctx: &AuthContext) -> Result<bool>
where
    S: DocumentStore,
{
    let handle = ctx.require()?;
    let user = User::from_document(get_or_error(store, &DocumentRef::user(handle)).await?)?;
    Ok(user.personal_access_token.is_some())
}
