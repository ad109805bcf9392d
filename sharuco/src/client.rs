//! Entry point bundling a store, change subscriptions, and a notifier.
//!
//! # Example
//! ```ignore
//! let store = RedisStore::connect("redis://localhost:6379", "sharuco").await?;
//! let client = Client::new(store);
//!
//! let me = AuthContext::signed_in("ln-dev7");
//! client.toggle_follow(&me, "octocat").await?;
//! client.update_token(&me, &TokenForm::new("ghp_abc123")).await?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::{
    errors::{Result, SharucoError, ValidationError},
    id::generate_snippet_id,
    identity::{AuthContext, normalize_handle},
    notify::{LogNotifier, Notice, Notifier},
    profile::{ProfileView, load_profile},
    social::{self, FavoriteToggle, RelationToggle},
    store::{DocumentStore, get_or_error},
    subscription::{ObservedStore, Subscription, SubscriptionHub},
    token::{self, TOKEN_SAVED_MESSAGE, TokenForm, TokenUpdate},
    types::{DocumentRef, RelationPair, Snippet, User},
};

/// Profile attributes reported by the identity provider at sign-in.
#[derive(Debug, Clone, Default)]
pub struct SignInProfile {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// A snippet about to be published.
#[derive(Debug, Clone, Default)]
pub struct SnippetDraft {
    pub language: String,
    pub code: String,
    pub description: String,
    pub tags: Vec<String>,
    pub is_private: bool,
}

pub struct Client<S> {
    store: ObservedStore<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: DocumentStore> Client<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: ObservedStore::new(store, SubscriptionHub::new()),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The wrapped store. Writes made through it directly are not published.
    pub fn store(&self) -> &S {
        self.store.inner()
    }

    /// Subscribes to writes made through this client.
    pub fn subscribe(&self, document: DocumentRef) -> Subscription {
        self.store.hub().subscribe(document)
    }

    pub async fn user(&self, handle: &str) -> Result<Option<User>> {
        self.store
            .get(&DocumentRef::user(normalize_handle(handle)))
            .await?
            .map(User::from_document)
            .transpose()
    }

    pub async fn snippet(&self, id: &str) -> Result<Option<Snippet>> {
        self.store
            .get(&DocumentRef::snippet(id))
            .await?
            .map(Snippet::from_document)
            .transpose()
    }

    /// Creates the signed-in user's document on first sign-in, returns it either way.
    pub async fn register_user(&self, ctx: &AuthContext, profile: SignInProfile, now: DateTime<Utc>) -> Result<User> {
        let handle = ctx.require()?;
        let user_ref = DocumentRef::user(handle);
        let mut user = User::new(handle, now);
        user.display_name = profile.display_name;
        user.photo_url = profile.photo_url;

        if self.store.insert(&user_ref, user.to_document()?).await? {
            info!("registered {handle}");
            return Ok(user);
        }
        User::from_document(get_or_error(&self.store, &user_ref).await?)
    }

    /// Stores a new snippet authored by the signed-in user.
    pub async fn publish_snippet(&self, ctx: &AuthContext, draft: SnippetDraft) -> Result<Snippet> {
        let handle = ctx.require()?;
        if draft.code.trim().is_empty() {
            return Err(ValidationError::single("code", "required", "You must enter some code").into());
        }
        if draft.language.trim().is_empty() {
            return Err(ValidationError::single("language", "required", "You must choose a language").into());
        }

        let snippet = Snippet {
            id: generate_snippet_id(),
            id_author: handle.to_string(),
            language: draft.language.trim().to_lowercase(),
            code: draft.code,
            description: draft.description,
            tags: draft.tags,
            favoris: Vec::new(),
            is_private: draft.is_private,
            comments: Vec::new(),
        };
        let snippet_ref = DocumentRef::snippet(&snippet.id);
        if !self.store.insert(&snippet_ref, snippet.to_document()?).await? {
            return Err(SharucoError::Other {
                message: format!("snippet id collision on {snippet_ref}").into(),
            });
        }
        info!("{handle} published snippet {}", snippet.id);
        Ok(snippet)
    }

    /// Follows or unfollows `target` as the signed-in user.
    pub async fn toggle_follow(&self, ctx: &AuthContext, target: &str) -> Result<RelationToggle> {
        let handle = ctx.require()?;
        social::toggle_relation(&self.store, handle, &normalize_handle(target), RelationPair::FOLLOW).await
    }

    pub async fn toggle_relation(&self, self_id: &str, target_id: &str, pair: RelationPair) -> Result<RelationToggle> {
        social::toggle_relation(&self.store, self_id, target_id, pair).await
    }

    /// Favorites or unfavorites a snippet as the signed-in user.
    pub async fn toggle_favorite(&self, ctx: &AuthContext, snippet_id: &str) -> Result<FavoriteToggle> {
        let handle = ctx.require()?;
        social::toggle_favorite(&self.store, handle, snippet_id).await
    }

    /// Stores the personal access token, then acknowledges it through the notifier.
    pub async fn update_token(&self, ctx: &AuthContext, form: &TokenForm) -> Result<TokenUpdate> {
        let outcome = token::update_token(&self.store, ctx, form).await?;
        self.notifier.notify(Notice::success(TOKEN_SAVED_MESSAGE));
        Ok(outcome)
    }

    pub async fn has_token(&self, ctx: &AuthContext) -> Result<bool> {
        token::has_token(&self.store, ctx).await
    }

    pub async fn profile(&self, viewer: &AuthContext, handle: &str) -> Result<ProfileView> {
        self.profile_at(viewer, handle, Utc::now()).await
    }

    /// Like [`Client::profile`] with a fixed clock for the "joined" text.
    pub async fn profile_at(&self, viewer: &AuthContext, handle: &str, now: DateTime<Utc>) -> Result<ProfileView> {
        load_profile(&self.store, viewer, handle, now).await
    }
}
