//! What a public profile page shows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    errors::Result,
    identity::{AuthContext, normalize_handle},
    store::DocumentStore,
    types::{Collection, DocumentRef, Snippet, User},
};

/// State of the follow button for a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowControl {
    /// Anonymous viewer: following starts with a sign-in prompt.
    SignInRequired,
    /// The viewer owns the profile.
    Hidden,
    Follow,
    Unfollow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub handle: String,
    pub heading: String,
    pub avatar: Option<String>,
    pub premium: bool,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub joined: String,
    pub follow_control: FollowControl,
    pub public_snippets: Vec<Snippet>,
    pub favorite_snippets: Vec<Snippet>,
}

impl Profile {
    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    pub fn following_count(&self) -> usize {
        self.following.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileView {
    Found(Box<Profile>),
    NotFound { handle: String },
}

impl ProfileView {
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            ProfileView::Found(profile) => Some(profile),
            ProfileView::NotFound { .. } => None,
        }
    }
}

/// First two words of the display name, or the handle without one.
pub fn heading(user: &User) -> String {
    match user.display_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.split_whitespace().take(2).collect::<Vec<_>>().join(" "),
        _ => user.pseudo.clone(),
    }
}

pub fn follow_control(viewer: &AuthContext, viewer_doc: Option<&User>, handle: &str) -> FollowControl {
    match viewer.handle() {
        None => FollowControl::SignInRequired,
        Some(own) if own == handle => FollowControl::Hidden,
        Some(_) if viewer_doc.is_some_and(|user| user.is_following(handle)) => FollowControl::Unfollow,
        Some(_) => FollowControl::Follow,
    }
}

/// Relative description of `then` seen from `now`, e.g. "3 days ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let span = describe_span(seconds.unsigned_abs());
    if seconds >= 0 {
        format!("{span} ago")
    } else {
        format!("in {span}")
    }
}

fn describe_span(seconds: u64) -> String {
    let round = |value: u64, unit: u64| (value + unit / 2) / unit;
    let minutes = round(seconds, 60);
    let hours = round(seconds, 3_600);
    let days = round(seconds, 86_400);
    let months = (days as f64 / 30.4375).round() as u64;
    let years = (days as f64 / 365.25).round() as u64;

    if seconds < 45 {
        "a few seconds".to_string()
    } else if minutes <= 1 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{minutes} minutes")
    } else if hours <= 1 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{hours} hours")
    } else if days <= 1 {
        "a day".to_string()
    } else if days < 26 {
        format!("{days} days")
    } else if months <= 1 {
        "a month".to_string()
    } else if months < 11 {
        format!("{months} months")
    } else if years <= 1 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

/// Builds the profile of `handle` as `viewer` sees it.
pub async fn load_profile<S>(store: &S, viewer: &AuthContext, handle: &str, now: DateTime<Utc>) -> Result<ProfileView>
where
    S: DocumentStore,
{
    let handle = normalize_handle(handle);
    let Some(document) = store.get(&DocumentRef::user(&handle)).await? else {
        return Ok(ProfileView::NotFound { handle });
    };
    let user = User::from_document(document)?;

    let viewer_doc = match viewer.handle() {
        Some(own) if own != handle => store
            .get(&DocumentRef::user(own))
            .await?
            .map(User::from_document)
            .transpose()?,
        _ => None,
    };

    let mut public_snippets = Vec::new();
    let mut favorite_snippets = Vec::new();
    for document in store.list(Collection::Snippets).await? {
        let snippet = Snippet::from_document(document)?;
        if snippet.is_favorite_of(&handle) {
            favorite_snippets.push(snippet.clone());
        }
        if snippet.id_author == handle && !snippet.is_private {
            public_snippets.push(snippet);
        }
    }

    Ok(ProfileView::Found(Box::new(Profile {
        heading: heading(&user),
        avatar: user.photo_url.clone(),
        premium: user.premium,
        joined: relative_time(user.created_at, now),
        created_at: user.created_at,
        follow_control: follow_control(viewer, viewer_doc.as_ref(), &handle),
        followers: user.followers,
        following: user.following,
        public_snippets,
        favorite_snippets,
        handle,
    })))
}
