//! Sharuco social core.
//!
//! Follow/unfollow and favorite toggles, the personal access token gate, and
//! the profile view model, all written against a pluggable document store.

pub mod client;
pub mod errors;
pub mod id;
pub mod identity;
pub mod keys;
pub mod notify;
pub mod profile;
pub mod social;
pub mod store;
pub mod subscription;
pub mod token;
pub mod types;

pub use client::{Client, SignInProfile, SnippetDraft};
pub use errors::*;
pub use identity::AuthContext;
pub use notify::{LogNotifier, Notice, NoticeLevel, Notifier};
pub use profile::{FollowControl, Profile, ProfileView};
pub use social::{FavoriteToggle, RelationToggle, Toggled, toggle_favorite, toggle_relation};
pub use store::{DocumentStore, MemoryStore, RedisStore};
pub use subscription::{ChangeKind, DocumentChange, Subscription, SubscriptionHub};
pub use token::{TokenForm, TokenUpdate};
pub use types::{AccessToken, Collection, Document, DocumentRef, RelationPair, Snippet, User};

// Re-export redis types so users don't need to depend on a specific redis version
pub use redis;
pub use redis::aio::ConnectionManager;
