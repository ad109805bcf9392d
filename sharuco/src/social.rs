//! Follow and favorite toggles.
//!
//! Lists are treated as ordered sets: membership is added at the end, removal
//! drops every occurrence. A follow toggle writes both users concurrently and
//! reports [`SharucoError::PartialFailure`] when only one side lands.

use log::{info, warn};
use serde_json::Value;

use crate::{
    errors::{Result, SharucoError, ValidationError},
    store::{DocumentStore, get_or_error, patch},
    types::{DocumentRef, RelationPair, string_list},
};

/// Direction a toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

impl Toggled {
    pub fn is_added(self) -> bool {
        matches!(self, Toggled::Added)
    }
}

/// Outcome of [`toggle_relation`]: the new lists on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationToggle {
    pub state: Toggled,
    /// `pair.from` on the acting user.
    pub self_list: Vec<String>,
    /// `pair.to` on the target user.
    pub target_list: Vec<String>,
}

/// Outcome of [`toggle_favorite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub state: Toggled,
    pub favoris: Vec<String>,
}

/// Flips `target_id` in `self_id`'s `pair.from` list and mirrors the change on
/// `target_id`'s `pair.to` list.
///
/// Both documents are read before anything is written, so a missing document
/// aborts with `NotFound` and no writes. The target side is always set to
/// agree with the self side, which repairs a pair left asymmetric earlier.
pub async fn toggle_relation<S>(store: &S, self_id: &str, target_id: &str, pair: RelationPair) -> Result<RelationToggle>
where
    S: DocumentStore,
{
    require_id("selfId", self_id)?;
    require_id("targetId", target_id)?;
    if self_id == target_id {
        return Err(SharucoError::SelfRelation { id: self_id.to_string() });
    }

    let self_ref = DocumentRef::user(self_id);
    let target_ref = DocumentRef::user(target_id);
    let (self_doc, target_doc) = tokio::try_join!(get_or_error(store, &self_ref), get_or_error(store, &target_ref))?;

    let mut self_list = string_list(&self_doc, pair.from, &self_ref)?;
    let mut target_list = string_list(&target_doc, pair.to, &target_ref)?;

    let state = if contains(&self_list, target_id) {
        Toggled::Removed
    } else {
        Toggled::Added
    };
    set_member(&mut self_list, target_id, state.is_added());
    set_member(&mut target_list, self_id, state.is_added());

    let (self_write, target_write) = tokio::join!(
        store.update(&self_ref, patch(pair.from, to_value(&self_list))),
        store.update(&target_ref, patch(pair.to, to_value(&target_list))),
    );

    match (self_write, target_write) {
        (Ok(()), Ok(())) => {}
        (Ok(()), Err(err)) => return Err(partial_failure(self_ref, target_ref, err)),
        (Err(err), Ok(())) => return Err(partial_failure(target_ref, self_ref, err)),
        (Err(err), Err(_)) => return Err(err),
    }

    info!("{self_id} {} {target_id} ({}/{})", verb(state), pair.from, pair.to);
    Ok(RelationToggle {
        state,
        self_list,
        target_list,
    })
}

/// Flips `user_id` in a snippet's `favoris` list. Single write, no mirror.
pub async fn toggle_favorite<S>(store: &S, user_id: &str, snippet_id: &str) -> Result<FavoriteToggle>
where
    S: DocumentStore,
{
    require_id("userId", user_id)?;
    require_id("snippetId", snippet_id)?;

    let snippet_ref = DocumentRef::snippet(snippet_id);
    let snippet = get_or_error(store, &snippet_ref).await?;
    let mut favoris = string_list(&snippet, FAVORIS, &snippet_ref)?;

    let state = if contains(&favoris, user_id) {
        Toggled::Removed
    } else {
        Toggled::Added
    };
    set_member(&mut favoris, user_id, state.is_added());

    store.update(&snippet_ref, patch(FAVORIS, to_value(&favoris))).await?;
    info!("{user_id} {} snippet {snippet_id}", if state.is_added() { "favorited" } else { "unfavorited" });
    Ok(FavoriteToggle { state, favoris })
}

const FAVORIS: &str = "favoris";

fn require_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::single(field, "required", format!("{field} must not be empty")).into());
    }
    Ok(())
}

fn contains(list: &[String], id: &str) -> bool {
    list.iter().any(|member| member == id)
}

/// Makes `id` present exactly once, or absent.
fn set_member(list: &mut Vec<String>, id: &str, present: bool) {
    let mut seen = false;
    list.retain(|member| {
        if member != id {
            return true;
        }
        let keep = present && !seen;
        seen = true;
        keep
    });
    if present && !seen {
        list.push(id.to_string());
    }
}

fn to_value(list: &[String]) -> Value {
    Value::Array(list.iter().cloned().map(Value::String).collect())
}

fn partial_failure(written: DocumentRef, failed: DocumentRef, source: SharucoError) -> SharucoError {
    warn!("mirrored write left {written} updated and {failed} stale: {source}");
    SharucoError::PartialFailure {
        written,
        failed,
        source: Box::new(source),
    }
}

fn verb(state: Toggled) -> &'static str {
    match state {
        Toggled::Added => "linked to",
        Toggled::Removed => "unlinked from",
    }
}
