use super::support::*;

#[tokio::test]
async fn favorite_flips_once_per_call() {
    let store = two_users().await;
    seed_snippet(&store, &snippet("s1", "bob")).await;

    let outcome = sharuco::toggle_favorite(&store, "alice", "s1").await.unwrap();
    assert_eq!(outcome.state, Toggled::Added);
    assert_eq!(load_snippet(&store, "s1").await.favoris, vec!["alice".to_string()]);

    let outcome = sharuco::toggle_favorite(&store, "alice", "s1").await.unwrap();
    assert_eq!(outcome.state, Toggled::Removed);
    assert!(load_snippet(&store, "s1").await.favoris.is_empty());
}

#[tokio::test]
async fn favorite_only_touches_the_snippet() {
    let store = two_users().await;
    seed_snippet(&store, &snippet("s1", "bob")).await;
    let writes_before = store.write_count().await;

    sharuco::toggle_favorite(&store, "alice", "s1").await.unwrap();

    assert_eq!(store.write_count().await, writes_before + 1);
    assert_eq!(load_user(&store, "alice").await, user("alice"));
}

#[tokio::test]
async fn duplicated_favoris_are_collapsed() {
    let store = MemoryStore::new();
    let mut shared = snippet("s1", "bob");
    shared.favoris = vec!["carol".to_string(), "alice".to_string(), "carol".to_string()];
    seed_snippet(&store, &shared).await;

    // carol is present, so the toggle removes every copy.
    let outcome = sharuco::toggle_favorite(&store, "carol", "s1").await.unwrap();
    assert_eq!(outcome.state, Toggled::Removed);
    assert_eq!(outcome.favoris, vec!["alice".to_string()]);

    let outcome = sharuco::toggle_favorite(&store, "carol", "s1").await.unwrap();
    assert_eq!(outcome.state, Toggled::Added);
    assert_eq!(outcome.favoris, vec!["alice".to_string(), "carol".to_string()]);
}

#[tokio::test]
async fn favoriting_a_missing_snippet_is_not_found() {
    let store = two_users().await;
    let err = sharuco::toggle_favorite(&store, "alice", "nope").await.unwrap_err();
    match err {
        SharucoError::NotFound { document } => {
            assert_eq!(document.collection, Collection::Snippets);
            assert_eq!(document.id, "nope");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn client_favorites_as_signed_in_user() {
    let store = two_users().await;
    seed_snippet(&store, &snippet("s1", "bob")).await;
    let client = Client::new(store.clone());

    let err = client
        .toggle_favorite(&AuthContext::anonymous(), "s1")
        .await
        .unwrap_err();
    assert!(matches!(err, SharucoError::Unauthenticated));

    let mut changes = client.subscribe(DocumentRef::snippet("s1"));
    client
        .toggle_favorite(&AuthContext::signed_in("bob"), "s1")
        .await
        .unwrap();
    let change = changes.recv().await.expect("change");
    assert_eq!(change.attributes["favoris"], serde_json::json!(["bob"]));
    assert!(client.snippet("s1").await.unwrap().unwrap().is_favorite_of("bob"));
}
