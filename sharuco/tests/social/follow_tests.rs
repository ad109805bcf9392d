use super::support::*;

#[tokio::test]
async fn follow_then_unfollow_restores_both_users() {
    let store = two_users().await;

    let outcome = sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW)
        .await
        .expect("follow");
    assert_eq!(outcome.state, Toggled::Added);

    let alice = load_user(&store, "alice").await;
    let bob = load_user(&store, "bob").await;
    assert_eq!(alice.following, vec!["bob".to_string()]);
    assert_eq!(bob.followers, vec!["alice".to_string()]);
    assert!(alice.followers.is_empty());
    assert!(bob.following.is_empty());
    assert_symmetric(&alice, &bob);

    let outcome = sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW)
        .await
        .expect("unfollow");
    assert_eq!(outcome.state, Toggled::Removed);

    let alice = load_user(&store, "alice").await;
    let bob = load_user(&store, "bob").await;
    assert!(alice.following.is_empty());
    assert!(bob.followers.is_empty());
    assert_symmetric(&alice, &bob);
}

#[tokio::test]
async fn toggling_twice_keeps_unrelated_members() {
    let store = MemoryStore::new();
    let mut alice = user("alice");
    alice.following = vec!["carol".to_string()];
    let mut bob = user("bob");
    bob.followers = vec!["dave".to_string()];
    seed_user(&store, &alice).await;
    seed_user(&store, &bob).await;

    sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW).await.unwrap();
    let mid_alice = load_user(&store, "alice").await;
    let mid_bob = load_user(&store, "bob").await;
    assert_eq!(mid_alice.following, vec!["carol".to_string(), "bob".to_string()]);
    assert_eq!(mid_bob.followers, vec!["dave".to_string(), "alice".to_string()]);

    sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW).await.unwrap();
    assert_eq!(load_user(&store, "alice").await, alice);
    assert_eq!(load_user(&store, "bob").await, bob);
}

#[tokio::test]
async fn self_follow_is_rejected_without_writes() {
    let store = two_users().await;
    let writes_before = store.write_count().await;

    let err = sharuco::toggle_relation(&store, "alice", "alice", RelationPair::FOLLOW)
        .await
        .unwrap_err();
    assert!(matches!(err, SharucoError::SelfRelation { ref id } if id == "alice"));
    assert_eq!(store.write_count().await, writes_before);
}

#[tokio::test]
async fn missing_target_aborts_before_any_write() {
    let store = two_users().await;
    let writes_before = store.write_count().await;

    let err = sharuco::toggle_relation(&store, "alice", "ghost", RelationPair::FOLLOW)
        .await
        .unwrap_err();
    match err {
        SharucoError::NotFound { document } => assert_eq!(document, DocumentRef::user("ghost")),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(store.write_count().await, writes_before);
    assert!(load_user(&store, "alice").await.following.is_empty());
}

#[tokio::test]
async fn missing_self_aborts_before_any_write() {
    let store = two_users().await;
    let err = sharuco::toggle_relation(&store, "ghost", "bob", RelationPair::FOLLOW)
        .await
        .unwrap_err();
    assert!(matches!(err, SharucoError::NotFound { .. }));
    assert!(load_user(&store, "bob").await.followers.is_empty());
}

#[tokio::test]
async fn empty_ids_are_validation_errors() {
    let store = two_users().await;
    let err = sharuco::toggle_relation(&store, "", "bob", RelationPair::FOLLOW)
        .await
        .unwrap_err();
    assert!(matches!(err, SharucoError::Validation(_)));
}

#[tokio::test]
async fn one_sided_write_failure_is_reported_as_partial() {
    let store = two_users().await;
    store.fail_updates_to(DocumentRef::user("bob")).await;

    let err = sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW)
        .await
        .unwrap_err();
    match &err {
        SharucoError::PartialFailure { written, failed, source } => {
            assert_eq!(written, &DocumentRef::user("alice"));
            assert_eq!(failed, &DocumentRef::user("bob"));
            assert!(matches!(**source, SharucoError::RemoteUnavailable(_)));
        }
        other => panic!("expected PartialFailure, got {other:?}"),
    }

    let alice = load_user(&store, "alice").await;
    let bob = load_user(&store, "bob").await;
    assert!(alice.is_following("bob"));
    assert!(!bob.is_followed_by("alice"));

    // The next toggle reads alice's side and brings bob back in line.
    store.heal().await;
    let outcome = sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW)
        .await
        .unwrap();
    assert_eq!(outcome.state, Toggled::Removed);
    let alice = load_user(&store, "alice").await;
    let bob = load_user(&store, "bob").await;
    assert_symmetric(&alice, &bob);
}

#[tokio::test]
async fn failure_on_both_sides_is_not_partial() {
    let store = two_users().await;
    store.fail_updates_to(DocumentRef::user("alice")).await;
    store.fail_updates_to(DocumentRef::user("bob")).await;

    let err = sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW)
        .await
        .unwrap_err();
    assert!(matches!(err, SharucoError::RemoteUnavailable(_)));
    assert!(!err.is_partial());
}

#[tokio::test]
async fn unreachable_store_surfaces_remote_unavailable() {
    let store = two_users().await;
    store.set_offline(true).await;
    let err = sharuco::toggle_relation(&store, "alice", "bob", RelationPair::FOLLOW)
        .await
        .unwrap_err();
    assert!(matches!(err, SharucoError::RemoteUnavailable(_)));
}

#[tokio::test]
async fn custom_relation_pairs_create_missing_attributes() {
    let store = two_users().await;
    let blocking = RelationPair::new("blocking", "blockedBy");

    let outcome = sharuco::toggle_relation(&store, "bob", "alice", blocking).await.unwrap();
    assert_eq!(outcome.self_list, vec!["alice".to_string()]);
    assert_eq!(outcome.target_list, vec!["bob".to_string()]);

    let bob = store.get(&DocumentRef::user("bob")).await.unwrap().unwrap();
    assert_eq!(bob["blocking"], serde_json::json!(["alice"]));
}

#[tokio::test]
async fn client_follows_as_signed_in_user() {
    let store = two_users().await;
    let client = Client::new(store.clone());

    let err = client.toggle_follow(&AuthContext::anonymous(), "bob").await.unwrap_err();
    assert!(matches!(err, SharucoError::Unauthenticated));

    let alice = AuthContext::signed_in("Alice");
    let outcome = client.toggle_follow(&alice, "BOB").await.unwrap();
    assert_eq!(outcome.state, Toggled::Added);
    assert!(load_user(&store, "bob").await.is_followed_by("alice"));
}

#[tokio::test]
async fn subscribers_are_told_about_both_sides() {
    let client = Client::new(two_users().await);
    let mut alice_changes = client.subscribe(DocumentRef::user("alice"));
    let mut bob_changes = client.subscribe(DocumentRef::user("bob"));

    client
        .toggle_follow(&AuthContext::signed_in("alice"), "bob")
        .await
        .unwrap();

    let change = alice_changes.recv().await.expect("alice change");
    assert_eq!(change.attributes["following"], serde_json::json!(["bob"]));
    let change = bob_changes.recv().await.expect("bob change");
    assert_eq!(change.attributes["followers"], serde_json::json!(["alice"]));
    assert!(bob_changes.try_recv().is_none());
}
