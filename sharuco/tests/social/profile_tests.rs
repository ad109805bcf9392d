use super::support::*;
use sharuco::{FollowControl, ProfileView, SignInProfile, SnippetDraft};

const NOW: &str = "2023-03-04T09:00:00Z";

async fn profile_fixture() -> Client<MemoryStore> {
    let store = MemoryStore::new();

    let mut owner = user("ln-dev7");
    owner.display_name = Some("Leonel Ngoya Junior".to_string());
    owner.photo_url = Some("https://avatars.example/ln-dev7.png".to_string());
    owner.premium = true;
    owner.followers = vec!["alice".to_string()];
    seed_user(&store, &owner).await;

    let mut alice = user("alice");
    alice.following = vec!["ln-dev7".to_string()];
    seed_user(&store, &alice).await;
    seed_user(&store, &user("bob")).await;

    seed_snippet(&store, &snippet("a-public", "ln-dev7")).await;
    let mut hidden = snippet("b-private", "ln-dev7");
    hidden.is_private = true;
    seed_snippet(&store, &hidden).await;
    let mut liked = snippet("c-liked", "bob");
    liked.favoris = vec!["ln-dev7".to_string()];
    seed_snippet(&store, &liked).await;
    seed_snippet(&store, &snippet("d-other", "bob")).await;

    Client::new(store)
}

#[tokio::test]
async fn profile_partitions_snippets() {
    let client = profile_fixture().await;
    let view = client
        .profile_at(&AuthContext::anonymous(), "LN-DEV7", at(NOW))
        .await
        .unwrap();
    let profile = view.profile().expect("profile");

    assert_eq!(profile.handle, "ln-dev7");
    assert_eq!(profile.heading, "Leonel Ngoya");
    assert!(profile.premium);
    assert_eq!(profile.avatar.as_deref(), Some("https://avatars.example/ln-dev7.png"));
    assert_eq!(profile.follower_count(), 1);
    assert_eq!(profile.following_count(), 0);
    assert_eq!(profile.joined, "3 days ago");
    assert_eq!(snippet_ids(&profile.public_snippets), vec!["a-public"]);
    assert_eq!(snippet_ids(&profile.favorite_snippets), vec!["c-liked"]);
}

#[tokio::test]
async fn follow_control_depends_on_viewer() {
    let client = profile_fixture().await;
    let control = |view: ProfileView| view.profile().expect("profile").follow_control;

    let anonymous = client
        .profile_at(&AuthContext::anonymous(), "ln-dev7", at(NOW))
        .await
        .unwrap();
    assert_eq!(control(anonymous), FollowControl::SignInRequired);

    let owner = client
        .profile_at(&AuthContext::signed_in("ln-dev7"), "ln-dev7", at(NOW))
        .await
        .unwrap();
    assert_eq!(control(owner), FollowControl::Hidden);

    let follower = client
        .profile_at(&AuthContext::signed_in("alice"), "ln-dev7", at(NOW))
        .await
        .unwrap();
    assert_eq!(control(follower), FollowControl::Unfollow);

    let stranger = client
        .profile_at(&AuthContext::signed_in("bob"), "ln-dev7", at(NOW))
        .await
        .unwrap();
    assert_eq!(control(stranger), FollowControl::Follow);
}

#[tokio::test]
async fn profile_reflects_a_toggle_immediately() {
    let client = profile_fixture().await;
    let bob = AuthContext::signed_in("bob");

    client.toggle_follow(&bob, "ln-dev7").await.unwrap();
    let view = client.profile_at(&bob, "ln-dev7", at(NOW)).await.unwrap();
    let profile = view.profile().expect("profile");
    assert_eq!(profile.follow_control, FollowControl::Unfollow);
    assert_eq!(profile.followers, vec!["alice".to_string(), "bob".to_string()]);
}

#[tokio::test]
async fn unknown_handle_is_not_found_view() {
    let client = profile_fixture().await;
    let view = client
        .profile_at(&AuthContext::anonymous(), "Nobody", at(NOW))
        .await
        .unwrap();
    assert_eq!(
        view,
        ProfileView::NotFound {
            handle: "nobody".to_string()
        }
    );
}

#[tokio::test]
async fn registered_user_without_display_name_uses_handle() {
    let client = Client::new(MemoryStore::new());
    let ctx = AuthContext::signed_in("Octocat");

    let created = client
        .register_user(&ctx, SignInProfile::default(), at("2023-03-04T08:59:30Z"))
        .await
        .unwrap();
    assert_eq!(created.pseudo, "octocat");

    // Signing in again keeps the stored document.
    let again = client
        .register_user(
            &ctx,
            SignInProfile {
                display_name: Some("Mona".to_string()),
                photo_url: None,
            },
            at(NOW),
        )
        .await
        .unwrap();
    assert_eq!(again, created);

    let view = client.profile_at(&ctx, "octocat", at(NOW)).await.unwrap();
    let profile = view.profile().expect("profile");
    assert_eq!(profile.heading, "octocat");
    assert_eq!(profile.joined, "a few seconds ago");
    assert!(profile.public_snippets.is_empty());
}

#[tokio::test]
async fn published_snippets_show_up_unless_private() {
    let client = Client::new(MemoryStore::new());
    let ctx = AuthContext::signed_in("octocat");
    client.register_user(&ctx, SignInProfile::default(), at(NOW)).await.unwrap();

    let shared = client
        .publish_snippet(
            &ctx,
            SnippetDraft {
                language: "Rust".to_string(),
                code: "fn main() {}".to_string(),
                description: "hello".to_string(),
                tags: vec!["intro".to_string()],
                is_private: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(shared.language, "rust");
    client
        .publish_snippet(
            &ctx,
            SnippetDraft {
                language: "rust".to_string(),
                code: "// secret".to_string(),
                is_private: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let empty = client
        .publish_snippet(
            &ctx,
            SnippetDraft {
                language: "rust".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(empty, SharucoError::Validation(_)));

    let view = client.profile_at(&ctx, "octocat", at(NOW)).await.unwrap();
    let profile = view.profile().expect("profile");
    assert_eq!(snippet_ids(&profile.public_snippets), vec![shared.id.as_str()]);
}
