use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use sharuco::{
    AuthContext, Client, RedisStore, SignInProfile, SnippetDraft, Toggled, TokenForm, TokenUpdate,
};

use crate::output::OutputManager;

#[derive(Subcommand)]
pub enum Commands {
    /// Create a user document as the identity provider would on first sign-in
    Register(RegisterArgs),

    /// Follow a user, or unfollow if already following
    Follow(FollowArgs),

    /// Favorite a snippet, or unfavorite if already favorited
    Favorite(FavoriteArgs),

    /// Add or update a personal access token
    Token(TokenArgs),

    /// Show a user's public profile
    Profile(ProfileArgs),

    /// Publish a code snippet
    Publish(PublishArgs),
}

#[derive(Args)]
pub struct RegisterArgs {
    /// GitHub screen name
    pub handle: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Args)]
pub struct FollowArgs {
    /// Acting user
    #[arg(long = "as", env = "SHARUCO_USER")]
    pub viewer: String,
    /// User to follow or unfollow
    pub target: String,
}

#[derive(Args)]
pub struct FavoriteArgs {
    #[arg(long = "as", env = "SHARUCO_USER")]
    pub viewer: String,
    pub snippet: String,
}

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long = "as", env = "SHARUCO_USER")]
    pub viewer: String,
    /// Token value; omit to only report whether one is stored
    #[arg(env = "SHARUCO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    pub handle: String,
    /// View the profile as this user
    #[arg(long = "as", env = "SHARUCO_USER")]
    pub viewer: Option<String>,
}

#[derive(Args)]
pub struct PublishArgs {
    #[arg(long = "as", env = "SHARUCO_USER")]
    pub viewer: String,
    #[arg(long)]
    pub language: String,
    #[arg(long)]
    pub code: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub private: bool,
}

pub async fn handle_command(command: Commands, client: &Client<RedisStore>, output: &OutputManager) -> Result<()> {
    match command {
        Commands::Register(args) => {
            let ctx = AuthContext::signed_in(&args.handle);
            let user = client
                .register_user(
                    &ctx,
                    SignInProfile {
                        display_name: args.name,
                        photo_url: args.avatar,
                    },
                    Utc::now(),
                )
                .await
                .context("Failed to register user")?;
            output.success(&format!("{} is registered", user.pseudo));
        }
        Commands::Follow(args) => {
            let ctx = AuthContext::signed_in(&args.viewer);
            let outcome = client.toggle_follow(&ctx, &args.target).await?;
            match outcome.state {
                Toggled::Added => output.success(&format!("Now following {}", args.target)),
                Toggled::Removed => output.success(&format!("Unfollowed {}", args.target)),
            }
            output.verbose(&format!("following: {:?}", outcome.self_list));
        }
        Commands::Favorite(args) => {
            let ctx = AuthContext::signed_in(&args.viewer);
            let outcome = client.toggle_favorite(&ctx, &args.snippet).await?;
            match outcome.state {
                Toggled::Added => output.success(&format!("Added {} to favorites", args.snippet)),
                Toggled::Removed => output.success(&format!("Removed {} from favorites", args.snippet)),
            }
            output.verbose(&format!("{} favorites", outcome.favoris.len()));
        }
        Commands::Token(args) => {
            let ctx = AuthContext::signed_in(&args.viewer);
            match args.token {
                Some(token) => match client.update_token(&ctx, &TokenForm::new(token)).await? {
                    TokenUpdate::Added => output.success("Your personal access token has been added"),
                    TokenUpdate::Updated => output.success("Your personal access token has been updated"),
                },
                None => {
                    if client.has_token(&ctx).await? {
                        output.info("You already have a token, but you can always create a new one and update it");
                    } else {
                        output.warning("No personal access token stored");
                    }
                }
            }
        }
        Commands::Profile(args) => {
            let viewer = args
                .viewer
                .as_deref()
                .map(AuthContext::signed_in)
                .unwrap_or_default();
            let view = client.profile(&viewer, &args.handle).await?;
            output.display(&view)?;
        }
        Commands::Publish(args) => {
            let ctx = AuthContext::signed_in(&args.viewer);
            let snippet = client
                .publish_snippet(
                    &ctx,
                    SnippetDraft {
                        language: args.language,
                        code: args.code,
                        description: args.description,
                        tags: args.tags,
                        is_private: args.private,
                    },
                )
                .await?;
            output.success(&format!("Published snippet {}", snippet.id));
        }
    }
    Ok(())
}
