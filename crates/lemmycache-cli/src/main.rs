//! lemmycache - browse trending Lemmy communities and keep favorites.
//!
//! A small command-line front-end over `lemmycache-core`: every command
//! builds a `CommunityManager` from the saved config and session, runs one
//! workflow and prints the resulting state.

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lemmycache_core::community::CommunityManager;
use lemmycache_core::models::{CommunityId, CommunityView};
use lemmycache_core::{Config, FileSettingsStore, LemmyClient, Session};

/// Environment variable overriding the configured instance
const INSTANCE_ENV: &str = "LEMMY_INSTANCE";

/// Browse trending Lemmy communities and keep favorites
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List trending communities
    Trending,
    /// Show a community
    Community { handle: String },
    /// Follow a community
    Follow { handle: String },
    /// Unfollow a community
    Unfollow { handle: String },
    /// Block a community by id
    Block { id: i32 },
    /// Unblock a community by id
    Unblock { id: i32 },
    /// List favorite communities
    Favorites,
    /// Add or remove a favorite
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Log in (prompts for password)
    Login { username: String },
    /// Forget the saved session
    Logout,
}

#[derive(Subcommand, Debug, PartialEq)]
enum FavoriteAction {
    Add { handle: String },
    Remove { handle: String },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

struct App {
    config: Config,
    session: Session,
    client: LemmyClient,
    manager: CommunityManager<LemmyClient, FileSettingsStore>,
}

impl App {
    fn new() -> Result<Self> {
        let mut config = Config::load().context("Failed to load config")?;
        if let Ok(instance) = std::env::var(INSTANCE_ENV) {
            config.instance_url = Some(instance);
        }

        let mut session = Session::new(config.data_dir()?);
        session.load()?;

        let client = LemmyClient::new(config.instance_url())?;
        let store = FileSettingsStore::new(config.settings_dir()?)?;
        let manager = CommunityManager::new(client.clone(), store);

        Ok(Self {
            config,
            session,
            client,
            manager,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let mut ctx = App::new()?;
    info!(instance = %ctx.client.instance_url(), command = ?cli.command, "lemmycache starting");

    match cli.command {
        Command::Trending => {
            ctx.manager.fetch_trending_communities().await?;
            for view in ctx.manager.state().trending_communities() {
                print_community(view);
            }
        }
        Command::Community { handle } => {
            ctx.manager.fetch_community(&ctx.session, &handle).await?;
            match ctx.manager.state().community(&handle) {
                Some(view) => print_community_detail(view),
                None => eprintln!("Community not found: {}", handle),
            }
        }
        Command::Follow { handle } => run_follow(&mut ctx, true, &handle).await?,
        Command::Unfollow { handle } => run_follow(&mut ctx, false, &handle).await?,
        Command::Block { id } => run_block(&mut ctx, true, CommunityId(id)).await?,
        Command::Unblock { id } => run_block(&mut ctx, false, CommunityId(id)).await?,
        Command::Favorites => {
            ctx.manager.load_favorites(&ctx.session).await?;
            print_favorites(&ctx);
        }
        Command::Favorite { action } => {
            if ctx.session.active_handle().is_none() {
                eprintln!("Log in to keep favorites");
            }
            ctx.manager.load_favorites(&ctx.session).await?;
            match action {
                FavoriteAction::Add { handle } => {
                    ctx.manager.add_favorite(&ctx.session, &handle).await?
                }
                FavoriteAction::Remove { handle } => {
                    ctx.manager.remove_favorite(&ctx.session, &handle).await?
                }
            }
            print_favorites(&ctx);
        }
        Command::Login { username } => {
            let password = rpassword::prompt_password("Password: ")?;
            let data = ctx.client.login(&username, &password).await?;
            ctx.config.last_handle = data.handle.clone();
            ctx.session.update(data);
            ctx.session.save()?;
            ctx.config.save()?;
            println!(
                "Logged in as {}",
                ctx.session.active_handle().unwrap_or(&username)
            );
        }
        Command::Logout => {
            ctx.session.clear()?;
            ctx.manager.reset();
            println!("Logged out");
        }
    }

    Ok(())
}

async fn run_follow(ctx: &mut App, follow: bool, handle: &str) -> Result<()> {
    ctx.manager.fetch_community(&ctx.session, handle).await?;
    ctx.manager
        .follow_community(&ctx.session, follow, handle)
        .await?;
    match ctx.manager.state().community(handle) {
        Some(view) => print_community(view),
        None => eprintln!("Community not found: {}", handle),
    }
    Ok(())
}

async fn run_block(ctx: &mut App, block: bool, id: CommunityId) -> Result<()> {
    ctx.manager
        .block_community(&ctx.session, block, id, &ctx.client)
        .await?;
    let blocked = ctx
        .manager
        .state()
        .community_by_handle()
        .values()
        .filter(|view| view.id() == id);
    for view in blocked {
        print_community(view);
    }
    if let Some(site) = ctx.client.site().await {
        println!("{} blocked communities", site.blocked_community_count());
    }
    Ok(())
}

fn print_community(view: &CommunityView) {
    let mut flags = Vec::new();
    if view.is_subscribed() {
        flags.push("subscribed");
    }
    if view.blocked {
        flags.push("blocked");
    }
    if view.community.nsfw {
        flags.push("nsfw");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    println!(
        "{:<40} {:>18}{}",
        view.handle(),
        view.display_subscribers(),
        flags
    );
}

fn print_community_detail(view: &CommunityView) {
    print_community(view);
    println!("  id:    {}", view.id());
    println!("  title: {}", view.community.title);
    println!(
        "  posts: {}  comments: {}  active this week: {}",
        view.counts.posts, view.counts.comments, view.counts.users_active_week
    );
    if let Some(ref description) = view.community.description {
        println!();
        println!("{}", description);
    }
}

fn print_favorites(ctx: &App) {
    let favorites = ctx.manager.state().favorites();
    if favorites.is_empty() {
        println!("No favorite communities");
    }
    for handle in favorites {
        println!("{}", handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        let cli = Cli::try_parse_from(["lemmycache", "trending"]).unwrap();
        assert_eq!(cli.command, Command::Trending);

        let cli = Cli::try_parse_from(["lemmycache", "follow", "rust@programming.dev"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Follow {
                handle: "rust@programming.dev".to_string()
            }
        );
    }

    #[test]
    fn test_parse_block_id_is_typed() {
        let cli = Cli::try_parse_from(["lemmycache", "block", "42"]).unwrap();
        assert_eq!(cli.command, Command::Block { id: 42 });

        assert!(Cli::try_parse_from(["lemmycache", "unblock", "abc"]).is_err());
    }

    #[test]
    fn test_parse_nested_favorite_action() {
        let cli = Cli::try_parse_from(["lemmycache", "favorite", "remove", "linux"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Favorite {
                action: FavoriteAction::Remove {
                    handle: "linux".to_string()
                }
            }
        );

        assert!(Cli::try_parse_from(["lemmycache", "favorite", "toggle", "linux"]).is_err());
        assert!(Cli::try_parse_from(["lemmycache"]).is_err());
    }
}
