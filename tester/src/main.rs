use anyhow::Context;
use ballot::{FeedSession, HttpTransport, PressOutcome};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use jsonwebtoken::{EncodingKey, Header, encode};
use payloads::{Direction, ItemId, UserId};
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Arrow {
    Up,
    Down,
}

impl From<Arrow> for Direction {
    fn from(arrow: Arrow) -> Self {
        match arrow {
            Arrow::Up => Direction::Up,
            Arrow::Down => Direction::Down,
        }
    }
}

/// Loads the feed and presses vote arrows through the client, like a user would.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://localhost:8080")]
    base_url: String,

    /// Signs a local token for this user; leave out to browse anonymously.
    #[arg(long)]
    user_id: Option<UserId>,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Bookmark to vote on.
    #[arg(long, requires = "arrow")]
    item: Option<ItemId>,

    #[arg(long, value_enum)]
    arrow: Option<Arrow>,

    #[arg(long, default_value_t = 1)]
    presses: u32,
}

#[derive(Serialize)]
struct Claims {
    sub: UserId,
    exp: u64,
}

fn local_token(secret: &str, user_id: UserId) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now().timestamp() + 60 * 60).max(0) as u64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign local token")
}

async fn print_feed(session: &FeedSession<HttpTransport>) {
    for item in session.view().await {
        let marker = match item.entry.user_vote.direction() {
            Some(Direction::Up) => "^",
            Some(Direction::Down) => "v",
            None => " ",
        };
        println!(
            "{:>5} {:>+4} {marker} {} <{}>",
            item.bookmark.id, item.entry.vote_count, item.bookmark.title, item.bookmark.url
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut transport = HttpTransport::new(&args.base_url);
    if let Some(user_id) = args.user_id {
        let secret = args
            .secret
            .as_deref()
            .context("--user-id needs --secret or JWT_SECRET")?;
        transport = transport.with_token(local_token(secret, user_id)?);
    }

    let session = FeedSession::new(transport);
    let count = session.load().await?;
    println!("Loaded {count} bookmarks\n");
    print_feed(&session).await;

    let (Some(item), Some(arrow)) = (args.item, args.arrow) else {
        return Ok(());
    };

    for press in 1..=args.presses {
        match session.press(item, arrow.into()).await {
            Ok(PressOutcome::Applied(entry)) => println!(
                "\nPress {press}: count {:+}, vote {}",
                entry.vote_count,
                entry.user_vote.value()
            ),
            Ok(PressOutcome::Ignored(reason)) => println!("\nPress {press}: ignored ({reason:?})"),
            Err(e) => println!("\nPress {press}: rolled back ({e})"),
        }
    }

    println!("\nAfter presses:");
    print_feed(&session).await;

    session.load().await?;
    println!("\nAfter reload:");
    print_feed(&session).await;

    Ok(())
}
