//! Terminal client for the Arena Lobby channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `lobby-cli join` opens one channel session over `tokio-tungstenite`,
//! redraws the lobby panel on every change, and reads composer lines from
//! stdin. `lobby-cli rank` and `lobby-cli url` are offline helpers.
//!
//! Logs go to stderr through `tracing-subscriber` (`RUST_LOG` filters them);
//! stdout is reserved for the panel.

mod commands;
mod render;
mod transport;

use std::io::Write as _;
use std::pin::Pin;

use arena_lobby::clock::SystemClock;
use arena_lobby::config::DEFAULT_ENDPOINT;
use arena_lobby::rank::rank;
use arena_lobby::surface::Composer;
use arena_lobby::{ChannelConfig, ChannelError, ConnectionState, EchoPolicy, LobbySession, LocalIdentity, ReconnectPolicy};
use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Sleep;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{HELP, Input, load_attachment, parse_input};
use crate::render::render;
use crate::transport::TungsteniteConnector;

const DEFAULT_PLAYER: &str = "PLAYER_01";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot attach `{path}`: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot attach `{0}`: not a regular file")]
    NotAFile(String),
}

#[derive(Debug, Parser)]
#[command(name = "lobby-cli", about = "Arena Lobby terminal client")]
struct Cli {
    /// Lobby endpoint (`http`, `https`, `ws`, or `wss`).
    #[arg(long, env = "LOBBY_SOCKET_URL", default_value = DEFAULT_ENDPOINT)]
    socket_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Join the lobby and chat from the terminal.
    Join(JoinArgs),
    /// Print the level and title for an experience total.
    Rank { exp: u64 },
    /// Print the socket URL `join` would connect to.
    Url(JoinArgs),
}

#[derive(Debug, Args)]
struct JoinArgs {
    #[arg(long, env = "LOBBY_NAME", default_value = DEFAULT_PLAYER)]
    name: String,
    #[arg(long, env = "LOBBY_EXP", default_value_t = 0)]
    exp: u64,
    #[arg(long, env = "LOBBY_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Origin that shared call links point at.
    #[arg(long, env = "LOBBY_ORIGIN", default_value = DEFAULT_ENDPOINT)]
    origin: String,
    /// Reconnect attempts after an unexpected drop (0 disables).
    #[arg(long, env = "LOBBY_RECONNECT_ATTEMPTS", default_value_t = 0)]
    reconnect_attempts: u32,
    /// Keep the local copy and the server echo of own messages.
    #[arg(long, default_value_t = false)]
    keep_echoes: bool,
}

impl JoinArgs {
    fn config(&self, endpoint: &str) -> ChannelConfig {
        ChannelConfig {
            echo_policy: if self.keep_echoes { EchoPolicy::KeepBoth } else { EchoPolicy::default() },
            reconnect: ReconnectPolicy::bounded(self.reconnect_attempts),
            ..ChannelConfig::with_endpoint(endpoint)
        }
    }

    fn identity(&self) -> LocalIdentity {
        let name = if self.name.trim().is_empty() { DEFAULT_PLAYER } else { self.name.trim() };
        LocalIdentity::new(name, self.exp).with_auth_token(self.token.clone())
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("lobby-cli: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Rank { exp } => {
            let rank = rank(exp);
            println!("LVL {} {}", rank.level, rank.title.to_uppercase());
            Ok(())
        }
        Command::Url(args) => {
            println!("{}", args.config(&cli.socket_url).socket_url(&args.identity().display_name)?);
            Ok(())
        }
        Command::Join(args) => join(&cli.socket_url, &args).await,
    }
}

fn draw(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

async fn wait_for(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn join(endpoint: &str, args: &JoinArgs) -> Result<(), CliError> {
    let config = args.config(endpoint);
    let identity = args.identity();
    // Surface a bad endpoint before the panel takes over the screen.
    let url = config.socket_url(&identity.display_name)?;
    info!(%url, "joining lobby");

    let (mut session, mut queue) = LobbySession::new(TungsteniteConnector, config, identity, SystemClock);
    let mut composer = Composer::default();
    let mut notice: Option<String> = None;
    let mut reconnect: Option<Pin<Box<Sleep>>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    session.open();
    draw(&render(&session.view(), &composer, None))?;

    loop {
        tokio::select! {
            inbound = queue.next() => {
                let Some(inbound) = inbound else {
                    break;
                };
                if !session.handle(inbound) {
                    continue;
                }
                if session.connection() == ConnectionState::Disconnected && reconnect.is_none() {
                    match session.reconnect_delay() {
                        Some(delay) => {
                            info!(?delay, "scheduling lobby reconnect");
                            reconnect = Some(Box::pin(tokio::time::sleep(delay)));
                        }
                        None => notice = Some("connection lost, /quit to leave".to_owned()),
                    }
                }
            }
            () = wait_for(&mut reconnect) => {
                reconnect = None;
                session.reopen();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                notice = None;
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Text(text) => {
                        composer.text = text;
                        session.submit(&mut composer);
                    }
                    Input::Call => {
                        session.share_call_link(&args.origin);
                    }
                    Input::Attach { path, media_type } => {
                        match load_attachment(&path, media_type.as_deref()) {
                            Ok(attachment) => {
                                if let Some(replaced) = composer.attach(attachment) {
                                    info!(name = %replaced.name, "staged attachment replaced");
                                }
                            }
                            Err(error) => {
                                warn!(%error, "attachment rejected");
                                notice = Some(error.to_string());
                            }
                        }
                    }
                    Input::Detach => composer.clear(),
                    Input::Help => notice = Some(HELP.to_owned()),
                    Input::Unknown(line) => notice = Some(format!("unknown command `{line}`, try /help")),
                }
            }
        }

        draw(&render(&session.view(), &composer, notice.as_deref()))?;
    }

    session.close();
    draw("\n")?;
    Ok(())
}
