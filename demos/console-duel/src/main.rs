//! Console host for the typing game.
//!
//! Plays the whole bot in one terminal: every stdin line is a chat
//! message in the form `name: text` and every announcement is printed
//! back. Useful for trying the game without a chat platform:
//!
//! ```text
//! alice: !qd add
//! bob: !qd add
//! alice: !qd start
//! bob: FJK
//! ```

use std::collections::HashMap;
use std::time::Instant;

use quickdraw::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const CHANNEL: ChannelId = ChannelId(1);

/// Maps console names to stable player ids, assigning on first sight.
struct NameTable {
    ids: HashMap<String, PlayerId>,
}

impl NameTable {
    fn new() -> Self {
        Self { ids: HashMap::new() }
    }

    fn player(&mut self, name: &str) -> Player {
        let next = PlayerId(self.ids.len() as u64 + 1);
        let id = *self.ids.entry(name.to_string()).or_insert(next);
        Player::new(id, name)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let bot_config = BotConfig::from_env();
    let prefix = bot_config.prefix.clone();
    let (announce_tx, mut announce_rx) = mpsc::unbounded_channel();
    let mut router = Router::new(bot_config, GameConfig::default(), announce_tx);
    let mut names = NameTable::new();

    println!("console duel: type `name: text` ({prefix} help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                let Some((name, text)) = line.split_once(':') else {
                    eprintln!("expected `name: text`");
                    continue;
                };
                let message = ChatMessage {
                    channel: CHANNEL,
                    author: names.player(name.trim()),
                    content: text.trim().to_string(),
                    sent_at: Instant::now(),
                };
                router.handle(message).await;
            }
            announcement = announce_rx.recv() => {
                let Some((_, text)) = announcement else { break };
                println!("{text}");
            }
        }
    }
}
