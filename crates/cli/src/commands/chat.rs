//! `smalltalk chat` - Interactive or single-message chat in the terminal.
//!
//! Goes through the same `ChatBot` as the gateway, so commands, profiles
//! and the context window behave identically.

use std::io::Write;

use smalltalk_bot::ChatBot;
use smalltalk_config::AppConfig;
use smalltalk_core::UserId;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(
    message: Option<String>,
    user: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let (bot, _storage) = smalltalk_gateway::build_bot(&config)?;

    let user_id = match user {
        Some(id) => UserId::new(id)?,
        None => UserId::new(uuid::Uuid::new_v4().to_string())?,
    };

    if let Some(msg) = message {
        // Single message mode
        let reply = bot.respond(&user_id, &msg).await?;
        println!("{reply}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  SmallTalk — Interactive Mode");
    println!();
    println!("  Reply:     {}", config.reply.backend);
    println!("  Profiles:  {}", config.profiles.source);
    println!("  User:      {user_id}");
    println!();
    println!("  Type a message and press Enter. /help lists commands.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    println!("{}", indent("Bot", bot.help()));
    repl(&bot, &user_id).await?;

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

async fn repl(bot: &ChatBot, user_id: &UserId) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit" | ":q") {
            break;
        }

        match bot.respond(user_id, line).await {
            Ok(reply) => println!("{}", indent("Bot", &reply)),
            Err(e) => {
                if !e.is_user_error() {
                    tracing::warn!(error = %e, "Turn failed");
                }
                eprintln!("  [Error] {e}");
            }
        }
    }

    Ok(())
}

fn indent(speaker: &str, text: &str) -> String {
    let prefix = format!("  {speaker} > ");
    let pad = " ".repeat(prefix.len());
    let mut out = String::new();
    for (i, line) in text.trim_end().lines().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(&pad);
        } else {
            out.push_str(&prefix);
        }
        out.push_str(line);
    }
    if out.is_empty() {
        out = prefix;
    }
    out
}
