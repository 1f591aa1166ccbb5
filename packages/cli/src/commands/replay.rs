use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use formsync_editor::{MessageSystem, Request, Response};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON array of messages, starting with an initialize message
    pub script: PathBuf,

    /// Print responses on a single line
    #[arg(short, long)]
    pub compact: bool,

    /// Keep going after a failed message
    #[arg(long)]
    pub keep_going: bool,
}

pub fn replay(args: ReplayArgs, config: &Config) -> Result<()> {
    let content = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Cannot read {}", args.script.display()))?;
    let requests: Vec<Request> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid message script {}", args.script.display()))?;

    println!("▶️  {} {} messages", "Replaying".green().bold(), requests.len());
    println!();

    let mut system = MessageSystem::with_options(config.session_options());
    let mut failures = 0;

    for (index, request) in requests.into_iter().enumerate() {
        let label = request_label(&request);
        match system.post_message(request) {
            Ok(response) => {
                println!("{} {} {}", format!("[{}]", index).dimmed(), "✓".green(), label.bright_white());
                println!("{}", render(&response, args.compact)?);
            }
            Err(err) => {
                failures += 1;
                println!("{} {} {}: {}", format!("[{}]", index).dimmed(), "✗".red(), label.bright_white(), err);
                if !args.keep_going {
                    return Err(anyhow::anyhow!("Message {} ({}) failed: {}", index, label, err));
                }
            }
        }
    }

    println!();
    if failures > 0 {
        println!("✨ {} with {} failed messages", "Done".yellow().bold(), failures);
    } else {
        println!("✨ {} Replay complete!", "Done".green().bold());
    }

    Ok(())
}

fn render(response: &Response, compact: bool) -> Result<String> {
    Ok(if compact {
        serde_json::to_string(response)?
    } else {
        serde_json::to_string_pretty(response)?
    })
}

/// `type.action` as it appears on the wire
fn request_label(request: &Request) -> String {
    serde_json::to_value(request)
        .ok()
        .map(|value| {
            let kind = value["type"].as_str().unwrap_or("?").to_string();
            match value["action"].as_str() {
                Some(action) => format!("{}.{}", kind, action),
                None => kind,
            }
        })
        .unwrap_or_else(|| "?".to_string())
}
