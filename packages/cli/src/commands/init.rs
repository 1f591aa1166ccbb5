use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

pub const EXAMPLE_DOCUMENT_NAME: &str = "document.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Seed for generated dictionary ids
    #[arg(long)]
    pub id_prefix: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing formsync project...".bright_blue().bold());

    // Create example document if it doesn't exist
    let example_file = PathBuf::from(cwd).join(EXAMPLE_DOCUMENT_NAME);
    if !example_file.exists() {
        let document = example_document();
        fs::write(&example_file, serde_json::to_string_pretty(&document)?)?;
        println!("  {} Created {}", "✓".green(), EXAMPLE_DOCUMENT_NAME);
    }

    let config = Config {
        id_prefix: args.id_prefix,
        ..Config::default()
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", EXAMPLE_DOCUMENT_NAME);
    println!("  2. Run: formsync tree {}", EXAMPLE_DOCUMENT_NAME);

    Ok(())
}

fn example_document() -> serde_json::Value {
    json!({
        "dataDictionary": {
            "entries": {
                "root": {
                    "schemaId": "page",
                    "data": { "title": "Page", "children": [{ "id": "intro" }] }
                },
                "intro": {
                    "schemaId": "page",
                    "parent": { "id": "root", "dataLocation": "children" },
                    "data": { "title": "Introduction", "children": [] }
                }
            },
            "rootDictionaryId": "root"
        },
        "schemaDictionary": {
            "page": {
                "title": "Page",
                "type": "object",
                "properties": {
                    "title": { "title": "Title", "type": "string" },
                    "children": { "title": "Children", "type": "array", "navigationDictionaryLink": true }
                },
                "required": ["title"]
            }
        }
    })
}
