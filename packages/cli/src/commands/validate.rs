use super::DocumentFile;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formsync_editor::{JsonSchemaValidator, Validator};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document file with dataDictionary and schemaDictionary
    pub document: PathBuf,
}

/// Validate every entry against its schema and the referential invariants
pub fn validate(args: ValidateArgs, _config: &Config) -> Result<()> {
    let document = DocumentFile::load(&args.document)?;
    let validator = JsonSchemaValidator;

    println!("🔍 {} {}", "Validating".green().bold(), args.document.display());
    println!();

    let mut total_errors = 0;

    for issue in document.data_dictionary.integrity_issues() {
        total_errors += 1;
        println!("  {} {:?}", "✗".red(), issue);
    }

    for (id, entry) in &document.data_dictionary.entries {
        let schema = match document.schema_dictionary.get(&entry.schema_id) {
            Some(schema) => schema,
            None => {
                total_errors += 1;
                println!("  {} {}: unknown schema '{}'", "✗".red(), id, entry.schema_id);
                continue;
            }
        };

        let errors = validator.validate(schema.raw(), &entry.data);
        if errors.is_empty() {
            println!("  {} {}", "✓".green(), id);
        }
        for error in errors {
            total_errors += 1;
            let location = if error.data_location.is_root() {
                "(root)".to_string()
            } else {
                error.data_location.to_string()
            };
            println!("  {} {} at {}: {}", "✗".red(), id, location.bright_white(), error.invalid_message);
        }
    }

    println!();
    if total_errors > 0 {
        return Err(anyhow::anyhow!("{} validation errors", total_errors));
    }
    println!("✨ {} Document is valid", "Done".green().bold());
    Ok(())
}
