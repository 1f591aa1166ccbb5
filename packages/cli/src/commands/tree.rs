use super::DocumentFile;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formsync_navigation::{
    derive_navigation_with, get_breadcrumbs, NavigationDataType, NavigationDictionary, NavigationRef,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Document file with dataDictionary and schemaDictionary
    pub document: PathBuf,

    /// Print the breadcrumb trail of a navigation id (`dictionaryId::location`)
    #[arg(short, long)]
    pub focus: Option<String>,

    /// Print the derived navigation as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn tree(args: TreeArgs, config: &Config) -> Result<()> {
    let document = DocumentFile::load(&args.document)?;
    let options = config.session_options().derive;
    let navigation = derive_navigation_with(&document.schema_dictionary, &document.data_dictionary, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&navigation)?);
        return Ok(());
    }

    if let Some(root) = navigation.root() {
        for line in render_tree(&navigation, root) {
            println!("{}", line);
        }
    }

    if let Some(focus) = args.focus {
        let dictionary_id = focus.split("::").next().unwrap_or_default();
        let trail = get_breadcrumbs(&navigation, dictionary_id, &focus);
        if trail.is_empty() {
            return Err(anyhow::anyhow!("Unknown navigation id: {}", focus));
        }
        let texts: Vec<&str> = trail.iter().map(|crumb| crumb.text.as_str()).collect();
        println!();
        println!("{} {}", "Breadcrumbs:".bright_blue().bold(), texts.join(" › "));
    }

    Ok(())
}

/// One line per node, indented by depth
fn render_tree(navigation: &NavigationDictionary, root: NavigationRef) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((position, depth)) = stack.pop() {
        let item = match navigation.item(&position.dictionary_id, &position.navigation_config_id) {
            Some(item) => item,
            None => continue,
        };

        let marker = match item.kind {
            NavigationDataType::Object => "▸",
            NavigationDataType::Array => "≡",
            NavigationDataType::Children => "⤷",
            NavigationDataType::Primitive => "·",
        };
        lines.push(format!(
            "{}{} {} {}",
            "  ".repeat(depth),
            marker,
            item.text,
            format!("({})", item.self_id).dimmed()
        ));

        let children = navigation.children_of(&position.dictionary_id, &position.navigation_config_id);
        for child in children.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsync_common::{DataDictionary, DataDictionaryEntry, DataLocation};
    use formsync_navigation::derive_navigation;
    use formsync_schema::SchemaDictionary;
    use serde_json::json;

    #[test]
    fn test_render_tree_descends_into_links() {
        colored::control::set_override(false);
        let schemas = SchemaDictionary::new().with_schema(
            "S",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "items": { "type": "array", "link": true }
                }
            }),
        );
        let mut data = DataDictionary::new(
            "root",
            DataDictionaryEntry::new("S", json!({ "title": "A", "items": [{ "id": "b" }] })),
        );
        data.insert(
            "b",
            DataDictionaryEntry::new("S", json!({ "title": "B", "items": [] }))
                .with_parent("root", DataLocation::parse("items").unwrap()),
        );

        let navigation = derive_navigation(&schemas, &data).unwrap();
        let lines = render_tree(&navigation, navigation.root().unwrap());

        assert_eq!(
            lines,
            vec![
                "▸ A (root::)",
                "  · title (root::title)",
                "  ⤷ items (root::items)",
                "    ▸ B (b::)",
                "      · title (b::title)",
                "      ⤷ items (b::items)",
            ]
        );
    }
}
