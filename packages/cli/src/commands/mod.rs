pub mod init;
pub mod replay;
pub mod tree;
pub mod validate;

pub use init::{init, InitArgs};
pub use replay::{replay, ReplayArgs};
pub use tree::{tree, TreeArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use formsync_editor::{DataDictionary, SchemaDictionary};
use serde::Deserialize;
use std::path::Path;

/// Input file for commands that load a whole document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    #[serde(alias = "data")]
    pub data_dictionary: DataDictionary,
    #[serde(alias = "schemas")]
    pub schema_dictionary: SchemaDictionary,
}

impl DocumentFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid document file {}", path.display()))
    }
}
