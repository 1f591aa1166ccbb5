use formsync_editor::{DataDictionary, MessageSystem, SchemaDictionary, SessionOptions};
use formsync_navigation::{derive_navigation, get_breadcrumbs};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Message system owned by the JS side, typically inside a web worker
#[wasm_bindgen]
pub struct MessageSystemHandle {
    system: MessageSystem,
}

#[wasm_bindgen]
impl MessageSystemHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MessageSystemHandle {
        MessageSystemHandle {
            system: MessageSystem::new(),
        }
    }

    /// Handle whose generated dictionary ids start with `prefix`
    #[wasm_bindgen(js_name = withIdPrefix)]
    pub fn with_id_prefix(prefix: String) -> MessageSystemHandle {
        MessageSystemHandle {
            system: MessageSystem::with_options(SessionOptions {
                id_prefix: Some(prefix),
                ..SessionOptions::default()
            }),
        }
    }

    /// Handle one JSON message and return the JSON response
    #[wasm_bindgen(js_name = postMessage)]
    pub fn post_message(&mut self, message: &str) -> Result<String, JsValue> {
        self.post(message).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter, js_name = isInitialized)]
    pub fn is_initialized(&self) -> bool {
        self.system.session().is_initialized()
    }
}

impl MessageSystemHandle {
    fn post(&mut self, message: &str) -> Result<String, String> {
        self.system.post_json(message).map_err(|e| e.to_string())
    }
}

impl Default for MessageSystemHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInput {
    data_dictionary: DataDictionary,
    schema_dictionary: SchemaDictionary,
}

/// Derive navigation for a `{ dataDictionary, schemaDictionary }` document
#[wasm_bindgen(js_name = deriveNavigation)]
pub fn derive_navigation_js(document: &str) -> Result<String, JsValue> {
    derive_navigation_json(document).map_err(|e| JsValue::from_str(&e))
}

/// Breadcrumb trail for a node of a `{ dataDictionary, schemaDictionary }` document
#[wasm_bindgen(js_name = getBreadcrumbs)]
pub fn get_breadcrumbs_js(document: &str, dictionary_id: &str, navigation_config_id: &str) -> Result<String, JsValue> {
    breadcrumbs_json(document, dictionary_id, navigation_config_id).map_err(|e| JsValue::from_str(&e))
}

fn derive_navigation_json(document: &str) -> Result<String, String> {
    let input: DocumentInput = serde_json::from_str(document).map_err(|e| format!("Invalid document: {}", e))?;
    let navigation =
        derive_navigation(&input.schema_dictionary, &input.data_dictionary).map_err(|e| e.to_string())?;
    serde_json::to_string(&navigation).map_err(|e| format!("Serialization error: {}", e))
}

fn breadcrumbs_json(document: &str, dictionary_id: &str, navigation_config_id: &str) -> Result<String, String> {
    let input: DocumentInput = serde_json::from_str(document).map_err(|e| format!("Invalid document: {}", e))?;
    let navigation =
        derive_navigation(&input.schema_dictionary, &input.data_dictionary).map_err(|e| e.to_string())?;
    let trail = get_breadcrumbs(&navigation, dictionary_id, navigation_config_id);
    serde_json::to_string(&trail).map_err(|e| format!("Serialization error: {}", e))
}
