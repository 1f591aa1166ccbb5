//! # Edit Session
//!
//! The mediator between the rendering layer and the document. A session owns
//! the schema, data and navigation dictionaries plus the active selection, and
//! is the only writer of that state.
//!
//! Data mutations are computed on a working copy of the data dictionary.
//! Parent locations shifted by array splices are re-anchored, orphaned
//! entries are pruned, navigation is re-derived from the copy, the
//! cursor is moved back onto an existing node, and only then are data,
//! navigation and cursor committed together. Any failure leaves the session
//! exactly as it was.

use crate::errors::{EditorError, EditorResult};
use crate::messages::{
    DataDictionaryResponse, DataRequest, DataResponse, DictionaryRequest, NavigationDictionaryResponse,
    NavigationRequest, NavigationResponse, Request, Response, Snapshot,
};
use crate::mutations::MutationContext;
use formsync_common::{DataDictionary, IdGenerator};
use formsync_navigation::{
    derive_navigation_with, DeriveOptions, NavigationDictionary, NavigationRef, TreeNavigationConfig,
};
use formsync_schema::SchemaDictionary;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Session-wide settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    pub derive: DeriveOptions,
    /// Seed for generated dictionary ids; derived from the root id when unset
    pub id_prefix: Option<String>,
}

/// Everything created by `initialize`
#[derive(Debug, Clone)]
struct SessionState {
    schemas: SchemaDictionary,
    data: DataDictionary,
    navigation: NavigationDictionary,
    active_dictionary_id: String,
    active_navigation_config_id: String,
    ids: IdGenerator,
}

impl SessionState {
    fn active_navigation(&self) -> EditorResult<TreeNavigationConfig> {
        self.navigation
            .get(&self.active_dictionary_id)
            .cloned()
            .ok_or_else(|| EditorError::invalid_selection(&self.active_dictionary_id, &self.active_navigation_config_id))
    }

    fn active_data(&self) -> EditorResult<Value> {
        self.data
            .get(&self.active_dictionary_id)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| EditorError::invalid_selection(&self.active_dictionary_id, &self.active_navigation_config_id))
    }

    fn active_schema(&self) -> Value {
        self.data
            .get(&self.active_dictionary_id)
            .and_then(|entry| self.schemas.get(&entry.schema_id))
            .map(|schema| schema.raw().clone())
            .unwrap_or(Value::Null)
    }
}

/// Single editing session
///
/// Many sessions may coexist; there is no shared state between them.
#[derive(Debug, Clone, Default)]
pub struct Session {
    options: SessionOptions,
    state: Option<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self { options, state: None }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Discard all dictionaries and the selection
    pub fn teardown(&mut self) {
        if self.state.take().is_some() {
            info!("Session torn down");
        }
    }

    /// Process one request to completion
    #[instrument(skip_all, fields(kind = request_kind(&request)))]
    pub fn handle(&mut self, request: Request) -> EditorResult<Response> {
        match request {
            Request::Initialize {
                data_dictionary,
                schema_dictionary,
            } => self.initialize(data_dictionary, schema_dictionary).map(Response::Initialize),
            Request::Data(request) => self.handle_data(&request).map(Response::Data),
            Request::DataDictionary(request) => self.handle_data_dictionary(request).map(Response::DataDictionary),
            Request::Navigation(request) => self.handle_navigation(request).map(Response::Navigation),
            Request::NavigationDictionary(request) => self
                .handle_navigation_dictionary(request)
                .map(Response::NavigationDictionary),
        }
    }

    /// Full snapshot of the current state
    pub fn snapshot(&self) -> EditorResult<Snapshot> {
        let state = self.state()?;
        Ok(Snapshot {
            data: state.active_data()?,
            data_dictionary: state.data.clone(),
            navigation: state.active_navigation()?,
            navigation_dictionary: state.navigation.clone(),
            active_dictionary_id: state.active_dictionary_id.clone(),
            active_navigation_config_id: state.active_navigation_config_id.clone(),
            schema: state.active_schema(),
        })
    }

    pub fn data_dictionary(&self) -> EditorResult<&DataDictionary> {
        Ok(&self.state()?.data)
    }

    pub fn navigation_dictionary(&self) -> EditorResult<&NavigationDictionary> {
        Ok(&self.state()?.navigation)
    }

    pub fn schema_dictionary(&self) -> EditorResult<&SchemaDictionary> {
        Ok(&self.state()?.schemas)
    }

    /// Active `(dictionary id, navigation config id)`
    pub fn active(&self) -> EditorResult<NavigationRef> {
        let state = self.state()?;
        Ok(NavigationRef::new(
            state.active_dictionary_id.clone(),
            state.active_navigation_config_id.clone(),
        ))
    }

    fn state(&self) -> EditorResult<&SessionState> {
        self.state.as_ref().ok_or(EditorError::UninitializedState)
    }

    fn state_mut(&mut self) -> EditorResult<&mut SessionState> {
        self.state.as_mut().ok_or(EditorError::UninitializedState)
    }

    fn initialize(&mut self, data: DataDictionary, schemas: SchemaDictionary) -> EditorResult<Snapshot> {
        let navigation = derive_navigation_with(&schemas, &data, &self.options.derive)?;
        let active_dictionary_id = data.root_id().to_string();
        let active_navigation_config_id = navigation
            .root_navigation_id(&active_dictionary_id)
            .map(str::to_string)
            .ok_or_else(|| EditorError::invalid_selection(&active_dictionary_id, ""))?;
        let ids = match &self.options.id_prefix {
            Some(prefix) => IdGenerator::from_seed(prefix.clone()),
            None => IdGenerator::new(&active_dictionary_id),
        };

        if self.state.is_some() {
            info!("Replacing initialized session");
        }
        info!(
            root = %active_dictionary_id,
            entries = data.len(),
            schemas = schemas.len(),
            "Session initialized"
        );

        self.state = Some(SessionState {
            schemas,
            data,
            navigation,
            active_dictionary_id,
            active_navigation_config_id,
            ids,
        });
        self.snapshot()
    }

    fn handle_data(&mut self, request: &DataRequest) -> EditorResult<DataResponse> {
        let derive_options = self.options.derive.clone();
        let state = self.state_mut()?;

        let mut data = state.data.clone();
        let mut ids = state.ids.clone();
        let context = MutationContext {
            schemas: &state.schemas,
            active_dictionary_id: &state.active_dictionary_id,
        };
        let outcome = request.apply(&context, &mut data, &mut ids)?;

        let moved = data.reanchor_parents();
        if !moved.is_empty() {
            debug!(moved = ?moved, "Re-anchored shifted child entries");
        }
        let removed = data.prune_orphans();
        if !removed.is_empty() {
            debug!(removed = ?removed, "Pruned orphaned entries");
        }

        let navigation = derive_navigation_with(&state.schemas, &data, &derive_options)?;
        let cursor = settle_cursor(
            &navigation,
            &state.active_dictionary_id,
            &state.active_navigation_config_id,
        )?;

        let mut removed_dictionary_ids: Vec<String> = state
            .data
            .entries
            .keys()
            .filter(|id| !data.contains(id))
            .cloned()
            .collect();
        removed_dictionary_ids.sort();

        state.data = data;
        state.navigation = navigation;
        state.ids = ids;
        state.active_dictionary_id = cursor.dictionary_id;
        state.active_navigation_config_id = cursor.navigation_config_id;

        Ok(DataResponse {
            action: request.action(),
            source_data_location: match request {
                DataRequest::Duplicate { source_data_location } => Some(source_data_location.clone()),
                _ => None,
            },
            data: state.active_data()?,
            navigation: state.active_navigation()?,
            active_dictionary_id: state.active_dictionary_id.clone(),
            active_navigation_config_id: state.active_navigation_config_id.clone(),
            added_dictionary_ids: outcome.added,
            removed_dictionary_ids,
        })
    }

    fn handle_data_dictionary(&mut self, request: DictionaryRequest) -> EditorResult<DataDictionaryResponse> {
        match request {
            DictionaryRequest::Get => {
                let state = self.state()?;
                Ok(DataDictionaryResponse::Get {
                    data_dictionary: state.data.clone(),
                    active_dictionary_id: state.active_dictionary_id.clone(),
                })
            }
            DictionaryRequest::UpdateActiveId { active_dictionary_id } => {
                let state = self.state_mut()?;
                activate_dictionary(state, &active_dictionary_id)?;
                Ok(DataDictionaryResponse::UpdateActiveId {
                    active_dictionary_id: state.active_dictionary_id.clone(),
                })
            }
        }
    }

    fn handle_navigation(&mut self, request: NavigationRequest) -> EditorResult<NavigationResponse> {
        match request {
            NavigationRequest::Get => {
                let state = self.state()?;
                Ok(NavigationResponse::Get {
                    active_dictionary_id: state.active_dictionary_id.clone(),
                    active_navigation_config_id: state.active_navigation_config_id.clone(),
                    navigation: state.active_navigation()?,
                })
            }
            NavigationRequest::Update {
                active_dictionary_id,
                active_navigation_config_id,
            } => {
                let state = self.state_mut()?;
                if !state
                    .navigation
                    .contains(&active_dictionary_id, &active_navigation_config_id)
                {
                    return Err(EditorError::invalid_selection(
                        &active_dictionary_id,
                        &active_navigation_config_id,
                    ));
                }

                debug!(
                    dictionary_id = %active_dictionary_id,
                    navigation_config_id = %active_navigation_config_id,
                    "Cursor moved"
                );
                state.active_dictionary_id = active_dictionary_id.clone();
                state.active_navigation_config_id = active_navigation_config_id.clone();
                Ok(NavigationResponse::Update {
                    active_dictionary_id,
                    active_navigation_config_id,
                })
            }
        }
    }

    fn handle_navigation_dictionary(
        &mut self,
        request: DictionaryRequest,
    ) -> EditorResult<NavigationDictionaryResponse> {
        match request {
            DictionaryRequest::Get => {
                let state = self.state()?;
                Ok(NavigationDictionaryResponse::Get {
                    navigation_dictionary: state.navigation.clone(),
                    active_dictionary_id: state.active_dictionary_id.clone(),
                })
            }
            DictionaryRequest::UpdateActiveId { active_dictionary_id } => {
                let state = self.state_mut()?;
                activate_dictionary(state, &active_dictionary_id)?;
                Ok(NavigationDictionaryResponse::UpdateActiveId {
                    active_dictionary_id: state.active_dictionary_id.clone(),
                    active_navigation_config_id: state.active_navigation_config_id.clone(),
                })
            }
        }
    }
}

/// Make `dictionary_id` active with the cursor on its navigation root
fn activate_dictionary(state: &mut SessionState, dictionary_id: &str) -> EditorResult<()> {
    let root = state
        .navigation
        .root_navigation_id(dictionary_id)
        .map(str::to_string)
        .ok_or_else(|| EditorError::invalid_selection(dictionary_id, ""))?;

    debug!(dictionary_id, "Active dictionary changed");
    state.active_dictionary_id = dictionary_id.to_string();
    state.active_navigation_config_id = root;
    Ok(())
}

/// Keep the cursor if it still exists, else the dictionary root, else the tree root
fn settle_cursor(
    navigation: &NavigationDictionary,
    dictionary_id: &str,
    navigation_config_id: &str,
) -> EditorResult<NavigationRef> {
    if navigation.contains(dictionary_id, navigation_config_id) {
        return Ok(NavigationRef::new(dictionary_id, navigation_config_id));
    }

    if let Some(root) = navigation.root_navigation_id(dictionary_id) {
        warn!(dictionary_id, navigation_config_id, "Active node removed, moving to entry root");
        return Ok(NavigationRef::new(dictionary_id, root));
    }

    warn!(dictionary_id, "Active dictionary entry removed, moving to root entry");
    navigation
        .root()
        .ok_or_else(|| EditorError::invalid_selection(&navigation.root_dictionary_id, ""))
}

fn request_kind(request: &Request) -> &'static str {
    match request {
        Request::Initialize { .. } => "initialize",
        Request::Data(_) => "data",
        Request::DataDictionary(_) => "dataDictionary",
        Request::Navigation(_) => "navigation",
        Request::NavigationDictionary(_) => "navigationDictionary",
    }
}
