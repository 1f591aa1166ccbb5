//! # Formsync Editor
//!
//! Message-driven mediator between a schema-driven form and its document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ rendering layer: form, navigation tree      │
//! └─────────────────────────────────────────────┘
//!            ↓ Request            ↑ Response
//! ┌─────────────────────────────────────────────┐
//! │ editor: Session + MessageSystem             │
//! │  - Initialize schema and data dictionaries  │
//! │  - Apply data mutations on a working copy   │
//! │  - Prune orphaned entries                   │
//! │  - Track the active selection               │
//! └─────────────────────────────────────────────┘
//!            ↓ (SchemaDictionary, DataDictionary)
//! ┌─────────────────────────────────────────────┐
//! │ navigation: derive NavigationDictionary     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Data is source of truth**: navigation is derived and rebuilt wholesale
//! 2. **Atomic commits**: data, navigation and cursor change together or not at all
//! 3. **Owned snapshots**: responses never alias session state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formsync_editor::{DataRequest, Request, Session};
//!
//! let mut session = Session::new();
//! session.handle(Request::Initialize { data_dictionary, schema_dictionary })?;
//!
//! let response = session.handle(Request::Data(DataRequest::Update {
//!     data_location: "title".parse()?,
//!     data: json!("Hello"),
//! }))?;
//! ```

mod errors;
mod message_system;
mod messages;
mod mutations;
mod session;
pub mod validation;

pub use errors::{EditorError, EditorResult};
pub use message_system::{ListenerId, MessageSystem};
pub use messages::{
    ChildFragment, DataAction, DataDictionaryResponse, DataRequest, DataResponse, DictionaryRequest,
    NavigationDictionaryResponse, NavigationRequest, NavigationResponse, Request, Response, Snapshot,
};
pub use mutations::{MutationContext, MutationOutcome};
pub use session::{Session, SessionOptions};
pub use validation::{validate_active, JsonSchemaValidator, ValidationError, Validator};

// Re-export common types for convenience
pub use formsync_common::{ChildReference, DataDictionary, DataDictionaryEntry, DataLocation, DataType};
pub use formsync_navigation::{DeriveOptions, NavigationDictionary, TreeNavigationConfig};
pub use formsync_schema::SchemaDictionary;
