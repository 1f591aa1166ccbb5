//! # Formsync Navigation
//!
//! Derives the navigation tree shown next to a form from the loaded schemas
//! and the data dictionary, and provides the view helpers that read it.
//!
//! ## Architecture
//!
//! ```text
//! SchemaDictionary + DataDictionary
//!     -> derive_navigation        (one TreeNavigationConfig per reachable entry)
//!     -> NavigationDictionary
//!         -> get_breadcrumbs      (trail from the root to the active node)
//!         -> TreeView             (expanded state, visible order, keyboard)
//! ```
//!
//! Derivation is pure: it never mutates its inputs and equal inputs always
//! produce equal output.

pub mod breadcrumbs;
pub mod derive;
pub mod errors;
pub mod tree_view;
pub mod types;

pub use breadcrumbs::{get_breadcrumbs, Breadcrumb};
pub use derive::{derive_navigation, derive_navigation_with, DeriveOptions, MAX_LINK_DEPTH, UNTITLED};
pub use errors::{NavigationError, NavigationResult};
pub use tree_view::{TreeKey, TreeView, VisibleItem};
pub use types::*;
