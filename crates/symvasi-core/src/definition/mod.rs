//! Definition model: documents, types, the resolved object model and its
//! render contexts.
//!
//! # Examples
//!
//! ```
//! use serde_json::Map;
//! use symvasi_core::definition::{Definition, DefinitionDocument};
//!
//! let doc = DefinitionDocument::from_yaml(
//!     "models:\n  - name: Order\n    properties:\n      - { name: id, type: int }\n",
//! )
//! .unwrap();
//! let definition = Definition::new("Order", doc, &Map::new()).unwrap();
//! assert_eq!(definition.models[0].properties[0].data_type.kind.as_str(), "integer");
//! ```

pub mod context;
pub mod document;
pub mod model;
pub mod types;

pub use context::*;
pub use document::*;
pub use model::*;
pub use types::*;
