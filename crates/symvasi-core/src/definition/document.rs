//! Raw definition documents as read from template files.
//!
//! These mirror the structured document one-to-one and carry unresolved type
//! strings. Augmentations are merged into them before a [`Definition`] is
//! built.
//!
//! [`Definition`]: super::Definition

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tokio::fs;

/// Free-form key-value map attached at every level of a definition
pub type Extensions = Map<String, JsonValue>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionDocument {
    pub namespace: Option<String>,
    pub options: Map<String, JsonValue>,
    pub enums: Vec<EnumDocument>,
    pub contracts: Vec<ContractDocument>,
    pub models: Vec<ModelDocument>,
    pub services: Vec<ServiceDocument>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumDocument {
    pub name: String,
    pub values: Vec<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractDocument {
    pub name: String,
    pub properties: Vec<PropertyDocument>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelDocument {
    pub name: String,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub base_model: Option<String>,
    pub properties: Vec<PropertyDocument>,
    pub methods: Vec<MethodDocument>,
    pub contracts: Vec<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDocument {
    pub name: String,
    pub methods: Vec<MethodDocument>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MethodDocument {
    pub name: String,
    pub return_type: Option<String>,
    pub params: Vec<ParamDocument>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl DefinitionDocument {
    /// Parse a definition document from YAML text
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        // An empty file is an empty definition
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a definition document
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml(&content)
    }

    /// Look up a model entry by name
    pub fn model_mut(&mut self, name: &str) -> Option<&mut ModelDocument> {
        self.models.iter_mut().find(|model| model.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let doc = DefinitionDocument::from_yaml(
            r#"
namespace: shop
options:
  strict: true
enums:
  - name: Status
    values: [open, closed]
contracts:
  - name: Identified
    properties:
      - { name: id, type: integer }
models:
  - name: Order
    abstract: true
    baseModel: Entity
    contracts: [Identified]
    properties:
      - name: status
        type: Status?
        extensions: { column: state }
    methods:
      - name: total
        returnType: double
        params:
          - { name: currency, type: string }
services:
  - name: Orders
    methods:
      - name: find
        returnType: Order
        params:
          - { name: id, type: int }
extensions:
  package: com.shop
"#,
        )
        .unwrap();

        assert_eq!(doc.namespace.as_deref(), Some("shop"));
        assert_eq!(doc.enums[0].values, vec!["open", "closed"]);
        let order = &doc.models[0];
        assert!(order.is_abstract);
        assert_eq!(order.base_model.as_deref(), Some("Entity"));
        assert_eq!(order.properties[0].type_name, "Status?");
        assert_eq!(order.methods[0].return_type.as_deref(), Some("double"));
        assert_eq!(doc.services[0].methods[0].params[0].type_name, "int");
        assert_eq!(doc.extensions["package"], "com.shop");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(
            DefinitionDocument::from_yaml("\n").unwrap(),
            DefinitionDocument::default()
        );
    }
}
