//! Augmentation documents and their merge into definition documents.
//!
//! An augmentation is a sidecar document that patches the extensions and
//! model methods of the template document it targets. It is matched by its
//! `fqn` field or, when absent, by its file stem. Merging happens on raw
//! documents, before the definition is built, so contract merging sees the
//! final property and method lists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::definition::{DefinitionDocument, Extensions, MethodDocument};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationDocument {
    /// Fully qualified name of the augmented document
    pub fqn: Option<String>,
    pub extensions: Extensions,
    pub models: Vec<ModelPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPatch {
    pub name: String,
    pub extensions: Extensions,
    pub methods: Vec<MethodDocument>,
}

impl AugmentationDocument {
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Shallow-assign extensions and append model methods onto `target`.
    ///
    /// Methods are appended as-is; names already present are not checked.
    pub fn apply_to(&self, target: &mut DefinitionDocument) {
        for (key, value) in &self.extensions {
            target.extensions.insert(key.clone(), value.clone());
        }

        for patch in &self.models {
            let Some(model) = target.model_mut(&patch.name) else {
                log::warn!(
                    "Augmentation {} patches unknown model {}, skipping",
                    self.fqn.as_deref().unwrap_or("<unnamed>"),
                    patch.name
                );
                continue;
            };
            for (key, value) in &patch.extensions {
                model.extensions.insert(key.clone(), value.clone());
            }
            model.methods.extend(patch.methods.iter().cloned());
        }
    }
}

/// Augmentations indexed by the fully qualified name they target
#[derive(Debug, Clone, Default)]
pub struct AugmentationIndex {
    entries: HashMap<String, Vec<AugmentationDocument>>,
}

impl AugmentationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a batch of augmentation documents read from `path`s.
    ///
    /// Documents sharing a key are all kept, in the order given.
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, AugmentationDocument)>,
    {
        let mut index = Self::new();
        for (path, document) in documents {
            index.insert(&path, document);
        }
        index
    }

    pub fn insert(&mut self, path: &Path, mut document: AugmentationDocument) {
        let key = match &document.fqn {
            Some(fqn) => fqn.clone(),
            None => file_stem(path),
        };
        document.fqn.get_or_insert_with(|| key.clone());
        self.entries.entry(key).or_default().push(document);
    }

    pub fn get(&self, fqn: &str) -> &[AugmentationDocument] {
        self.entries.get(fqn).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every augmentation matching the named document.
    ///
    /// A document matches by its definition name, or by `namespace.name`
    /// when it declares a namespace. Returns the number applied.
    pub fn augment(&self, name: &str, document: &mut DefinitionDocument) -> usize {
        let mut keys = vec![name.to_string()];
        if let Some(namespace) = &document.namespace {
            keys.push(format!("{namespace}.{name}"));
        }

        let mut applied = 0;
        for key in keys {
            for augmentation in self.get(&key) {
                log::debug!("Applying augmentation {} to {}", key, name);
                augmentation.apply_to(document);
                applied += 1;
            }
        }
        applied
    }
}

/// File name without its extension
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Definition;
    use serde_json::{json, Map};

    fn order_document() -> DefinitionDocument {
        DefinitionDocument::from_yaml(
            r#"
models:
  - name: Order
    methods:
      - name: foo
    extensions: { table: orders }
extensions: { a: 0, b: 2 }
"#,
        )
        .unwrap()
    }

    fn order_augmentation() -> AugmentationDocument {
        AugmentationDocument::from_yaml(
            r#"
fqn: Order
extensions: { a: 1 }
models:
  - name: Order
    extensions: { audited: true }
    methods:
      - name: bar
        returnType: string
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_augmentation_merges_before_construction() {
        let index =
            AugmentationIndex::from_documents([(PathBuf::from("x.yml"), order_augmentation())]);

        let mut document = order_document();
        assert_eq!(index.augment("Order", &mut document), 1);

        let definition = Definition::new("Order", document, &Map::new()).unwrap();
        let order = definition.model("Order").unwrap();
        assert!(order.method("bar").is_some());
        assert!(order.method("foo").is_some());
        assert_eq!(order.extensions["audited"], true);
        assert_eq!(order.extensions["table"], "orders");
        assert_eq!(definition.extensions["a"], 1);
        assert_eq!(definition.extensions["b"], 2);
    }

    #[test]
    fn test_keyed_by_file_stem_without_fqn() {
        let mut augmentation = order_augmentation();
        augmentation.fqn = None;

        let index = AugmentationIndex::from_documents([(
            PathBuf::from("augs/Order.yml"),
            augmentation,
        )]);
        assert_eq!(index.get("Order").len(), 1);
        assert!(index.get("x").is_empty());
    }

    #[test]
    fn test_namespace_qualified_match() {
        let mut augmentation = order_augmentation();
        augmentation.fqn = Some("shop.Order".to_string());
        let index = AugmentationIndex::from_documents([(PathBuf::from("a.yml"), augmentation)]);

        let mut document = order_document();
        assert_eq!(index.augment("Order", &mut document), 0);

        document.namespace = Some("shop".to_string());
        assert_eq!(index.augment("Order", &mut document), 1);
    }

    #[test]
    fn test_methods_are_appended_without_deduplication() {
        let index = AugmentationIndex::from_documents([
            (PathBuf::from("a.yml"), order_augmentation()),
            (PathBuf::from("b.yml"), order_augmentation()),
        ]);
        assert_eq!(index.len(), 2);

        let mut document = order_document();
        index.augment("Order", &mut document);

        let names: Vec<_> = document.models[0]
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, ["foo", "bar", "bar"]);
    }

    #[test]
    fn test_unknown_model_patch_is_skipped() {
        let mut augmentation = order_augmentation();
        augmentation.models[0].name = "Invoice".to_string();

        let mut document = order_document();
        augmentation.apply_to(&mut document);

        assert_eq!(document.models[0].methods.len(), 1);
        assert_eq!(document.extensions["a"], json!(1));
    }
}
