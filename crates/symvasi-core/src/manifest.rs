//! Build manifest and target parameter file formats.
//!
//! A build manifest lists one or more builds, each tying target names,
//! template glob patterns and augmentation glob patterns to an output
//! directory. Each target directory carries a `params` file declaring the
//! outputs it renders.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use serde_value::Value as SerdeValue;
use tokio::fs;

/// The root build manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Builds to execute
    #[serde(default)]
    pub builds: Vec<BuildSpec>,
}

/// One build: which targets to render which template documents with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSpec {
    /// Names of the targets to render
    #[serde(deserialize_with = "deserialize_patterns")]
    pub targets: Vec<String>,

    /// Glob patterns selecting the template documents
    #[serde(deserialize_with = "deserialize_patterns")]
    pub templates: Vec<String>,

    /// Glob patterns selecting augmentation documents
    #[serde(default, deserialize_with = "deserialize_patterns")]
    pub augmentations: Vec<String>,

    /// Options overriding those declared by each document
    #[serde(default)]
    pub options: Map<String, JsonValue>,

    /// Extensions overriding those declared by each document
    #[serde(default)]
    pub extensions: Map<String, JsonValue>,

    /// Output root for generated files
    pub output: String,
}

/// Contents of a target's `params` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetParams {
    /// File extension identifier of the target platform
    #[serde(default)]
    pub extension: String,

    /// Outputs rendered for every definition, in declaration order
    #[serde(default)]
    pub outputs: Vec<OutputDeclaration>,
}

/// A single rendering unit of a target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDeclaration {
    /// Logical name of the output template (path under `outputs/`, no extension)
    pub template_name: String,

    /// Template of the output file path, relative to the build output root
    pub path: String,

    /// Optional dotted path selecting the render context within a definition
    #[serde(default)]
    pub context: Option<String>,
}

impl BuildManifest {
    /// Parse a manifest from YAML text
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a build manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or contains invalid YAML.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            crate::Error::config(format!(
                "Failed to read build manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }
}

impl TargetParams {
    /// Load the params file of a target directory.
    ///
    /// Looks for `params.yml`, `params.yaml` and then `params.toml`.
    pub async fn load_from_dir(target_dir: &Path) -> crate::Result<Self> {
        for file_name in ["params.yml", "params.yaml"] {
            let path = target_dir.join(file_name);
            if fs::try_exists(&path).await? {
                log::debug!("Reading target params from {}", path.display());
                let content = fs::read_to_string(&path).await?;
                return Ok(serde_yaml::from_str(&content)?);
            }
        }

        let path = target_dir.join("params.toml");
        if fs::try_exists(&path).await? {
            log::debug!("Reading target params from {}", path.display());
            let content = fs::read_to_string(&path).await?;
            return Ok(toml::from_str(&content)?);
        }

        Err(crate::Error::config(format!(
            "No params file found in target directory {}",
            target_dir.display()
        )))
    }
}

/// Deserialize either a single string or a list of strings
fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = SerdeValue::deserialize(deserializer)?;

    match value {
        SerdeValue::String(s) => Ok(vec![s]),
        SerdeValue::Seq(seq) => seq
            .into_iter()
            .map(|item| match item {
                SerdeValue::String(s) => Ok(s),
                _ => Err(serde::de::Error::custom(
                    "Expected string or array of strings",
                )),
            })
            .collect(),
        SerdeValue::Unit | SerdeValue::Option(None) => Ok(Vec::new()),
        _ => Err(serde::de::Error::custom(
            "Expected string or array of strings",
        )),
    }
}
