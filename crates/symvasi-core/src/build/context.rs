//! Render context extraction and normalization.

use serde_json::{json, Value as JsonValue};
use tera::Context;

use crate::error::{Error, Result};
use crate::targets::Target;

/// Follow a dotted path through object keys and array indices.
///
/// An empty path selects `root` itself. A missing or null result is `None`.
pub fn extract<'a>(root: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.trim();
    if path.is_empty() {
        return Some(root);
    }

    path.split('.')
        .try_fold(root, |current, segment| match current {
            JsonValue::Object(map) => map.get(segment),
            JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|value| !value.is_null())
}

/// Resolve the context of an output for one definition
pub fn resolve<'a>(
    definition_name: &str,
    definition: &'a JsonValue,
    path: Option<&str>,
) -> Result<&'a JsonValue> {
    match path {
        Some(path) => extract(definition, path).ok_or_else(|| Error::ContextNotFound {
            definition: definition_name.to_string(),
            path: path.to_string(),
        }),
        None => Ok(definition),
    }
}

/// Elements to render: one per item of a sequence, otherwise the value itself
pub fn fan_out(value: &JsonValue) -> Vec<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Build the template context for one render.
///
/// Object keys are exposed at the top level, any other value as `value`.
/// `definition` and `target` are always available.
pub fn normalize(element: &JsonValue, definition: &JsonValue, target: &Target) -> Result<Context> {
    let mut context = match element {
        JsonValue::Object(_) => Context::from_value(element.clone())?,
        other => {
            let mut context = Context::new();
            context.insert("value", other);
            context
        }
    };
    context.insert("definition", definition);
    context.insert(
        "target",
        &json!({
            "name": target.name(),
            "extension": target.extension(),
        }),
    );
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> JsonValue {
        json!({
            "name": "Order",
            "models": [{"name": "A"}, {"name": "B"}],
            "extensions": {"package": "shop", "empty": null},
        })
    }

    #[test]
    fn test_extract() {
        let root = definition();
        assert_eq!(extract(&root, "models").unwrap().as_array().unwrap().len(), 2);
        assert_eq!(extract(&root, "models.1.name").unwrap(), "B");
        assert_eq!(extract(&root, "extensions.package").unwrap(), "shop");
        assert_eq!(extract(&root, ""), Some(&root));

        assert!(extract(&root, "models.5").is_none());
        assert!(extract(&root, "models.x").is_none());
        assert!(extract(&root, "services").is_none());
        assert!(extract(&root, "extensions.empty").is_none());
        assert!(extract(&root, "name.inner").is_none());
    }

    #[test]
    fn test_resolve_missing_path() {
        let root = definition();
        match resolve("Order", &root, Some("services")) {
            Err(Error::ContextNotFound { definition, path }) => {
                assert_eq!(definition, "Order");
                assert_eq!(path, "services");
            }
            other => panic!("expected ContextNotFound, got {other:?}"),
        }
        assert_eq!(resolve("Order", &root, None).unwrap(), &root);
    }

    #[test]
    fn test_fan_out() {
        let root = definition();
        assert_eq!(fan_out(&root["models"]).len(), 2);
        assert_eq!(fan_out(&root).len(), 1);
        assert!(fan_out(&json!([])).is_empty());
    }
}
