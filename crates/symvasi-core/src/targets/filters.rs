//! Template helpers registered on every target's template engine.
//!
//! Filters: `lower_case`, `upper_case`, `lower_case_first`,
//! `upper_case_first`, `camel_case`, `pascal_case`, `kebab_case`,
//! `snake_case`, `list_item_type` and `ext(name="...")`.
//! Testers: `nullable` and `data_type("<name>")`, applied to type
//! descriptors.

use std::collections::HashMap;

use tera::{Tera, Value};

use crate::utils::{
    lower_first, to_kebab_case, to_lower_camel_case, to_snake_case, to_upper_camel_case,
    upper_first,
};

/// Register all helpers on `tera`
pub fn register(tera: &mut Tera) {
    register_case_filter(tera, "lower_case", |s| s.to_lowercase());
    register_case_filter(tera, "upper_case", |s| s.to_uppercase());
    register_case_filter(tera, "lower_case_first", lower_first);
    register_case_filter(tera, "upper_case_first", upper_first);
    register_case_filter(tera, "camel_case", to_lower_camel_case);
    register_case_filter(tera, "pascal_case", to_upper_camel_case);
    register_case_filter(tera, "kebab_case", to_kebab_case);
    register_case_filter(tera, "snake_case", to_snake_case);

    tera.register_filter("list_item_type", list_item_type);
    tera.register_filter("ext", extension);

    tera.register_tester("nullable", is_nullable);
    tera.register_tester("data_type", is_data_type);
}

fn register_case_filter(tera: &mut Tera, name: &str, convert: fn(&str) -> String) {
    tera.register_filter(
        name,
        move |value: &Value, _: &HashMap<String, Value>| -> tera::Result<Value> {
            Ok(Value::String(match value {
                Value::Null => String::new(),
                Value::String(s) => convert(s),
                other => convert(&other.to_string()),
            }))
        },
    );
}

/// `dataType` of a list descriptor's `itemType`, else an empty string
fn list_item_type(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let item_type = match value.get("dataType").and_then(Value::as_str) {
        Some("list") => value
            .get("itemType")
            .and_then(|item| item.get("dataType"))
            .cloned(),
        _ => None,
    };
    Ok(item_type.unwrap_or_else(|| Value::String(String::new())))
}

/// Value of the named extension of a context object, else an empty string
fn extension(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("Filter `ext` expected an argument `name`"))?;

    Ok(value
        .get("extensions")
        .and_then(|extensions| extensions.get(name))
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::String(String::new())))
}

fn is_nullable(value: Option<&Value>, _: &[Value]) -> tera::Result<bool> {
    Ok(value
        .and_then(|v| v.get("nullable"))
        .and_then(Value::as_bool)
        .unwrap_or(false))
}

fn is_data_type(value: Option<&Value>, args: &[Value]) -> tera::Result<bool> {
    let expected = args
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("Tester `data_type` expected a type name"))?;

    Ok(value
        .and_then(|v| v.get("dataType"))
        .and_then(Value::as_str)
        .is_some_and(|actual| actual == expected))
}
