//! Render contexts resolved from a [`Definition`].
//!
//! Contexts are plain serializable views of the object model. Extensions are
//! resolved by layering: each level shallowly overrides the levels above it
//! (definition, then contract, then model or service, then property or
//! method).

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::document::Extensions;
use super::model::{Contract, Definition, Enum, Method, Model, Param, Property, Service};
use super::types::{DataType, TypeKind};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct DefinitionContext {
    pub name: String,
    pub namespace: Option<String>,
    pub options: Map<String, JsonValue>,
    pub enums: Vec<EnumContext>,
    pub contracts: Vec<ContractContext>,
    pub models: Vec<ModelContext>,
    pub services: Vec<ServiceContext>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumContext {
    pub name: String,
    pub values: Vec<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractContext {
    pub name: String,
    pub properties: Vec<PropertyContext>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelContext {
    pub name: String,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub base_model: Option<String>,
    pub contracts: Vec<ContractContext>,
    pub properties: Vec<PropertyContext>,
    pub methods: Vec<MethodContext>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceContext {
    pub name: String,
    pub methods: Vec<MethodContext>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyContext {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: JsonValue,
    pub raw_type: String,
    pub contract: Option<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodContext {
    pub name: String,
    pub return_type: Option<JsonValue>,
    pub params: Vec<ParamContext>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamContext {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: JsonValue,
    pub raw_type: String,
}

/// Shallow-merge extension maps; later maps override earlier ones.
pub fn layer_extensions(levels: &[&Extensions]) -> Extensions {
    let mut merged = Extensions::new();
    for level in levels {
        for (key, value) in level.iter() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

impl Definition {
    /// Resolve the render context of this definition
    pub fn resolve_context(&self) -> Result<DefinitionContext> {
        Ok(DefinitionContext {
            name: self.name().to_string(),
            namespace: self.namespace.clone(),
            options: self.options.clone(),
            enums: self.enums.iter().map(|e| self.enum_context(e)).collect(),
            contracts: self
                .contracts
                .iter()
                .map(|c| self.contract_context(c))
                .collect::<Result<_>>()?,
            models: self
                .models
                .iter()
                .map(|m| self.model_context(m))
                .collect::<Result<_>>()?,
            services: self
                .services
                .iter()
                .map(|s| self.service_context(s))
                .collect::<Result<_>>()?,
            extensions: self.extensions.clone(),
        })
    }

    /// Resolve the render context as a JSON value
    pub fn context_value(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self.resolve_context()?)?)
    }

    /// Describe a data type, looking referenced enums and models up by name
    pub fn describe_type(&self, data_type: &DataType) -> Result<JsonValue> {
        let mut descriptor = data_type.descriptor();
        match &data_type.kind {
            TypeKind::Enum(name) => {
                let enumeration = self
                    .enumeration(name)
                    .ok_or_else(|| Error::EnumNotDefined(name.clone()))?;
                if let Some(map) = descriptor.as_object_mut() {
                    map.insert("values".to_string(), enumeration.values.clone().into());
                }
            }
            TypeKind::Model(name) => {
                self.model(name)
                    .ok_or_else(|| Error::ModelNotDefined(name.clone()))?;
            }
            TypeKind::List(item) => {
                let item = self.describe_type(item)?;
                if let Some(map) = descriptor.as_object_mut() {
                    map.insert("itemType".to_string(), item);
                }
            }
            _ => {}
        }
        Ok(descriptor)
    }

    fn enum_context(&self, enumeration: &Enum) -> EnumContext {
        EnumContext {
            name: enumeration.name.clone(),
            values: enumeration.values.clone(),
            extensions: layer_extensions(&[&self.extensions, &enumeration.extensions]),
        }
    }

    fn contract_context(&self, contract: &Contract) -> Result<ContractContext> {
        let inherited = layer_extensions(&[&self.extensions, &contract.extensions]);
        Ok(ContractContext {
            name: contract.name.clone(),
            properties: contract
                .properties
                .iter()
                .map(|p| self.property_context(p, &inherited))
                .collect::<Result<_>>()?,
            extensions: inherited,
        })
    }

    fn model_context(&self, model: &Model) -> Result<ModelContext> {
        let inherited = layer_extensions(&[&self.extensions, &model.extensions]);
        let contracts = self.model_contracts(model)?;

        let properties = model
            .properties
            .iter()
            .map(|property| {
                let source = property
                    .contract
                    .as_deref()
                    .and_then(|name| contracts.iter().find(|c| c.name == name));
                match source {
                    Some(contract) => {
                        let layered = layer_extensions(&[
                            &self.extensions,
                            &contract.extensions,
                            &model.extensions,
                        ]);
                        self.property_context(property, &layered)
                    }
                    None => self.property_context(property, &inherited),
                }
            })
            .collect::<Result<_>>()?;

        Ok(ModelContext {
            name: model.name.clone(),
            is_abstract: model.is_abstract,
            base_model: self.base_model(model)?.map(|base| base.name.clone()),
            contracts: contracts
                .into_iter()
                .map(|c| self.contract_context(c))
                .collect::<Result<_>>()?,
            properties,
            methods: model
                .methods
                .iter()
                .map(|m| self.method_context(m, &inherited))
                .collect::<Result<_>>()?,
            extensions: inherited,
        })
    }

    fn service_context(&self, service: &Service) -> Result<ServiceContext> {
        let inherited = layer_extensions(&[&self.extensions, &service.extensions]);
        Ok(ServiceContext {
            name: service.name.clone(),
            methods: service
                .methods
                .iter()
                .map(|m| self.method_context(m, &inherited))
                .collect::<Result<_>>()?,
            extensions: inherited,
        })
    }

    fn property_context(&self, property: &Property, inherited: &Extensions) -> Result<PropertyContext> {
        Ok(PropertyContext {
            name: property.name.clone(),
            data_type: self.describe_type(&property.data_type)?,
            raw_type: property.raw_type.clone(),
            contract: property.contract.clone(),
            extensions: layer_extensions(&[inherited, &property.extensions]),
        })
    }

    fn method_context(&self, method: &Method, inherited: &Extensions) -> Result<MethodContext> {
        Ok(MethodContext {
            name: method.name.clone(),
            return_type: method
                .return_type
                .as_ref()
                .map(|t| self.describe_type(t))
                .transpose()?,
            params: method
                .params
                .iter()
                .map(|p| self.param_context(p))
                .collect::<Result<_>>()?,
            extensions: layer_extensions(&[inherited, &method.extensions]),
        })
    }

    fn param_context(&self, param: &Param) -> Result<ParamContext> {
        Ok(ParamContext {
            name: param.name.clone(),
            data_type: self.describe_type(&param.data_type)?,
            raw_type: param.raw_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::document::DefinitionDocument;
    use serde_json::json;

    fn definition() -> Definition {
        let doc = DefinitionDocument::from_yaml(
            r#"
namespace: shop
enums:
  - name: Status
    values: [open, closed]
contracts:
  - name: Identified
    properties:
      - { name: id, type: integer }
    extensions: { level: contract, key: contract }
models:
  - name: Order
    contracts: [Identified]
    properties:
      - name: status
        type: Status?
        extensions: { level: property }
    methods:
      - name: cancel
        params:
          - { name: reason, type: "list:string" }
        extensions: { level: method }
    extensions: { level: model }
services:
  - name: Orders
    methods:
      - name: find
        returnType: Order
extensions: { level: definition, root: true }
"#,
        )
        .unwrap();
        Definition::new("Shop", doc, &Map::new()).unwrap()
    }

    #[test]
    fn test_definition_context_shape() {
        let context = definition().context_value().unwrap();
        assert_eq!(context["name"], "Shop");
        assert_eq!(context["namespace"], "shop");
        assert_eq!(context["enums"][0]["values"], json!(["open", "closed"]));
        assert_eq!(context["models"][0]["abstract"], false);
        assert_eq!(context["models"][0]["baseModel"], JsonValue::Null);
        assert_eq!(context["models"][0]["contracts"][0]["name"], "Identified");
        assert_eq!(
            context["services"][0]["methods"][0]["returnType"],
            json!({"dataType": "model", "modelName": "Order", "nullable": false})
        );
    }

    #[test]
    fn test_enum_descriptor_carries_values() {
        let context = definition().context_value().unwrap();
        let status = &context["models"][0]["properties"][0];
        assert_eq!(status["rawType"], "Status?");
        assert_eq!(
            status["type"],
            json!({
                "dataType": "enum",
                "enumName": "Status",
                "nullable": true,
                "values": ["open", "closed"]
            })
        );
    }

    #[test]
    fn test_extension_layering() {
        let context = definition().context_value().unwrap();
        let order = &context["models"][0];

        assert_eq!(order["extensions"]["level"], "model");
        assert_eq!(order["extensions"]["root"], true);
        assert_eq!(order["properties"][0]["extensions"]["level"], "property");
        assert_eq!(order["methods"][0]["extensions"]["level"], "method");
        assert_eq!(order["methods"][0]["extensions"]["root"], true);

        // Merged from the contract: model overrides contract overrides definition
        let id = &order["properties"][1];
        assert_eq!(id["name"], "id");
        assert_eq!(id["contract"], "Identified");
        assert_eq!(id["extensions"]["level"], "model");
        assert_eq!(id["extensions"]["key"], "contract");

        assert_eq!(context["contracts"][0]["extensions"]["level"], "contract");
        assert_eq!(context["enums"][0]["extensions"]["level"], "definition");
    }

    #[test]
    fn test_layer_extensions() {
        let a = json!({"a": 1, "b": 1}).as_object().cloned().unwrap();
        let b = json!({"b": 2}).as_object().cloned().unwrap();
        assert_eq!(
            JsonValue::Object(layer_extensions(&[&a, &b])),
            json!({"a": 1, "b": 2})
        );
    }
}
