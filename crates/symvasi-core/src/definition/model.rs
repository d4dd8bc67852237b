//! The typed object model built from a definition document.

use serde_json::{Map, Value as JsonValue};

use super::document::{
    ContractDocument, DefinitionDocument, EnumDocument, Extensions, MethodDocument,
    ModelDocument, ParamDocument, PropertyDocument, ServiceDocument,
};
use super::types::{parse_type, DataType, KnownNames};
use crate::error::{Error, Result};

/// The fully resolved object model of one template document.
///
/// Built once and immutable afterwards; every type has been resolved and
/// every contract merged, so no partially valid definition is observable.
#[derive(Debug, Clone)]
pub struct Definition {
    name: String,
    pub namespace: Option<String>,
    pub options: Map<String, JsonValue>,
    pub enums: Vec<Enum>,
    pub contracts: Vec<Contract>,
    pub models: Vec<Model>,
    pub services: Vec<Service>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    pub values: Vec<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone)]
pub struct Contract {
    pub name: String,
    pub properties: Vec<ContractProperty>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub is_abstract: bool,
    /// Name of the base model, looked up through [`Definition::model`]
    pub base_model: Option<String>,
    pub properties: Vec<ModelProperty>,
    pub methods: Vec<ModelMethod>,
    /// Names of the included contracts, in declaration order
    pub contracts: Vec<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub methods: Vec<ServiceMethod>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    /// The type string as written in the document
    pub raw_type: String,
    pub data_type: DataType,
    /// Contract this property was merged from, if any
    pub contract: Option<String>,
    pub extensions: Extensions,
}

pub type ContractProperty = Property;
pub type ModelProperty = Property;

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub return_type: Option<DataType>,
    pub params: Vec<Param>,
    pub extensions: Extensions,
}

pub type ModelMethod = Method;
pub type ServiceMethod = Method;

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub raw_type: String,
    pub data_type: DataType,
}

impl Definition {
    /// Build a definition from a raw document.
    ///
    /// `options` override the options declared by the document.
    pub fn new(
        name: impl Into<String>,
        document: DefinitionDocument,
        options: &Map<String, JsonValue>,
    ) -> Result<Self> {
        let name = name.into();
        let DefinitionDocument {
            namespace,
            options: mut document_options,
            enums,
            contracts,
            models,
            services,
            extensions,
        } = document;

        // Names first, so types can reference any enum or model of the document
        let known = KnownNames::new(
            enums.iter().map(|e| e.name.clone()),
            models.iter().map(|m| m.name.clone()),
        );

        let enums = enums.into_iter().map(Enum::new).collect::<Vec<_>>();
        let contracts = contracts
            .into_iter()
            .map(|doc| Contract::new(doc, &known))
            .collect::<Result<Vec<_>>>()?;
        let models = models
            .into_iter()
            .map(|doc| Model::new(doc, &known, &contracts))
            .collect::<Result<Vec<_>>>()?;
        let services = services
            .into_iter()
            .map(|doc| Service::new(doc, &known))
            .collect::<Result<Vec<_>>>()?;

        for (key, value) in options {
            document_options.insert(key.clone(), value.clone());
        }

        let definition = Self {
            name,
            namespace,
            options: document_options,
            enums,
            contracts,
            models,
            services,
            extensions,
        };
        definition.check_base_models()?;

        log::debug!(
            "Built definition {} ({} enums, {} contracts, {} models, {} services)",
            definition.name,
            definition.enums.len(),
            definition.contracts.len(),
            definition.models.len(),
            definition.services.len()
        );
        Ok(definition)
    }

    /// Identity of the definition, fixed at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn contract(&self, name: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.name == name)
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Resolve the base model of `model`, if it declares one
    pub fn base_model(&self, model: &Model) -> Result<Option<&Model>> {
        match &model.base_model {
            Some(base) => self
                .model(base)
                .map(Some)
                .ok_or_else(|| Error::ModelNotDefined(base.clone())),
            None => Ok(None),
        }
    }

    /// Resolve the contracts included by `model`, in declaration order
    pub fn model_contracts(&self, model: &Model) -> Result<Vec<&Contract>> {
        model
            .contracts
            .iter()
            .map(|name| {
                self.contract(name).ok_or_else(|| Error::ContractNotDefined {
                    model: model.name.clone(),
                    contract: name.clone(),
                })
            })
            .collect()
    }

    fn check_base_models(&self) -> Result<()> {
        for model in &self.models {
            self.base_model(model)?;
        }
        Ok(())
    }
}

impl Enum {
    fn new(doc: EnumDocument) -> Self {
        Self {
            name: doc.name,
            values: doc.values,
            extensions: doc.extensions,
        }
    }
}

impl Contract {
    fn new(doc: ContractDocument, known: &KnownNames) -> Result<Self> {
        Ok(Self {
            name: doc.name,
            properties: doc
                .properties
                .into_iter()
                .map(|p| Property::new(p, known))
                .collect::<Result<Vec<_>>>()?,
            extensions: doc.extensions,
        })
    }
}

impl Model {
    fn new(doc: ModelDocument, known: &KnownNames, contracts: &[Contract]) -> Result<Self> {
        let mut model = Self {
            name: doc.name,
            is_abstract: doc.is_abstract,
            base_model: doc.base_model,
            properties: doc
                .properties
                .into_iter()
                .map(|p| Property::new(p, known))
                .collect::<Result<Vec<_>>>()?,
            methods: doc
                .methods
                .into_iter()
                .map(|m| Method::new(m, known))
                .collect::<Result<Vec<_>>>()?,
            contracts: doc.contracts,
            extensions: doc.extensions,
        };

        let included = model
            .contracts
            .iter()
            .map(|name| {
                contracts
                    .iter()
                    .find(|c| &c.name == name)
                    .ok_or_else(|| Error::ContractNotDefined {
                        model: model.name.clone(),
                        contract: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for contract in included {
            for property in &contract.properties {
                model.include_property(contract, property)?;
            }
        }

        Ok(model)
    }

    /// Append a contract property unless one with the same name exists, in
    /// which case both must resolve to the same type.
    fn include_property(&mut self, contract: &Contract, property: &Property) -> Result<()> {
        match self.properties.iter().find(|p| p.name == property.name) {
            Some(existing) if existing.data_type != property.data_type => {
                Err(Error::PropertyTypeConflict {
                    model: self.name.clone(),
                    property: property.name.clone(),
                    existing: existing.raw_type.clone(),
                    incoming: property.raw_type.clone(),
                })
            }
            Some(_) => Ok(()),
            None => {
                self.properties.push(Property {
                    contract: Some(contract.name.clone()),
                    ..property.clone()
                });
                Ok(())
            }
        }
    }

    pub fn property(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&ModelMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl Service {
    fn new(doc: ServiceDocument, known: &KnownNames) -> Result<Self> {
        Ok(Self {
            name: doc.name,
            methods: doc
                .methods
                .into_iter()
                .map(|m| Method::new(m, known))
                .collect::<Result<Vec<_>>>()?,
            extensions: doc.extensions,
        })
    }
}

impl Property {
    fn new(doc: PropertyDocument, known: &KnownNames) -> Result<Self> {
        Ok(Self {
            data_type: parse_type(&doc.type_name, known)?,
            raw_type: doc.type_name,
            name: doc.name,
            contract: None,
            extensions: doc.extensions,
        })
    }
}

impl Method {
    fn new(doc: MethodDocument, known: &KnownNames) -> Result<Self> {
        Ok(Self {
            name: doc.name,
            return_type: doc
                .return_type
                .as_deref()
                .map(|raw| parse_type(raw, known))
                .transpose()?,
            params: doc
                .params
                .into_iter()
                .map(|p| Param::new(p, known))
                .collect::<Result<Vec<_>>>()?,
            extensions: doc.extensions,
        })
    }
}

impl Param {
    fn new(doc: ParamDocument, known: &KnownNames) -> Result<Self> {
        Ok(Self {
            data_type: parse_type(&doc.type_name, known)?,
            raw_type: doc.type_name,
            name: doc.name,
        })
    }
}
