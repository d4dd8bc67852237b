//! Symvasi Core Library
//!
//! This library provides the core functionality for generating source code
//! in several target languages from declarative interface definitions:
//! enums, contracts, models and services described in YAML documents and
//! rendered through per-target template sets.

pub mod augmentation;
pub mod build;
pub mod config;
pub mod definition;
pub mod error;
pub mod generate;
pub mod manifest;
pub mod targets;
pub mod utils;

pub use crate::{
    augmentation::{AugmentationDocument, AugmentationIndex},
    build::{BuildReport, Generator, PreparedBuild},
    config::Config,
    definition::{DataType, Definition, DefinitionDocument, TypeKind},
    error::{Error, Result},
    generate::{check, generate},
    manifest::{BuildManifest, BuildSpec, OutputDeclaration, TargetParams},
    targets::{Target, TargetsDir},
};
