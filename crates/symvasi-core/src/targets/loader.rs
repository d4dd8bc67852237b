//! Loading and compiling a target's templates

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};
use tera::{Context, Tera};
use tokio::fs;

use super::dir::{list_files, TargetDir, TargetsDir};
use super::filters;
use crate::error::{Error, Result};
use crate::manifest::{OutputDeclaration, TargetParams};

/// Template name prefix under which output path templates are compiled
const PATH_TEMPLATE_PREFIX: &str = "@path/";

/// A target with its params and compiled templates
#[derive(Debug)]
pub struct Target {
    name: String,
    params: TargetParams,
    tera: Tera,
    templates: BTreeSet<String>,
    outputs: Vec<CompiledOutput>,
}

/// An output declaration with its compiled path template
#[derive(Debug, Clone)]
pub struct CompiledOutput {
    pub declaration: OutputDeclaration,
    path_template: String,
}

impl CompiledOutput {
    pub fn template_name(&self) -> &str {
        &self.declaration.template_name
    }

    pub fn context_path(&self) -> Option<&str> {
        self.declaration.context.as_deref()
    }
}

impl Target {
    /// Load the named target from the targets root.
    ///
    /// Partials (`partials/*`) are registered under their file stem; output
    /// templates (`outputs/**/*`) under their path relative to `outputs/`
    /// with the extension stripped. File reads run up to `concurrency` at a
    /// time.
    pub async fn load(targets: &TargetsDir, name: &str, concurrency: usize) -> Result<Self> {
        let target_dir = targets.target(name);
        if !target_dir.exists().await {
            return Err(Error::TargetNotDefined(name.to_string()));
        }
        log::debug!("Loading target {} from {}", name, target_dir.path().display());

        let params = TargetParams::load_from_dir(target_dir.path()).await?;

        let partials_dir = target_dir.partials_dir();
        let partials = read_templates(
            list_files(&partials_dir, false).await?,
            &partials_dir,
            concurrency,
            |_, path| partial_name(path),
        )
        .await?;

        let outputs_dir = target_dir.outputs_dir();
        let templates = read_templates(
            list_files(&outputs_dir, true).await?,
            &outputs_dir,
            concurrency,
            output_name,
        )
        .await?;

        Self::compile(&target_dir, params, partials, templates)
    }

    /// Compile a target from already loaded template sources
    pub fn compile(
        target_dir: &TargetDir,
        params: TargetParams,
        partials: Vec<(String, String)>,
        templates: Vec<(String, String)>,
    ) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        filters::register(&mut tera);

        let partial_names: BTreeSet<String> =
            partials.iter().map(|(name, _)| name.clone()).collect();
        let template_names: BTreeSet<String> =
            templates.iter().map(|(name, _)| name.clone()).collect();
        if let Some(shared) = partial_names.intersection(&template_names).next() {
            return Err(Error::template(format!(
                "Target \"{}\" declares \"{}\" as both a partial and an output template",
                target_dir.name(),
                shared
            )));
        }

        // Partials first so output templates can import and include them
        tera.add_raw_templates(partials)?;
        tera.add_raw_templates(templates)?;

        let mut outputs = Vec::with_capacity(params.outputs.len());
        for (index, declaration) in params.outputs.iter().enumerate() {
            let path_template = format!("{}{}", PATH_TEMPLATE_PREFIX, index);
            tera.add_raw_template(&path_template, &declaration.path)
                .map_err(|e| {
                    Error::template(format!(
                        "Invalid path template \"{}\" of output \"{}\" in target \"{}\": {}",
                        declaration.path,
                        declaration.template_name,
                        target_dir.name(),
                        e
                    ))
                })?;
            outputs.push(CompiledOutput {
                declaration: declaration.clone(),
                path_template,
            });
        }

        log::debug!(
            "Compiled target {}: {:?}",
            target_dir.name(),
            tera.get_template_names()
                .filter(|name| !name.starts_with(PATH_TEMPLATE_PREFIX))
                .collect::<Vec<_>>()
        );

        Ok(Self {
            name: target_dir.name().to_string(),
            params,
            tera,
            templates: template_names,
            outputs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &TargetParams {
        &self.params
    }

    pub fn extension(&self) -> &str {
        &self.params.extension
    }

    pub fn outputs(&self) -> &[CompiledOutput] {
        &self.outputs
    }

    /// Check if an output template exists. Partials don't count.
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains(name)
    }

    /// Names of all compiled partials and output templates
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self
            .tera
            .get_template_names()
            .filter(|name| !name.starts_with(PATH_TEMPLATE_PREFIX))
            .collect();
        names.sort_unstable();
        names
    }

    /// Render the output's template.
    ///
    /// # Errors
    ///
    /// `TemplateNotDefined` when the declared template was not compiled.
    pub fn render_contents(&self, output: &CompiledOutput, context: &Context) -> Result<String> {
        if !self.has_template(output.template_name()) {
            return Err(Error::TemplateNotDefined {
                target: self.name.clone(),
                template: output.template_name().to_string(),
            });
        }

        self.tera
            .render(output.template_name(), context)
            .map_err(|e| {
                Error::template(format!(
                    "Failed to render template '{}' of target '{}': {}",
                    output.template_name(),
                    self.name,
                    render_error_chain(&e)
                ))
            })
    }

    /// Render the output's path template, trimmed
    pub fn render_path(&self, output: &CompiledOutput, context: &Context) -> Result<String> {
        let rendered = self
            .tera
            .render(&output.path_template, context)
            .map_err(|e| {
                Error::template(format!(
                    "Failed to render path '{}' of output '{}': {}",
                    output.declaration.path,
                    output.template_name(),
                    render_error_chain(&e)
                ))
            })?;

        let rendered = rendered.trim();
        if rendered.is_empty() {
            return Err(Error::template(format!(
                "Path template '{}' of output '{}' rendered an empty path",
                output.declaration.path,
                output.template_name()
            )));
        }
        Ok(rendered.to_string())
    }
}

async fn read_templates<F>(
    files: Vec<PathBuf>,
    root: &Path,
    concurrency: usize,
    name_of: F,
) -> Result<Vec<(String, String)>>
where
    F: Fn(&Path, &Path) -> String,
{
    let names: Vec<(String, PathBuf)> = files
        .into_iter()
        .map(|path| (name_of(root, &path), path))
        .collect();

    stream::iter(names)
        .map(|(name, path)| async move {
            let content = fs::read_to_string(&path).await.map_err(|e| {
                Error::template(format!(
                    "Failed to read template {}: {}",
                    path.display(),
                    e
                ))
            })?;
            log::debug!("Read template {} from {}", name, path.display());
            Ok::<_, Error>((name, content))
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await
}

fn partial_name(path: &Path) -> String {
    crate::augmentation::file_stem(path)
}

/// Logical output name: path relative to `root`, `/`-separated, with the
/// file extension stripped
fn output_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let stem = relative.with_extension("");
    stem.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Flatten a template error and its sources into one line
fn render_error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut current: &dyn std::error::Error = error;
    while let Some(source) = current.source() {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source;
    }
    message
}
