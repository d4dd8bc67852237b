//! Build orchestration: targets × outputs × definitions.
//!
//! A build runs in strict stages. Targets are loaded and compiled, then
//! augmentation documents are indexed, then template documents are read,
//! augmented and turned into definitions, and finally every output of every
//! target is rendered for every definition. Work within a stage runs
//! concurrently, bounded by [`Config::concurrency`]; the first failure ends
//! the stage. Files already written are left in place.

pub mod context;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::{Map, Value as JsonValue};
use tokio::{fs, task};

use crate::augmentation::{file_stem, AugmentationDocument, AugmentationIndex};
use crate::config::Config;
use crate::definition::{Definition, DefinitionDocument};
use crate::error::{Error, Result};
use crate::manifest::{BuildManifest, BuildSpec};
use crate::targets::{CompiledOutput, Target, TargetsDir};

/// Executes build specifications
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    targets: TargetsDir,
    working_dir: PathBuf,
}

/// A build with its targets compiled and its definitions constructed
#[derive(Debug)]
pub struct PreparedBuild {
    pub targets: Vec<Target>,
    pub definitions: Vec<Definition>,
    pub augmentations: usize,
    pub output: PathBuf,
}

/// Outcome of one executed build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub output: PathBuf,
    pub targets: Vec<String>,
    pub definitions: Vec<String>,
    pub files: Vec<PathBuf>,
}

impl Generator {
    pub fn new(config: Config, targets: TargetsDir, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            targets,
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    /// Run every build of the manifest
    pub async fn run(&self, manifest: &BuildManifest) -> Result<Vec<BuildReport>> {
        stream::iter(&manifest.builds)
            .map(|build| self.build(build))
            .buffered(self.concurrency())
            .try_collect()
            .await
    }

    /// Load, construct and render one build
    pub async fn build(&self, build: &BuildSpec) -> Result<BuildReport> {
        log::info!(
            "Building {} for targets [{}]",
            build.output,
            build.targets.join(", ")
        );
        let prepared = self.prepare(build).await?;
        let files = self.render(&prepared).await?;

        Ok(BuildReport {
            output: prepared.output,
            targets: prepared.targets.iter().map(|t| t.name().to_string()).collect(),
            definitions: prepared
                .definitions
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
            files,
        })
    }

    /// Run the loading stages of a build without rendering anything
    pub async fn prepare(&self, build: &BuildSpec) -> Result<PreparedBuild> {
        let targets = self.load_targets(&build.targets).await?;
        let augmentations = self.load_augmentations(&build.augmentations).await?;
        let definitions = self.load_definitions(build, &augmentations).await?;

        Ok(PreparedBuild {
            targets,
            definitions,
            augmentations: augmentations.len(),
            output: self.working_dir.join(&build.output),
        })
    }

    async fn load_targets(&self, names: &[String]) -> Result<Vec<Target>> {
        // Preserve the declared order, loading each name once
        let mut seen = BTreeSet::new();
        let names: Vec<&String> = names.iter().filter(|n| seen.insert(*n)).collect();

        stream::iter(names)
            .map(|name| Target::load(&self.targets, name, self.concurrency()))
            .buffered(self.concurrency())
            .try_collect()
            .await
    }

    async fn load_augmentations(&self, patterns: &[String]) -> Result<AugmentationIndex> {
        let paths = self.expand_patterns(patterns).await?;

        let documents: Vec<(PathBuf, AugmentationDocument)> = stream::iter(paths)
            .map(|path| async move {
                let content = fs::read_to_string(&path).await?;
                let document = AugmentationDocument::from_yaml(&content)?;
                log::debug!("Read augmentation {}", path.display());
                Ok::<_, Error>((path, document))
            })
            .buffered(self.concurrency())
            .try_collect()
            .await?;

        Ok(AugmentationIndex::from_documents(documents))
    }

    async fn load_definitions(
        &self,
        build: &BuildSpec,
        augmentations: &AugmentationIndex,
    ) -> Result<Vec<Definition>> {
        let paths = self.expand_patterns(&build.templates).await?;
        let options = layered(&self.config.options, &build.options);
        let extensions = layered(&self.config.extensions, &build.extensions);

        stream::iter(paths)
            .map(|path| {
                let options = &options;
                let extensions = &extensions;
                async move {
                    let mut document = DefinitionDocument::from_file(&path).await?;
                    let name = file_stem(&path);

                    augmentations.augment(&name, &mut document);
                    for (key, value) in extensions {
                        document.extensions.insert(key.clone(), value.clone());
                    }

                    Definition::new(name, document, options)
                }
            })
            .buffered(self.concurrency())
            .try_collect()
            .await
    }

    /// Render every (target, output, definition) combination of a build.
    ///
    /// Returns the paths written.
    pub async fn render(&self, prepared: &PreparedBuild) -> Result<Vec<PathBuf>> {
        let contexts = prepared
            .definitions
            .iter()
            .map(|d| d.context_value().map(|value| (d.name(), value)))
            .collect::<Result<Vec<_>>>()?;

        let mut jobs = Vec::new();
        for target in &prepared.targets {
            for output in target.outputs() {
                for (name, context) in &contexts {
                    jobs.push((target, output, *name, context));
                }
            }
        }

        let written: Vec<Vec<PathBuf>> = stream::iter(jobs)
            .map(|(target, output, name, definition)| {
                render_output(target, output, name, definition, &prepared.output)
            })
            .buffer_unordered(self.concurrency())
            .try_collect()
            .await?;

        Ok(written.into_iter().flatten().collect())
    }

    /// Expand glob patterns relative to the working directory into a sorted,
    /// de-duplicated list of files
    async fn expand_patterns(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        // The base directory is literal; only the user's pattern may glob
        let base = PathBuf::from(glob::Pattern::escape(&self.working_dir.to_string_lossy()));
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| base.join(p).to_string_lossy().into_owned())
            .collect();

        let expanded: Vec<Vec<PathBuf>> = stream::iter(patterns)
            .map(|pattern| async move {
                task::spawn_blocking(move || {
                    let mut files = Vec::new();
                    for entry in glob::glob(&pattern)? {
                        let path = entry?;
                        if path.is_file() {
                            files.push(path);
                        }
                    }
                    log::debug!("Pattern {} matched {} files", pattern, files.len());
                    Ok::<_, Error>(files)
                })
                .await
                .unwrap_or_else(|e| Err(Error::template(format!("Glob task failed: {}", e))))
            })
            .buffered(self.concurrency())
            .try_collect()
            .await?;

        let unique: BTreeSet<PathBuf> = expanded.into_iter().flatten().collect();
        Ok(unique.into_iter().collect())
    }
}

/// Render one output of one target for one definition, fanning out over
/// sequence contexts
async fn render_output(
    target: &Target,
    output: &CompiledOutput,
    definition_name: &str,
    definition: &JsonValue,
    output_root: &Path,
) -> Result<Vec<PathBuf>> {
    if !target.has_template(output.template_name()) {
        return Err(Error::TemplateNotDefined {
            target: target.name().to_string(),
            template: output.template_name().to_string(),
        });
    }

    let resolved = context::resolve(definition_name, definition, output.context_path())?;

    let mut written = Vec::new();
    for element in context::fan_out(resolved) {
        let render_context = context::normalize(element, definition, target)?;
        let relative = target.render_path(output, &render_context)?;
        let contents = target.render_contents(output, &render_context)?;

        let path = output_root.join(relative.trim_start_matches(['/', '\\']));
        log::info!("Generating output for {}...", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, contents).await?;
        written.push(path);
    }
    Ok(written)
}

fn layered(base: &Map<String, JsonValue>, overrides: &Map<String, JsonValue>) -> Map<String, JsonValue> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
