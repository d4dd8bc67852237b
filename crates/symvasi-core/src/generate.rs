//! Code generation entry points for symvasi

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::{
    build::{BuildReport, Generator, PreparedBuild},
    config::Config,
    error::Result,
    manifest::BuildManifest,
};

/// Main entry point for code generation: run every build of a manifest
pub async fn generate<P: AsRef<Path>>(config: &Config, manifest_path: P) -> Result<Vec<BuildReport>> {
    // 1. Load the manifest
    let manifest = BuildManifest::from_file(manifest_path.as_ref()).await?;

    // 2. Resolve targets root and working directory
    let generator = generator_for(config, manifest_path.as_ref())?;

    // 3. Run builds
    let reports = generator.run(&manifest).await?;

    let files: usize = reports.iter().map(|r| r.files.len()).sum();
    log::info!("Generated {} files in {} builds", files, reports.len());
    Ok(reports)
}

/// Load every build of a manifest without writing any output.
///
/// Catches unknown targets, unreadable params, template syntax errors,
/// unsupported types and conflicting contracts.
pub async fn check<P: AsRef<Path>>(config: &Config, manifest_path: P) -> Result<Vec<PreparedBuild>> {
    let manifest = BuildManifest::from_file(manifest_path.as_ref()).await?;
    let generator = generator_for(config, manifest_path.as_ref())?;

    stream::iter(&manifest.builds)
        .map(|build| generator.prepare(build))
        .buffered(config.concurrency.max(1))
        .try_collect()
        .await
}

fn generator_for(config: &Config, manifest_path: &Path) -> Result<Generator> {
    let manifest_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let working_dir = config.working_dir_or(&manifest_dir);
    let targets = config.targets()?;

    log::debug!(
        "Working directory {}, targets root {}",
        working_dir.display(),
        targets.root_dir().display()
    );
    Ok(Generator::new(config.clone(), targets, working_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;
    use tokio::fs;

    async fn fixture(root: &Path) -> std::io::Result<()> {
        fs::create_dir_all(root.join("targets/txt/outputs")).await?;
        fs::create_dir_all(root.join("project/defs")).await?;
        fs::write(
            root.join("targets/txt/params.yml"),
            "extension: txt\noutputs:\n  - templateName: main\n    path: \"{{ name }}.txt\"\n",
        )
        .await?;
        fs::write(root.join("targets/txt/outputs/main.tpl"), "{{ name | upper_case }}").await?;
        fs::write(root.join("project/defs/Order.yml"), "models: []\n").await?;
        fs::write(
            root.join("project/symvasi.yml"),
            "builds:\n  - targets: txt\n    templates: defs/*.yml\n    output: gen\n",
        )
        .await
    }

    fn config(root: &Path) -> Config {
        let mut config = Config::new();
        config.targets_dir = Some(root.join("targets"));
        config
    }

    #[tokio::test]
    async fn test_generate_relative_to_manifest() -> Result<()> {
        let dir = tempdir()?;
        fixture(dir.path()).await?;

        let reports = generate(&config(dir.path()), dir.path().join("project/symvasi.yml")).await?;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].definitions, ["Order"]);

        let written = dir.path().join("project/gen/Order.txt");
        assert_eq!(reports[0].files, vec![written.clone()]);
        assert_eq!(fs::read_to_string(written).await?, "ORDER");
        Ok(())
    }

    #[tokio::test]
    async fn test_check_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        fixture(dir.path()).await?;

        let prepared = check(&config(dir.path()), dir.path().join("project/symvasi.yml")).await?;
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].definitions.len(), 1);
        assert!(!dir.path().join("project/gen").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = tempdir().unwrap();
        let result = generate(&config(dir.path()), dir.path().join("nope.yml")).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
