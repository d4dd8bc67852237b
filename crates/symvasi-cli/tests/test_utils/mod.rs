//! Test utilities for symvasi CLI integration tests

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use tempfile::TempDir;

/// Creates a temporary directory for test inputs and outputs
pub fn create_temp_dir() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let temp_path = temp_dir.path().to_path_buf();
    Ok((temp_dir, temp_path))
}

fn write(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Creates a `txt` target rendering one file per definition and one per model
pub fn create_test_target(targets_dir: &Path) -> anyhow::Result<()> {
    let target = targets_dir.join("txt");
    write(
        &target.join("params.yml"),
        r#"
extension: txt
outputs:
  - templateName: definition
    path: "{{ name }}/{{ name }}.{{ target.extension }}"
  - templateName: models/model
    path: "{{ definition.name }}/models/{{ name | kebab_case }}.txt"
    context: models
"#,
    )?;
    write(&target.join("partials/header.tpl"), "# generated by symvasi")?;
    write(
        &target.join("outputs/definition.tpl"),
        "{% include \"header\" %}\n{% for model in models %}{{ model.name }}\n{% endfor %}",
    )?;
    write(
        &target.join("outputs/models/model.tpl"),
        "{% for p in properties %}{{ p.name }}: {{ p.type.dataType }}{% if p.type is nullable %}?{% endif %}\n{% endfor %}",
    )
}

/// Creates a project with a manifest, one definition and one augmentation.
///
/// Returns the manifest path.
pub fn create_test_project(project_dir: &Path) -> anyhow::Result<PathBuf> {
    write(
        &project_dir.join("defs/Shop.yml"),
        r#"
contracts:
  - name: Entity
    properties:
      - { name: id, type: int }
models:
  - name: OrderLine
    contracts: [Entity]
    properties:
      - { name: note, type: string? }
  - name: Customer
"#,
    )?;
    write(
        &project_dir.join("augs/Shop.yml"),
        "extensions:\n  package: shop\n",
    )?;

    let manifest = project_dir.join("symvasi.yml");
    write(
        &manifest,
        r#"
builds:
  - targets: txt
    templates: defs/*.yml
    augmentations: augs/*.yml
    output: gen
"#,
    )?;
    Ok(manifest)
}
