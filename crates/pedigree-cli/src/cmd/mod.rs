//! Subcommand handlers.
//!
//! Every handler loads the document named on the command line together with
//! the `pedigree.toml` beside it, runs one operation, and (for edits) writes
//! the document back.

pub mod chart;
pub mod merge;
pub mod normalize;
pub mod reorder;
pub mod reparent;

use anyhow::{Context, Result};
use clap::Args;
use pedigree_core::config::{ProjectConfig, load_project_config};
use pedigree_core::graph::RelationshipGraph;
use pedigree_core::model::Document;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments shared by every command that rewrites the document.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// GedcomX JSON document to read.
    pub doc: PathBuf,

    /// Write the edited document here instead of back to <DOC>.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// A loaded document and its project config.
#[derive(Debug)]
pub struct Workspace {
    pub path: PathBuf,
    pub doc: Document,
    pub config: ProjectConfig,
}

impl Workspace {
    /// Read `path` and the project config from its directory.
    ///
    /// # Errors
    ///
    /// Fails when either file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc: Document = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let config = load_project_config(dir)?;
        debug!(
            path = %path.display(),
            persons = doc.persons.len(),
            relationships = doc.relationships.len(),
            "document loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            config,
        })
    }

    /// Derive the relationship graph of the current document.
    ///
    /// # Errors
    ///
    /// Propagates graph integrity errors.
    pub fn graph(&self) -> Result<RelationshipGraph> {
        Ok(RelationshipGraph::build(&self.doc)?)
    }

    /// Write the document to `output`, or back to its source path.
    ///
    /// In-place writes first copy the original to `<file>.bak` when the
    /// project config asks for backups. Returns the path written.
    ///
    /// # Errors
    ///
    /// Fails when the backup or the document cannot be written.
    pub fn save(&self, output: Option<&Path>) -> Result<PathBuf> {
        let target = output.unwrap_or(&self.path).to_path_buf();
        if target == self.path && self.config.edit.write_backup {
            let backup = backup_path(&self.path);
            fs::copy(&self.path, &backup)
                .with_context(|| format!("Failed to write backup {}", backup.display()))?;
            debug!(backup = %backup.display(), "backup written");
        }
        let mut json = serde_json::to_string_pretty(&self.doc)?;
        json.push('\n');
        fs::write(&target, json)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        info!(path = %target.display(), "document written");
        Ok(target)
    }
}

/// `<file>.bak` next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// JSON envelope for every mutating command.
#[derive(Debug, Serialize)]
pub struct EditOutcome<T: Serialize> {
    pub ok: bool,
    pub command: &'static str,
    pub written: String,
    pub result: T,
}

impl<T: Serialize> EditOutcome<T> {
    pub fn new(command: &'static str, written: &Path, result: T) -> Self {
        Self {
            ok: true,
            command,
            written: written.display().to_string(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"{
      "persons": [{ "id": "A" }, { "id": "B" }],
      "relationships": [
        { "id": "r1", "type": "http://gedcomx.org/Couple",
          "person1": { "resource": "#A" }, "person2": { "resource": "#B" } }
      ]
    }"##;

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/tmp/tree.json")),
            PathBuf::from("/tmp/tree.json.bak")
        );
    }

    #[test]
    fn save_in_place_writes_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tree.json");
        fs::write(&path, DOC).expect("write doc");

        let ws = Workspace::load(&path).expect("load");
        assert_eq!(ws.doc.persons.len(), 2);
        let written = ws.save(None).expect("save");
        assert_eq!(written, path);
        assert_eq!(
            fs::read_to_string(backup_path(&path)).expect("backup"),
            DOC
        );
    }

    #[test]
    fn save_elsewhere_skips_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tree.json");
        let out = dir.path().join("out.json");
        fs::write(&path, DOC).expect("write doc");

        Workspace::load(&path)
            .expect("load")
            .save(Some(&out))
            .expect("save");
        assert!(out.exists());
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn backup_disabled_by_project_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tree.json");
        fs::write(&path, DOC).expect("write doc");
        fs::write(dir.path().join("pedigree.toml"), "[edit]\nwrite_backup = false\n")
            .expect("write config");

        Workspace::load(&path).expect("load").save(None).expect("save");
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn malformed_document_names_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write doc");
        let err = Workspace::load(&path).expect_err("parse error");
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
