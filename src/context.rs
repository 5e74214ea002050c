//! The mutable build context shared by every pipeline step.
//!
//! A [`PublishingContext`] owns everything one build accumulates: the installed
//! markdown modifiers, the ingested sections and pages, and the registry of
//! output artifacts. Steps borrow it mutably one at a time; nothing outside
//! the running pipeline touches it.
//!
//! ## Artifact registry
//!
//! Every generated file is written through [`PublishingContext::write_output_file`],
//! which records its output-relative path. Writing the same path twice is an
//! [`OutputCollision`](BuildError::OutputCollision). Resource copies go through
//! [`PublishingContext::copy_directory`] instead and may overwrite each other,
//! so that `Resources/Theme/images` and `Resources/images` merge into one
//! `images/`. A copy never overwrites a generated file.
//!
//! ## Output reset
//!
//! [`PublishingContext::prepare_output`] deletes the output directory. It
//! refuses when that directory is, or contains, the project root or the
//! content or resources directory.

use crate::config::SiteConfig;
use crate::markdown::MarkdownParser;
use crate::pipeline::BuildError;
use crate::types::{IndexPage, Page, Sections};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct PublishingContext {
    pub config: SiteConfig,
    pub markdown: MarkdownParser,
    pub sections: Sections,
    pub pages: Vec<Page>,
    pub index: IndexPage,
    root: PathBuf,
    output_dir: PathBuf,
    installed_plugins: Vec<&'static str>,
    artifacts: BTreeSet<String>,
    /// Subset of `artifacts` that came from resource copies.
    copied: BTreeSet<String>,
}

impl PublishingContext {
    /// Context for the project at `root`; directories resolve through `config.paths`.
    pub fn new(config: SiteConfig, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output_dir = root.join(&config.paths.output);
        Self {
            config,
            markdown: MarkdownParser::new(),
            sections: Sections::default(),
            pages: Vec::new(),
            index: IndexPage::default(),
            root,
            output_dir,
            installed_plugins: Vec::new(),
            artifacts: BTreeSet::new(),
            copied: BTreeSet::new(),
        }
    }

    /// Override the output directory (the `--output` flag).
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.content)
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.resources)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Empty the output directory, creating it if needed.
    pub fn prepare_output(&mut self) -> Result<(), BuildError> {
        if self.output_dir.exists() {
            self.check_output_is_disposable()?;
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        self.artifacts.clear();
        self.copied.clear();
        Ok(())
    }

    /// Fail if deleting the output directory would take project sources
    /// with it. A directory that does not exist yet cannot contain them.
    fn check_output_is_disposable(&self) -> Result<(), BuildError> {
        let output = self.output_dir.canonicalize()?;
        for protected in [self.root.clone(), self.content_dir(), self.resources_dir()] {
            let Ok(protected) = protected.canonicalize() else {
                continue;
            };
            if protected.starts_with(&output) {
                return Err(BuildError::UnsafeOutputDir {
                    output: self.output_dir.clone(),
                    protected,
                });
            }
        }
        Ok(())
    }

    /// Write a generated artifact at an output-relative path.
    pub fn write_output_file(
        &mut self,
        relative: &str,
        contents: impl AsRef<[u8]>,
    ) -> Result<(), BuildError> {
        let relative = relative.trim_start_matches('/');
        if !self.artifacts.insert(relative.to_string()) {
            return Err(BuildError::OutputCollision(relative.to_string()));
        }
        let target = self.output_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, contents)?;
        Ok(())
    }

    /// Copy every file under `from` into the output-relative directory `to`,
    /// preserving structure. Files from earlier copies are overwritten; a
    /// generated file at the same path is an
    /// [`OutputCollision`](BuildError::OutputCollision).
    ///
    /// Returns the number of files copied.
    pub fn copy_directory(&mut self, from: &Path, to: &str) -> Result<usize, BuildError> {
        if !from.is_dir() {
            return Err(BuildError::MissingDirectory(from.to_path_buf()));
        }
        let to = to.trim_matches('/');
        let mut copied = 0;
        for entry in WalkDir::new(from).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(from)
                .map_err(|_| BuildError::MissingDirectory(from.to_path_buf()))?;
            let rel = rel.to_string_lossy().replace('\\', "/");
            let relative = if to.is_empty() {
                rel
            } else {
                format!("{to}/{rel}")
            };
            if self.artifacts.contains(&relative) && !self.copied.contains(&relative) {
                return Err(BuildError::OutputCollision(relative));
            }
            let target = self.output_dir.join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            self.artifacts.insert(relative.clone());
            self.copied.insert(relative);
            copied += 1;
        }
        Ok(copied)
    }

    pub fn record_plugin(&mut self, name: &'static str) {
        self.installed_plugins.push(name);
    }

    /// Names of installed plugins, in installation order.
    pub fn installed_plugins(&self) -> &[&'static str] {
        &self.installed_plugins
    }

    /// Output-relative paths of every file written so far.
    pub fn artifacts(&self) -> &BTreeSet<String> {
        &self.artifacts
    }
}
