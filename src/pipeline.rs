//! The publishing pipeline.
//!
//! A build is an ordered list of [`PublishingStep`]s run once each against a
//! single [`PublishingContext`]. The first failing step aborts the build;
//! files already written stay where they are.
//!
//! ## Default Steps
//!
//! ```text
//!  1. Install plugin: Syntax highlighting
//!  2. Install plugin: YouTube embed
//!  3. Install plugin: Link preview
//!  4. Add Markdown files          Content/ → sections, pages, index
//!  5. Install plugin: Reading time
//!  6. Generate HTML               theme → *.html, styles.css
//!  7. Copy Resources/Theme/images → images/
//!  8. Copy Resources/images       → images/
//!  9. Generate API                api/posts.json, api/posts/*
//! 10. Generate RSS feed           feed.rss
//! ```
//!
//! Markdown plugins must be installed before step 4: content is rendered once,
//! at ingestion, with whatever modifiers are installed at that moment.

use crate::api;
use crate::config::SiteConfig;
use crate::content::{self, ContentError};
use crate::context::PublishingContext;
use crate::feed;
use crate::generate;
use crate::plugins::Plugin;
use crate::theme::{HtmlFactory, OliverTheme};
use crate::types::SectionId;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Feed validation failed: {0}")]
    Feed(#[from] rss::validation::ValidationError),
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("Two artifacts share the output path {0}")]
    OutputCollision(String),
    #[error("Refusing to clear output directory {output}: it contains {protected}")]
    UnsafeOutputDir { output: PathBuf, protected: PathBuf },
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<BuildError>,
    },
}

/// One unit of build work.
pub enum PublishingStep {
    InstallPlugin(Plugin),
    AddMarkdownFiles,
    GenerateHtml(Box<dyn HtmlFactory>),
    /// Copy a directory under the project root to an output-relative path.
    CopyResources { from: PathBuf, to: String },
    GenerateApi,
    GenerateRssFeed { sections: Vec<SectionId> },
}

impl std::fmt::Debug for PublishingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl PublishingStep {
    pub fn name(&self) -> String {
        match self {
            PublishingStep::InstallPlugin(plugin) => format!("Install plugin '{}'", plugin.name()),
            PublishingStep::AddMarkdownFiles => "Add Markdown files".to_string(),
            PublishingStep::GenerateHtml(_) => "Generate HTML".to_string(),
            PublishingStep::CopyResources { from, to } => {
                format!("Copy '{}' to '{}'", from.display(), to)
            }
            PublishingStep::GenerateApi => "Generate API".to_string(),
            PublishingStep::GenerateRssFeed { .. } => "Generate RSS feed".to_string(),
        }
    }

    /// Run the step, returning the number of files it read or wrote.
    pub fn execute(self, context: &mut PublishingContext) -> Result<usize, BuildError> {
        match self {
            PublishingStep::InstallPlugin(plugin) => {
                plugin.install(context);
                Ok(0)
            }
            PublishingStep::AddMarkdownFiles => content::add_markdown_files(context),
            PublishingStep::GenerateHtml(theme) => generate::generate_html(theme.as_ref(), context),
            PublishingStep::CopyResources { from, to } => {
                let source = context.root().join(from);
                context.copy_directory(&source, &to)
            }
            PublishingStep::GenerateApi => api::generate_api(context),
            PublishingStep::GenerateRssFeed { sections } => {
                feed::generate_rss_feed(context, &sections)
            }
        }
    }
}

/// The site's declared build order.
pub fn default_steps(config: &SiteConfig) -> Vec<PublishingStep> {
    let resources = PathBuf::from(&config.paths.resources);
    vec![
        PublishingStep::InstallPlugin(Plugin::syntax_highlight(&config.highlight.class_prefix)),
        PublishingStep::InstallPlugin(Plugin::VideoEmbed),
        PublishingStep::InstallPlugin(Plugin::link_preview()),
        PublishingStep::AddMarkdownFiles,
        PublishingStep::InstallPlugin(Plugin::reading_time()),
        PublishingStep::GenerateHtml(Box::new(OliverTheme)),
        PublishingStep::CopyResources {
            from: resources.join("Theme/images"),
            to: "images".to_string(),
        },
        PublishingStep::CopyResources {
            from: resources.join("images"),
            to: "images".to_string(),
        },
        PublishingStep::GenerateApi,
        PublishingStep::GenerateRssFeed {
            sections: config.feed.sections.clone(),
        },
    ]
}

/// Progress events streamed while the pipeline runs.
#[derive(Debug, Clone)]
pub enum StepEvent {
    Started {
        index: usize,
        total: usize,
        name: String,
    },
    Finished {
        index: usize,
        total: usize,
        name: String,
        files: usize,
        elapsed: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub name: String,
    pub files: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub steps: Vec<StepReport>,
}

impl BuildReport {
    pub fn total_files(&self) -> usize {
        self.steps.iter().map(|s| s.files).sum()
    }
}

pub struct Pipeline {
    steps: Vec<PublishingStep>,
    events: Option<Sender<StepEvent>>,
    reset_output: bool,
}

impl Pipeline {
    pub fn new(steps: Vec<PublishingStep>) -> Self {
        Self {
            steps,
            events: None,
            reset_output: true,
        }
    }

    pub fn with_events(mut self, sender: Sender<StepEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Leave the output directory as is before the first step.
    pub fn without_output_reset(mut self) -> Self {
        self.reset_output = false;
        self
    }

    pub fn step_names(&self) -> Vec<String> {
        self.steps.iter().map(PublishingStep::name).collect()
    }

    fn emit(&self, event: StepEvent) {
        if let Some(sender) = &self.events {
            // Receiver gone means nobody is printing; the build carries on.
            let _ = sender.send(event);
        }
    }

    /// Run every step in order, stopping at the first error.
    pub fn run(mut self, context: &mut PublishingContext) -> Result<BuildReport, BuildError> {
        if self.reset_output {
            context.prepare_output()?;
        }

        let steps = std::mem::take(&mut self.steps);
        let total = steps.len();
        let mut report = BuildReport::default();

        for (i, step) in steps.into_iter().enumerate() {
            let index = i + 1;
            let name = step.name();
            info!(step = %name, "[{index}/{total}] started");
            self.emit(StepEvent::Started {
                index,
                total,
                name: name.clone(),
            });

            let started = Instant::now();
            let files = step.execute(context).map_err(|source| BuildError::Step {
                step: name.clone(),
                source: Box::new(source),
            })?;
            let elapsed = started.elapsed();

            info!(step = %name, files, "[{index}/{total}] finished");
            self.emit(StepEvent::Finished {
                index,
                total,
                name: name.clone(),
                files,
                elapsed,
            });
            report.steps.push(StepReport { name, files });
        }

        Ok(report)
    }
}
