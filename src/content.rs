//! Content ingestion: the `Content/` tree becomes sections, pages and the
//! index.
//!
//! ## Directory Structure
//!
//! ```text
//! Content/
//! ├── index.md                     # Index page description
//! ├── about.md                     # Page → /about
//! ├── posts/
//! │   ├── index.md                 # Section title and description
//! │   ├── tube-status-widget.md    # Item → /posts/tube-status-widget
//! │   └── advent-of-code-21.md
//! ├── things/
//! │   └── app-clip.md
//! └── times/
//!     └── deloitte.md
//! ```
//!
//! Top-level directories named after a [`SectionId`] hold items; any other
//! markdown file is a freeform page. Files that are not markdown are skipped.
//!
//! ## Front Matter
//!
//! ```text
//! ---
//! title: Create a Tube Status home screen widget for iOS 14
//! description: Building a WidgetKit extension
//! date: 2020-06-27 10:00
//! tags: iOS, Widgets
//! color: #E32017
//! ---
//! ```
//!
//! One `key: value` per line; values are taken verbatim (surrounding quotes
//! are stripped). Unknown keys are ignored. A line without a colon is an
//! error.

use crate::context::PublishingContext;
use crate::naming;
use crate::pipeline::BuildError;
use crate::types::{IndexPage, Item, ItemMetadata, Page, SectionId, Tag};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid front matter in {file} at line {line}")]
    InvalidFrontMatter { file: PathBuf, line: usize },
    #[error("Invalid date {value:?} in {file}")]
    InvalidDate { file: PathBuf, value: String },
}

/// Recognised front matter fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

const FENCE: &str = "---";

/// Split a markdown source into its front matter and body.
///
/// Sources that do not open with a `---` line have no front matter.
pub fn parse_front_matter<'a>(
    file: &Path,
    source: &'a str,
) -> Result<(FrontMatter, &'a str), ContentError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(first) if first.trim_end() == FENCE => first.len(),
        _ => return Ok((FrontMatter::default(), source)),
    };

    let mut front = FrontMatter::default();
    for (index, raw) in lines.enumerate() {
        offset += raw.len();
        let line = raw.trim();
        if line == FENCE {
            return Ok((front, &source[offset..]));
        }
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| ContentError::InvalidFrontMatter {
                file: file.to_path_buf(),
                line: index + 2,
            })?;
        let value = unquote(value.trim()).to_string();
        match key.trim() {
            "title" => front.title = Some(value),
            "description" => front.description = Some(value),
            "date" => front.date = Some(value),
            "tags" => {
                front.tags = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "image" => front.image = Some(value),
            "path" => front.path = Some(value),
            "icon" => front.icon = Some(value),
            "color" => front.color = Some(value),
            other => debug!(key = other, file = %file.display(), "ignoring front matter key"),
        }
    }

    // Opening fence without a closing one
    Err(ContentError::InvalidFrontMatter {
        file: file.to_path_buf(),
        line: 1,
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse a front matter date.
///
/// Accepts `2020-06-27 10:00`, `2020-06-27 10:00:00`, `2020-06-27` and RFC 3339.
/// Dates without an offset are UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// First `# ` heading of a markdown body.
fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Output path of a markdown file relative to its parent tree, extension
/// dropped and `index` files collapsed onto their directory.
fn relative_slug(rel: &Path) -> String {
    let without_ext = rel.with_extension("");
    let mut slug = without_ext.to_string_lossy().replace('\\', "/");
    if slug == "index" {
        slug.clear();
    } else if let Some(parent) = slug.strip_suffix("/index") {
        slug = parent.to_string();
    }
    slug
}

fn file_date(path: &Path, front: &FrontMatter) -> Result<DateTime<Utc>, ContentError> {
    match &front.date {
        Some(value) => parse_date(value).ok_or_else(|| ContentError::InvalidDate {
            file: path.to_path_buf(),
            value: value.clone(),
        }),
        None => Ok(DateTime::<Utc>::from(fs::metadata(path)?.modified()?)),
    }
}

/// Where a markdown file under the content root belongs.
#[derive(Debug, PartialEq, Eq)]
enum Placement<'a> {
    Index,
    SectionIndex(SectionId),
    Item(SectionId, &'a Path),
    Page,
}

fn placement(rel: &Path) -> Placement<'_> {
    if rel == Path::new("index.md") {
        return Placement::Index;
    }
    let mut components = rel.components();
    let section = components
        .next()
        .and_then(|c| c.as_os_str().to_str())
        .and_then(SectionId::from_dir_name);
    match section {
        Some(id) => {
            let inner = components.as_path();
            if inner.as_os_str().is_empty() {
                Placement::Page
            } else if inner == Path::new("index.md") {
                Placement::SectionIndex(id)
            } else {
                Placement::Item(id, inner)
            }
        }
        None => Placement::Page,
    }
}

/// Ingest every markdown file under the content directory.
///
/// Bodies are rendered with the modifiers installed so far. Returns the
/// number of markdown files read.
pub fn add_markdown_files(context: &mut PublishingContext) -> Result<usize, BuildError> {
    let content_dir = context.content_dir();
    if !content_dir.is_dir() {
        return Err(BuildError::MissingDirectory(content_dir));
    }

    let mut count = 0;
    let walker = WalkDir::new(&content_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_markdown = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("md"));
        if !is_markdown {
            debug!(file = %path.display(), "skipping non-markdown file");
            continue;
        }
        let rel = path
            .strip_prefix(&content_dir)
            .map_err(|_| BuildError::MissingDirectory(content_dir.clone()))?;

        let source = fs::read_to_string(path).map_err(ContentError::from)?;
        let (front, body) = parse_front_matter(path, &source)?;

        match placement(rel) {
            Placement::Index => {
                context.index = IndexPage {
                    title: front.title,
                    description: front.description,
                    content: context.markdown.html(body),
                };
            }
            Placement::SectionIndex(id) => {
                let section = context.sections.get_mut(id);
                if let Some(title) = front.title {
                    section.title = title;
                }
                if let Some(description) = front.description {
                    section.description = description;
                }
            }
            Placement::Item(id, inner) => {
                let item = build_item(context, id, path, inner, front, body)?;
                debug!(path = %item.path, "ingested item");
                context.sections.get_mut(id).items.push(item);
            }
            Placement::Page => {
                let slug = relative_slug(rel);
                let page = Page {
                    path: naming::sanitize_path(front.path.as_deref().unwrap_or(&slug)),
                    title: front
                        .title
                        .or_else(|| first_heading(body))
                        .unwrap_or_else(|| naming::title_from_stem(&stem_of(path))),
                    description: front.description.unwrap_or_default(),
                    content: context.markdown.html(body),
                };
                debug!(path = %page.path, "ingested page");
                context.pages.push(page);
            }
        }
        count += 1;
    }

    Ok(count)
}

fn build_item(
    context: &PublishingContext,
    section: SectionId,
    path: &Path,
    inner: &Path,
    front: FrontMatter,
    body: &str,
) -> Result<Item, ContentError> {
    let date = file_date(path, &front)?;
    let slug = front.path.clone().unwrap_or_else(|| relative_slug(inner));
    let title = front
        .title
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| naming::title_from_stem(&stem_of(path)));
    let tags: BTreeSet<Tag> = front.tags.into_iter().map(Tag).collect();

    Ok(Item {
        section,
        path: naming::item_path(section.as_str(), &slug),
        title,
        description: front.description.unwrap_or_default(),
        date,
        tags,
        metadata: ItemMetadata {
            icon: front.icon,
            color: front.color,
        },
        image_path: front.image,
        body: body.to_string(),
        content: context.markdown.html(body),
        source_path: inner.to_string_lossy().replace('\\', "/"),
        reading_time: None,
    })
}
