//! Content types shared by ingestion, the theme, and the export steps.
//!
//! Items are built once by [`content`](crate::content) and then only read;
//! the single exception is the derived [`Item::reading_time`], filled in by
//! the reading-time plugin.

use crate::naming;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The fixed set of content sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Posts,
    Things,
    Times,
}

impl SectionId {
    pub const ALL: [SectionId; 3] = [SectionId::Posts, SectionId::Things, SectionId::Times];

    /// Directory name under the content root, and URL path of the section page.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Posts => "posts",
            SectionId::Things => "things",
            SectionId::Times => "times",
        }
    }

    /// Section title used when `index.md` does not provide one.
    pub fn default_title(self) -> &'static str {
        match self {
            SectionId::Posts => "Posts",
            SectionId::Things => "Things",
            SectionId::Times => "Times",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<SectionId> {
        SectionId::ALL.into_iter().find(|id| id.as_str() == name)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-item custom front matter fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMetadata {
    /// Icon class suffix shown on the timeline (`fa-plane` → `<i class="fas fa-plane">`).
    pub icon: Option<String>,
    /// CSS color for the post thumbnail background. Absent means light theme.
    pub color: Option<String>,
}

/// Estimated reading time of an item body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: u32,
}

/// A tag as written in front matter.
///
/// Tags are identified by their normalized slug: `iOS` and `ios` are the same
/// tag, shown with whichever spelling was seen first.
#[derive(Debug, Clone)]
pub struct Tag(pub String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL segment of the tag (`Swift UI` → `swift-ui`).
    pub fn slug(&self) -> String {
        naming::normalize_tag(&self.0)
    }

    /// Site-relative path of the tag details page.
    pub fn path(&self) -> String {
        format!("tags/{}", self.slug())
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.slug() == other.slug()
    }
}

impl Eq for Tag {}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.slug().cmp(&other.slug())
    }
}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug().hash(state);
    }
}

/// One content file of a section.
#[derive(Debug, Clone)]
pub struct Item {
    pub section: SectionId,
    /// Site-relative output path without leading slash (`posts/tube-status-widget`).
    pub path: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub tags: BTreeSet<Tag>,
    pub metadata: ItemMetadata,
    /// Social/thumbnail image, as written in front matter.
    pub image_path: Option<String>,
    /// Raw markdown body, front matter stripped.
    pub body: String,
    /// Body rendered to HTML with the modifiers installed at ingestion time.
    pub content: String,
    /// Source file, relative to the section directory.
    pub source_path: String,
    /// Derived by the reading-time plugin.
    pub reading_time: Option<ReadingTime>,
}

impl Item {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Site-absolute URL path (`/posts/tube-status-widget`).
    pub fn url(&self) -> String {
        format!("/{}", self.path)
    }

    /// Reading time in minutes, zero until the reading-time plugin has run.
    pub fn reading_minutes(&self) -> u32 {
        self.reading_time.map(|r| r.minutes).unwrap_or(0)
    }

    /// Natural display order within a section: newest first, ties by path.
    pub fn natural_order(a: &Item, b: &Item) -> Ordering {
        b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path))
    }
}

/// A section and the items ingested into it, in ingestion order.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub description: String,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(id: SectionId) -> Self {
        Self {
            id,
            title: id.default_title().to_string(),
            description: String::new(),
            items: Vec::new(),
        }
    }

    /// Site-relative path of the section page.
    pub fn path(&self) -> &'static str {
        self.id.as_str()
    }

    /// Items in natural display order (newest first).
    pub fn items_by_date(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by(|a, b| Item::natural_order(a, b));
        items
    }
}

/// Exactly one [`Section`] per [`SectionId`].
#[derive(Debug, Clone)]
pub struct Sections {
    posts: Section,
    things: Section,
    times: Section,
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            posts: Section::new(SectionId::Posts),
            things: Section::new(SectionId::Things),
            times: Section::new(SectionId::Times),
        }
    }
}

impl Sections {
    pub fn get(&self, id: SectionId) -> &Section {
        match id {
            SectionId::Posts => &self.posts,
            SectionId::Things => &self.things,
            SectionId::Times => &self.times,
        }
    }

    pub fn get_mut(&mut self, id: SectionId) -> &mut Section {
        match id {
            SectionId::Posts => &mut self.posts,
            SectionId::Things => &mut self.things,
            SectionId::Times => &mut self.times,
        }
    }

    /// Sections in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        [&self.posts, &self.things, &self.times].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        [&mut self.posts, &mut self.things, &mut self.times].into_iter()
    }

    /// Every item of every section.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.iter().flat_map(|s| s.items.iter())
    }

    /// All distinct tags across the site, sorted by slug. Spellings that
    /// share a slug collapse into the first one seen.
    pub fn all_tags(&self) -> BTreeSet<Tag> {
        let mut tags = BTreeSet::new();
        for tag in self.all_items().flat_map(|i| i.tags.iter()) {
            // insert keeps the existing element on a match
            if !tags.contains(tag) {
                tags.insert(tag.clone());
            }
        }
        tags
    }

    /// Items carrying `tag`, newest first.
    pub fn items_tagged(&self, tag: &Tag) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.all_items().filter(|i| i.tags.contains(tag)).collect();
        items.sort_by(|a, b| Item::natural_order(a, b));
        items
    }
}

/// A freeform markdown page outside the sections.
#[derive(Debug, Clone)]
pub struct Page {
    /// Site-relative output path (`about`, `talks/2023`).
    pub path: String,
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Metadata of the index page, from `Content/index.md`.
#[derive(Debug, Clone, Default)]
pub struct IndexPage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: String,
}
