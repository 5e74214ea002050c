//! Shared test utilities.
//!
//! Provides the site fixture, item builders, and lookup helpers that panic
//! with a clear message on a miss.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let mut ctx = fixture_context(&tmp);
//! content::add_markdown_files(&mut ctx).unwrap();
//!
//! let post = find_item(&ctx, SectionId::Posts, "posts/tube-status-widget");
//! assert_eq!(post.metadata.color.as_deref(), Some("#E32017"));
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

use crate::config;
use crate::content::parse_date;
use crate::context::PublishingContext;
use crate::types::{Item, ItemMetadata, Page, SectionId};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Build context for a fixture copy, using its `config.toml`.
pub fn fixture_context(tmp: &TempDir) -> PublishingContext {
    let config = config::load_config(&tmp.path().join("config.toml")).unwrap();
    PublishingContext::new(config, tmp.path())
}

// =========================================================================
// Item builders
// =========================================================================

/// A bare post at `posts/<slug>` dated midnight UTC on `date` (`YYYY-MM-DD`).
pub fn item_dated(slug: &str, date: &str) -> Item {
    Item {
        section: SectionId::Posts,
        path: format!("posts/{slug}"),
        title: slug.to_string(),
        description: String::new(),
        date: parse_date(date).unwrap_or_else(|| panic!("bad test date '{date}'")),
        tags: BTreeSet::new(),
        metadata: ItemMetadata::default(),
        image_path: None,
        body: String::new(),
        content: String::new(),
        source_path: format!("{slug}.md"),
        reading_time: None,
    }
}

// =========================================================================
// Context lookups
// =========================================================================

/// Find an item by output path. Panics if not found.
pub fn find_item<'a>(ctx: &'a PublishingContext, section: SectionId, path: &str) -> &'a Item {
    let items = &ctx.sections.get(section).items;
    items.iter().find(|i| i.path == path).unwrap_or_else(|| {
        let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        panic!("item '{path}' not found in {section}. Available: {paths:?}")
    })
}

/// Find a page by output path. Panics if not found.
pub fn find_page<'a>(ctx: &'a PublishingContext, path: &str) -> &'a Page {
    ctx.pages.iter().find(|p| p.path == path).unwrap_or_else(|| {
        let paths: Vec<&str> = ctx.pages.iter().map(|p| p.path.as_str()).collect();
        panic!("page '{path}' not found. Available: {paths:?}")
    })
}
