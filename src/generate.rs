//! HTML site generation.
//!
//! Renders every content entity through an [`HtmlFactory`] and writes the
//! results into the output directory, then copies the theme stylesheet.
//!
//! ## Output Structure
//!
//! ```text
//! Output/
//! ├── index.html                         # Index: biography, posts, timeline
//! ├── styles.css                         # Theme stylesheet
//! ├── posts/
//! │   ├── index.html                     # Section page
//! │   └── tube-status-widget/index.html  # Item page
//! ├── things/index.html
//! ├── times/index.html
//! ├── about/index.html                   # Freeform page
//! └── tags/
//!     ├── index.html                     # Tag list (optional)
//!     └── ios/index.html                 # Tag details (optional)
//! ```
//!
//! Every page is rendered before anything is written, so a template never
//! observes a half-written output tree. Two entities resolving to the same
//! path fail the step with [`BuildError::OutputCollision`].

use crate::context::PublishingContext;
use crate::pipeline::BuildError;
use crate::theme::HtmlFactory;
use maud::Markup;
use std::fs;

/// Output-relative `index.html` path for a site-relative page path.
fn index_file(path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        "index.html".to_string()
    } else {
        format!("{path}/index.html")
    }
}

/// Render every entity to `(output path, markup)` pairs, in write order.
pub fn render_site(theme: &dyn HtmlFactory, context: &PublishingContext) -> Vec<(String, Markup)> {
    let mut pages = vec![(index_file(""), theme.index(context))];

    for section in context.sections.iter() {
        pages.push((index_file(section.path()), theme.section(section, context)));
        for item in &section.items {
            pages.push((index_file(&item.path), theme.item(item, context)));
        }
    }

    for page in &context.pages {
        pages.push((index_file(&page.path), theme.page(page, context)));
    }

    let tags = context.sections.all_tags();
    if !tags.is_empty() {
        if let Some(list) = theme.tag_list(&tags, context) {
            pages.push((index_file("tags"), list));
        }
    }
    for tag in &tags {
        if let Some(details) = theme.tag_details(tag, context) {
            pages.push((index_file(&tag.path()), details));
        }
    }

    pages
}

/// Generate the HTML pages and copy the stylesheet. Returns the number of
/// files written.
pub fn generate_html(
    theme: &dyn HtmlFactory,
    context: &mut PublishingContext,
) -> Result<usize, BuildError> {
    let pages = render_site(theme, context);
    let count = pages.len();
    for (path, markup) in pages {
        context.write_output_file(&path, markup.into_string())?;
    }

    let stylesheet = context.resources_dir().join(&context.config.theme.stylesheet);
    let name = stylesheet
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "styles.css".to_string());
    let css = fs::read(&stylesheet)?;
    context.write_output_file(&name, css)?;

    Ok(count + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::item_dated;
    use crate::theme::OliverTheme;
    use crate::types::{Page, SectionId, Tag};
    use tempfile::TempDir;

    fn context_with_stylesheet(tmp: &TempDir) -> PublishingContext {
        let css = tmp.path().join("Resources/Theme/styles.css");
        fs::create_dir_all(css.parent().unwrap()).unwrap();
        fs::write(&css, "body {}").unwrap();
        PublishingContext::new(SiteConfig::default(), tmp.path())
    }

    fn paths(pages: &[(String, Markup)]) -> Vec<&str> {
        pages.iter().map(|(p, _)| p.as_str()).collect()
    }

    #[test]
    fn index_file_paths() {
        assert_eq!(index_file(""), "index.html");
        assert_eq!(index_file("posts/a"), "posts/a/index.html");
        assert_eq!(index_file("/about/"), "about/index.html");
    }

    #[test]
    fn renders_every_entity() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context_with_stylesheet(&tmp);
        let mut post = item_dated("widget", "2020-06-27");
        post.tags.insert(Tag("iOS".into()));
        ctx.sections.get_mut(SectionId::Posts).items.push(post);
        ctx.pages.push(Page {
            path: "about".into(),
            title: "About".into(),
            description: String::new(),
            content: String::new(),
        });

        let pages = render_site(&OliverTheme, &ctx);
        assert_eq!(
            paths(&pages),
            vec![
                "index.html",
                "posts/index.html",
                "posts/widget/index.html",
                "things/index.html",
                "times/index.html",
                "about/index.html",
                "tags/index.html",
                "tags/ios/index.html",
            ]
        );
    }

    #[test]
    fn tag_pages_skipped_when_disabled() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context_with_stylesheet(&tmp);
        ctx.config.theme.tag_pages = false;
        let mut post = item_dated("widget", "2020-06-27");
        post.tags.insert(Tag("iOS".into()));
        ctx.sections.get_mut(SectionId::Posts).items.push(post);

        let pages = render_site(&OliverTheme, &ctx);
        assert!(!paths(&pages).iter().any(|p| p.starts_with("tags/")));
    }

    #[test]
    fn tag_spellings_share_one_page() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context_with_stylesheet(&tmp);
        let posts = ctx.sections.get_mut(SectionId::Posts);
        let mut upper = item_dated("upper", "2020-06-27");
        upper.tags.insert(Tag("iOS".into()));
        let mut lower = item_dated("lower", "2021-06-27");
        lower.tags.insert(Tag("ios".into()));
        let mut symbols = item_dated("symbols", "2022-06-27");
        symbols.tags.insert(Tag("C#".into()));
        symbols.tags.insert(Tag("C++".into()));
        symbols.tags.insert(Tag("🎉".into()));
        posts.items.extend([upper, lower, symbols]);

        generate_html(&OliverTheme, &mut ctx).unwrap();

        let tag_pages: Vec<&str> = ctx
            .artifacts()
            .iter()
            .map(String::as_str)
            .filter(|p| p.starts_with("tags/"))
            .collect();
        assert_eq!(
            tag_pages,
            vec![
                "tags/c-plus-plus/index.html",
                "tags/c-sharp/index.html",
                "tags/index.html",
                "tags/ios/index.html",
                "tags/tag-1f389/index.html",
            ]
        );
        let ios = fs::read_to_string(ctx.output_dir().join("tags/ios/index.html")).unwrap();
        assert!(ios.contains("/posts/upper"));
        assert!(ios.contains("/posts/lower"));
    }

    #[test]
    fn writes_pages_and_stylesheet() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context_with_stylesheet(&tmp);
        let written = generate_html(&OliverTheme, &mut ctx).unwrap();

        // index + three sections + stylesheet, no tag list without tags
        assert_eq!(written, 5);
        let out = ctx.output_dir().to_path_buf();
        assert!(out.join("index.html").exists());
        assert!(!out.join("tags").exists());
        assert_eq!(fs::read_to_string(out.join("styles.css")).unwrap(), "body {}");
    }

    #[test]
    fn colliding_paths_fail() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context_with_stylesheet(&tmp);
        let posts = ctx.sections.get_mut(SectionId::Posts);
        posts.items.push(item_dated("same", "2020-01-01"));
        posts.items.push(item_dated("same", "2021-01-01"));

        let err = generate_html(&OliverTheme, &mut ctx).unwrap_err();
        assert!(matches!(err, BuildError::OutputCollision(p) if p == "posts/same/index.html"));
    }

    #[test]
    fn missing_stylesheet_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = PublishingContext::new(SiteConfig::default(), tmp.path());
        assert!(matches!(
            generate_html(&OliverTheme, &mut ctx),
            Err(BuildError::Io(_))
        ));
    }
}
