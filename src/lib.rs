//! # oliverbinns
//!
//! The static site generator behind oliverbinns.co.uk: a blog, a list of
//! things built, and a timeline, all written as markdown with front matter.
//!
//! # Architecture: One Context, Ordered Steps
//!
//! A build is a list of [`pipeline::PublishingStep`]s run once each, in order,
//! against a single [`context::PublishingContext`]:
//!
//! ```text
//! install plugins ─→ ingest Content/ ─→ reading time ─→ HTML ─→ images ─→ API ─→ RSS
//!   (modifiers)       (render markdown)                  (theme)
//! ```
//!
//! - **Order matters**: markdown is rendered once, at ingestion, so markdown
//!   plugins are installed first. Anything reading items (theme, API, feed)
//!   runs after ingestion.
//! - **No globals**: plugins are values inside their install steps and the
//!   context is owned by the running pipeline.
//! - **Fail fast**: the first failing step stops the build. Files already
//!   written are left in place.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Steps, the default step order, and the runner |
//! | [`context`] | Mutable build state and the output artifact registry |
//! | [`content`] | `Content/` ingestion and front matter parsing |
//! | [`markdown`] | pulldown-cmark rendering with block modifiers |
//! | [`plugins`] | Syntax highlighting, YouTube embeds, link previews, reading time |
//! | [`theme`] | `HtmlFactory` and the site theme, built with Maud |
//! | [`generate`] | Writes every rendered page plus the stylesheet |
//! | [`api`] | `api/posts.json` and the raw posts mirror |
//! | [`feed`] | RSS 2.0 feed |
//! | [`redirect`] | Legacy WordPress permalink table |
//! | [`config`] | `config.toml` loading, layering and validation |
//! | [`types`] | Items, sections, pages and tags |
//! | [`naming`] | Path and tag normalization |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! Pages are built with [Maud](https://maud.lambda.xyz/). Templates are Rust
//! code, checked at compile time and escaped by default; rendered markdown is
//! the only pre-escaped input.
//!
//! ## Optional Tag Pages
//!
//! Tag pages can be switched off. The theme's tag entry points return
//! `Option<Markup>`, and `None` produces no file rather than an empty one.

pub mod api;
pub mod config;
pub mod content;
pub mod context;
pub mod feed;
pub mod generate;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod plugins;
pub mod redirect;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod fixture_tests {
    use crate::content;
    use crate::pipeline::{Pipeline, default_steps};
    use crate::plugins::Plugin;
    use crate::test_helpers::*;
    use crate::types::SectionId;

    #[test]
    fn fixture_ingests_with_plugins() {
        let tmp = setup_fixtures();
        let mut ctx = fixture_context(&tmp);
        Plugin::syntax_highlight("").install(&mut ctx);
        Plugin::VideoEmbed.install(&mut ctx);
        Plugin::link_preview().install(&mut ctx);
        content::add_markdown_files(&mut ctx).unwrap();

        let widget = find_item(&ctx, SectionId::Posts, "posts/tube-status-widget");
        assert_eq!(widget.metadata.color.as_deref(), Some("#E32017"));
        assert!(widget.content.contains("<div class=\"pretty-link\">"));
        assert!(widget.content.contains("<span class=\"keyword\">struct</span>"));
        // Plain quotes survive
        assert!(widget.content.contains("<blockquote>"));

        let advent = find_item(&ctx, SectionId::Posts, "posts/advent-of-code-21");
        assert!(advent.content.contains("video-container"));
        assert!(advent.content.contains("<pre><code class=\"language-no-highlight\">"));

        assert_eq!(find_page(&ctx, "about").title, "About");
        assert_eq!(ctx.sections.get(SectionId::Times).items.len(), 3);
    }

    #[test]
    fn fixture_builds_with_default_steps() {
        let tmp = setup_fixtures();
        let mut ctx = fixture_context(&tmp);
        let steps = default_steps(&ctx.config);
        let report = Pipeline::new(steps).run(&mut ctx).unwrap();

        assert_eq!(report.steps.len(), 10);
        let widget = find_item(&ctx, SectionId::Posts, "posts/tube-status-widget");
        assert!(widget.reading_time.is_some());
        for path in [
            "index.html",
            "posts/tube-status-widget/index.html",
            "tags/ios/index.html",
            "images/oliver-binns.svg",
            "images/tube-status.svg",
            "api/posts.json",
            "api/posts/tube-status-widget.md",
            "feed.rss",
        ] {
            assert!(ctx.artifacts().contains(path), "missing artifact {path}");
        }
    }
}
