//! The closed set of build plugins.
//!
//! A [`Plugin`] is a value carried by an
//! [`InstallPlugin`](crate::pipeline::PublishingStep::InstallPlugin) step.
//! Installing consumes it: markdown plugins register a
//! [`Modifier`](crate::markdown::Modifier) with the context's parser, and the
//! reading-time plugin annotates the items already ingested.
//!
//! | Plugin | Target | Effect |
//! |--------|--------|--------|
//! | [`Plugin::SyntaxHighlight`] | code blocks | Swift token spans |
//! | [`Plugin::VideoEmbed`] | blockquotes | `> youtube <url>` → iframe |
//! | [`Plugin::LinkPreview`] | blockquotes | `> prettylink <url>` → card |
//! | [`Plugin::ReadingTime`] | items | fills [`Item::reading_time`](crate::types::Item::reading_time) |
//!
//! Markdown plugins only affect content ingested after they are installed.

pub mod highlight;
pub mod link;
pub mod reading_time;
pub mod video;

use crate::context::PublishingContext;
use link::{DefaultLinkRenderer, LinkRenderer};
use std::fmt;

pub enum Plugin {
    SyntaxHighlight { class_prefix: String },
    VideoEmbed,
    LinkPreview { renderer: Box<dyn LinkRenderer> },
    ReadingTime { words_per_minute: usize },
}

impl Plugin {
    pub fn syntax_highlight(class_prefix: impl Into<String>) -> Self {
        Plugin::SyntaxHighlight {
            class_prefix: class_prefix.into(),
        }
    }

    pub fn link_preview() -> Self {
        Plugin::LinkPreview {
            renderer: Box::new(DefaultLinkRenderer),
        }
    }

    pub fn reading_time() -> Self {
        Plugin::ReadingTime {
            words_per_minute: reading_time::WORDS_PER_MINUTE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Plugin::SyntaxHighlight { .. } => "Syntax highlighting",
            Plugin::VideoEmbed => "YouTube embed",
            Plugin::LinkPreview { .. } => "Link preview",
            Plugin::ReadingTime { .. } => "Reading time",
        }
    }

    pub fn install(self, context: &mut PublishingContext) {
        let name = self.name();
        match self {
            Plugin::SyntaxHighlight { class_prefix } => {
                context
                    .markdown
                    .add_modifier(Box::new(highlight::HighlightModifier::new(class_prefix)));
            }
            Plugin::VideoEmbed => {
                context.markdown.add_modifier(Box::new(video::VideoModifier));
            }
            Plugin::LinkPreview { renderer } => {
                context
                    .markdown
                    .add_modifier(Box::new(link::LinkPreviewModifier::new(renderer)));
            }
            Plugin::ReadingTime { words_per_minute } => {
                reading_time::annotate(&mut context.sections, words_per_minute);
            }
        }
        context.record_plugin(name);
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plugin::SyntaxHighlight { class_prefix } => f
                .debug_struct("SyntaxHighlight")
                .field("class_prefix", class_prefix)
                .finish(),
            Plugin::VideoEmbed => f.write_str("VideoEmbed"),
            Plugin::LinkPreview { .. } => f.debug_struct("LinkPreview").finish_non_exhaustive(),
            Plugin::ReadingTime { words_per_minute } => f
                .debug_struct("ReadingTime")
                .field("words_per_minute", words_per_minute)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn install_registers_modifiers_in_order() {
        let mut ctx = PublishingContext::new(SiteConfig::default(), "/tmp/unused");
        Plugin::syntax_highlight("").install(&mut ctx);
        Plugin::VideoEmbed.install(&mut ctx);
        Plugin::link_preview().install(&mut ctx);

        assert_eq!(ctx.markdown.modifier_count(), 3);
        assert_eq!(
            ctx.installed_plugins(),
            &["Syntax highlighting", "YouTube embed", "Link preview"]
        );
    }

    #[test]
    fn reading_time_adds_no_modifier() {
        let mut ctx = PublishingContext::new(SiteConfig::default(), "/tmp/unused");
        Plugin::reading_time().install(&mut ctx);
        assert_eq!(ctx.markdown.modifier_count(), 0);
        assert_eq!(ctx.installed_plugins(), &["Reading time"]);
    }

    #[test]
    fn installed_plugins_apply_to_later_markdown() {
        let mut ctx = PublishingContext::new(SiteConfig::default(), "/tmp/unused");
        Plugin::VideoEmbed.install(&mut ctx);
        Plugin::link_preview().install(&mut ctx);

        let html = ctx.markdown.html(
            "> prettylink https://example.com\n> title Example\n> description Demo\n\n\
             > youtube https://youtu.be/abc123\n",
        );
        assert!(html.contains("class=\"pretty-link\""));
        assert!(html.contains("embed/abc123"));
    }
}
