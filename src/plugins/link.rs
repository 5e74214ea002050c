//! Link-preview cards.
//!
//! A blockquote whose first line is a `prettylink` directive is replaced by a
//! clickable card:
//!
//! ```text
//! > prettylink https://github.com/oliver-binns/tube-status
//! > title Tube Status
//! > description A home screen widget for London Underground lines
//! > image /images/tube-status.png
//! ```
//!
//! `title` and `description` are required; `image` is optional. Apart from the
//! first line, directives may come in any order. A blockquote missing a
//! required directive is left exactly as rendered.

use crate::markdown::{Fragment, Modifier, ModifierTarget};
use maud::{Markup, html};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyLink {
    pub href: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

/// Renders a parsed [`PrettyLink`] to markup.
pub trait LinkRenderer {
    fn render(&self, link: &PrettyLink) -> Markup;
}

/// The standard card: `a > div.pretty-link > [img] div > h1 + p`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLinkRenderer;

impl LinkRenderer for DefaultLinkRenderer {
    fn render(&self, link: &PrettyLink) -> Markup {
        html! {
            a href=(link.href) target="_blank" {
                div.pretty-link {
                    @if let Some(image) = &link.image {
                        img src=(image) aria-hidden="true";
                    }
                    div {
                        h1 { (link.title) }
                        p { (link.description) }
                    }
                }
            }
        }
    }
}

const PRETTYLINK: &str = "> prettylink ";
const TITLE: &str = "> title ";
const DESCRIPTION: &str = "> description ";
const IMAGE: &str = "> image ";

/// Parse the directive lines of a blockquote's markdown source.
pub fn parse_pretty_link(markdown: &str) -> Option<PrettyLink> {
    let lines: Vec<&str> = markdown.lines().map(str::trim_end).collect();
    let href = lines.first()?.strip_prefix(PRETTYLINK)?.trim();
    if href.is_empty() {
        return None;
    }

    let directive = |prefix: &str| {
        lines
            .iter()
            .find_map(|line| line.strip_prefix(prefix))
            .map(|value| value.trim().to_string())
    };

    Some(PrettyLink {
        href: href.to_string(),
        title: directive(TITLE)?,
        description: directive(DESCRIPTION)?,
        image: directive(IMAGE).filter(|image| !image.is_empty()),
    })
}

/// Expand a blockquote into a card, or `None` when it is not a complete
/// `prettylink` directive.
pub fn expand(markdown: &str, renderer: &dyn LinkRenderer) -> Option<Markup> {
    parse_pretty_link(markdown).map(|link| renderer.render(&link))
}

pub struct LinkPreviewModifier {
    renderer: Box<dyn LinkRenderer>,
}

impl LinkPreviewModifier {
    pub fn new(renderer: Box<dyn LinkRenderer>) -> Self {
        Self { renderer }
    }
}

impl Modifier for LinkPreviewModifier {
    fn target(&self) -> ModifierTarget {
        ModifierTarget::BlockQuotes
    }

    fn modify(&self, fragment: &Fragment<'_>) -> String {
        match expand(fragment.markdown, self.renderer.as_ref()) {
            Some(card) => card.into_string(),
            None => {
                if fragment.markdown.starts_with(PRETTYLINK) {
                    debug!("incomplete prettylink directive, leaving blockquote as is");
                }
                fragment.html.to_string()
            }
        }
    }
}
