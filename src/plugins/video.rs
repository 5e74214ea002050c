//! YouTube embeds from `> youtube <url>` blockquotes.

use crate::markdown::{Fragment, Modifier, ModifierTarget};
use maud::{Markup, html};

const DIRECTIVE: &str = "> youtube ";

/// Extract the video id from a YouTube watch, short or embed URL.
///
/// - `https://www.youtube.com/watch?v=ID&t=10` → `ID`
/// - `https://youtu.be/ID?si=x` → `ID`
/// - `https://www.youtube.com/embed/ID` → `ID`
pub fn video_id(url: &str) -> Option<&str> {
    let url = url.trim();
    let tail = if let Some((_, rest)) = url.split_once("watch?v=") {
        rest
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest
    } else if let Some((_, rest)) = url.split_once("/embed/") {
        rest
    } else {
        return None;
    };
    let id = tail.split(['&', '?', '#', '/']).next().unwrap_or_default();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

pub fn embed(id: &str) -> Markup {
    html! {
        div.video-container {
            iframe
                src=(format!("https://www.youtube-nocookie.com/embed/{id}"))
                frameborder="0"
                allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                allowfullscreen {}
        }
    }
}

pub struct VideoModifier;

impl Modifier for VideoModifier {
    fn target(&self) -> ModifierTarget {
        ModifierTarget::BlockQuotes
    }

    fn modify(&self, fragment: &Fragment<'_>) -> String {
        let mut lines = fragment.markdown.lines();
        let id = lines
            .next()
            .and_then(|line| line.strip_prefix(DIRECTIVE))
            .and_then(video_id);
        match (id, lines.next()) {
            (Some(id), None) => embed(id).into_string(),
            _ => fragment.html.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::MarkdownParser;

    fn parser() -> MarkdownParser {
        let mut parser = MarkdownParser::new();
        parser.add_modifier(Box::new(VideoModifier));
        parser
    }

    #[test]
    fn video_id_from_url_shapes() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), Some("dQw4w9WgXcQ"));
        assert_eq!(
            video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn video_id_rejects_other_urls() {
        assert_eq!(video_id("https://vimeo.com/12345"), None);
        assert_eq!(video_id("https://youtu.be/"), None);
        assert_eq!(video_id("https://youtu.be/<script>"), None);
    }

    #[test]
    fn directive_expands_to_iframe() {
        let html = parser().html("> youtube https://www.youtube.com/watch?v=abc_123\n");
        assert!(html.contains("<div class=\"video-container\">"));
        assert!(html.contains("src=\"https://www.youtube-nocookie.com/embed/abc_123\""));
        assert!(html.contains("allowfullscreen"));
        assert!(!html.contains("<blockquote>"));
    }

    #[test]
    fn malformed_directive_passes_through() {
        let source = "> youtube not-a-url\n";
        assert_eq!(parser().html(source), MarkdownParser::new().html(source));
    }

    #[test]
    fn extra_lines_pass_through() {
        let source = "> youtube https://youtu.be/abc\n> and a caption\n";
        assert_eq!(parser().html(source), MarkdownParser::new().html(source));
    }
}
