//! Markdown to HTML with block-level modifier hooks.
//!
//! [`MarkdownParser`] wraps pulldown-cmark. Plugins register [`Modifier`]s
//! against a [`ModifierTarget`]; when the parser meets a block of that kind it
//! renders the block to HTML as usual, then hands both the HTML and the block's
//! markdown source to each matching modifier in installation order. Each
//! modifier receives the HTML produced by the previous one and returns the
//! replacement.
//!
//! ```text
//! > prettylink https://example.com      ──┐
//! > title Example                          │  BlockQuotes modifier
//! > description An example site          ──┘  → <a …><div class="pretty-link">…
//! ```
//!
//! Only the outermost block is offered to modifiers; a blockquote nested in
//! another blockquote is part of its parent's source.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, html};
use std::ops::Range;

/// Block kinds a [`Modifier`] can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTarget {
    BlockQuotes,
    CodeBlocks,
}

impl ModifierTarget {
    fn matches(self, tag: &Tag<'_>) -> bool {
        matches!(
            (self, tag),
            (ModifierTarget::BlockQuotes, Tag::BlockQuote(_))
                | (ModifierTarget::CodeBlocks, Tag::CodeBlock(_))
        )
    }
}

/// Literal content of a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// First word of the fence info string, if any.
    pub language: Option<&'a str>,
    pub code: &'a str,
}

/// A block offered to a modifier.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    /// Current HTML for the block: the default rendering, or the output of the
    /// previous modifier.
    pub html: &'a str,
    /// Markdown source of the whole block, trailing newlines trimmed.
    pub markdown: &'a str,
    /// Set for code blocks.
    pub code: Option<CodeBlock<'a>>,
}

/// A block rewrite installed by a plugin.
pub trait Modifier {
    fn target(&self) -> ModifierTarget;

    /// Return the HTML that replaces the block. Returning `fragment.html`
    /// unchanged leaves the block as rendered.
    fn modify(&self, fragment: &Fragment<'_>) -> String;
}

/// Markdown parser with installed modifiers.
#[derive(Default)]
pub struct MarkdownParser {
    modifiers: Vec<Box<dyn Modifier>>,
}

impl std::fmt::Debug for MarkdownParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownParser")
            .field("modifiers", &self.modifiers.len())
            .finish()
    }
}

/// A block being collected for modifiers.
struct Capture<'a> {
    target: ModifierTarget,
    range: Range<usize>,
    depth: usize,
    events: Vec<Event<'a>>,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_modifier(&mut self, modifier: Box<dyn Modifier>) {
        self.modifiers.push(modifier);
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    fn options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    }

    fn has_target(&self, tag: &Tag<'_>) -> Option<ModifierTarget> {
        self.modifiers
            .iter()
            .map(|m| m.target())
            .find(|target| target.matches(tag))
    }

    /// Render markdown to HTML, applying installed modifiers.
    pub fn html(&self, markdown: &str) -> String {
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut capture: Option<Capture<'_>> = None;

        for (event, range) in Parser::new_ext(markdown, Self::options()).into_offset_iter() {
            if let Some(active) = capture.as_mut() {
                match &event {
                    Event::Start(_) => active.depth += 1,
                    Event::End(_) => active.depth -= 1,
                    _ => {}
                }
                active.events.push(event);
                if active.depth == 0 {
                    if let Some(done) = capture.take() {
                        let replaced = self.apply(&done, markdown);
                        events.push(Event::Html(CowStr::from(replaced)));
                    }
                }
                continue;
            }

            match &event {
                Event::Start(tag) => match self.has_target(tag) {
                    Some(target) => {
                        capture = Some(Capture {
                            target,
                            range,
                            depth: 1,
                            events: vec![event],
                        });
                    }
                    None => events.push(event),
                },
                _ => events.push(event),
            }
        }

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }

    fn apply(&self, capture: &Capture<'_>, markdown: &str) -> String {
        let mut rendered = String::new();
        html::push_html(&mut rendered, capture.events.iter().cloned());

        let source = markdown[capture.range.clone()].trim_end_matches(['\n', '\r']);
        let code_text = collect_code(&capture.events);
        let code = match capture.target {
            ModifierTarget::CodeBlocks => Some(CodeBlock {
                language: code_language(&capture.events),
                code: &code_text,
            }),
            ModifierTarget::BlockQuotes => None,
        };

        for modifier in self.modifiers.iter().filter(|m| m.target() == capture.target) {
            rendered = modifier.modify(&Fragment {
                html: &rendered,
                markdown: source,
                code,
            });
        }
        rendered
    }
}

fn code_language<'a>(events: &'a [Event<'a>]) -> Option<&'a str> {
    match events.first() {
        Some(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))) => info
            .split_whitespace()
            .next()
            .filter(|lang| !lang.is_empty()),
        _ => None,
    }
}

fn collect_code(events: &[Event<'_>]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(text) => Some(text.as_ref()),
            _ => None,
        })
        .collect()
}
