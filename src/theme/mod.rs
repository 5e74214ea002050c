//! Page templates.
//!
//! An [`HtmlFactory`] maps each kind of content entity to markup. It never
//! touches the filesystem: [`generate`](crate::generate) decides where the
//! result is written. Tag pages are optional per configuration, so their
//! entry points return `Option<Markup>` and `None` means no file.
//!
//! [`OliverTheme`] is the site's theme, built from [`components`] with
//! [maud](https://maud.lambda.xyz/).

pub mod components;
pub mod timeline;

use crate::context::PublishingContext;
use crate::types::{Item, Page, Section, SectionId, Tag};
use components::HeadMeta;
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeSet;

pub trait HtmlFactory {
    fn index(&self, context: &PublishingContext) -> Markup;
    fn section(&self, section: &Section, context: &PublishingContext) -> Markup;
    fn item(&self, item: &Item, context: &PublishingContext) -> Markup;
    fn page(&self, page: &Page, context: &PublishingContext) -> Markup;
    fn tag_list(&self, tags: &BTreeSet<Tag>, context: &PublishingContext) -> Option<Markup>;
    fn tag_details(&self, tag: &Tag, context: &PublishingContext) -> Option<Markup>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OliverTheme;

impl HtmlFactory for OliverTheme {
    fn index(&self, context: &PublishingContext) -> Markup {
        let config = &context.config;
        let head = components::head(
            &HeadMeta {
                title: context.index.title.as_deref().unwrap_or(&config.name),
                description: context.index.description.as_deref().unwrap_or(""),
                path: "",
                image: None,
            },
            config,
        );
        let posts = context.sections.get(SectionId::Posts).items_by_date();
        let times = &context.sections.get(SectionId::Times).items;
        components::document(
            config,
            head,
            None,
            html! {
                (components::site_header(config))
                (components::biography())
                (components::divider())
                (components::wrapper(html! {
                    h3 { "Posts" }
                    (components::post_list(&posts))
                }))
                (components::divider())
                (components::wrapper(html! {
                    h3 { "Times" }
                    (timeline::timeline(times))
                }))
                (components::site_footer())
            },
        )
    }

    fn section(&self, section: &Section, context: &PublishingContext) -> Markup {
        let config = &context.config;
        let head = components::head(
            &HeadMeta {
                title: &section.title,
                description: &section.description,
                path: section.path(),
                image: None,
            },
            config,
        );
        let items = section.items_by_date();
        components::document(
            config,
            head,
            None,
            html! {
                (components::site_header(config))
                (components::wrapper(html! {
                    h1 { (section.title) }
                    (components::item_list(&items))
                }))
                (components::site_footer())
            },
        )
    }

    fn item(&self, item: &Item, context: &PublishingContext) -> Markup {
        let config = &context.config;
        let head = components::head(
            &HeadMeta {
                title: &item.title,
                description: &item.description,
                path: &item.path,
                image: item.image_path.as_deref(),
            },
            config,
        );
        components::document(
            config,
            head,
            Some("item-page"),
            html! {
                (components::site_header(config))
                (components::wrapper(html! {
                    article {
                        @if let Some(time) = item.reading_time {
                            p.reading-time { (time.minutes) " min read" }
                        }
                        div.content { (PreEscaped(&item.content)) }
                        span { "Tagged with: " }
                        (components::item_tag_list(&item.tags))
                    }
                }))
                (components::site_footer())
                @if config.theme.foot_scripts {
                    (components::foot_scripts(config))
                }
            },
        )
    }

    fn page(&self, page: &Page, context: &PublishingContext) -> Markup {
        let config = &context.config;
        let head = components::head(
            &HeadMeta {
                title: &page.title,
                description: &page.description,
                path: &page.path,
                image: None,
            },
            config,
        );
        components::document(
            config,
            head,
            None,
            html! {
                (components::site_header(config))
                (components::wrapper(PreEscaped(page.content.clone())))
                (components::site_footer())
            },
        )
    }

    fn tag_list(&self, tags: &BTreeSet<Tag>, context: &PublishingContext) -> Option<Markup> {
        let config = &context.config;
        if !config.theme.tag_pages {
            return None;
        }
        let head = components::head(
            &HeadMeta {
                title: "Tags",
                description: "",
                path: "tags",
                image: None,
            },
            config,
        );
        Some(components::document(
            config,
            head,
            None,
            html! {
                (components::site_header(config))
                (components::wrapper(html! {
                    h1 { "Browse all tags" }
                    ul.all-tags {
                        @for tag in tags {
                            li.tag { a href=(format!("/{}", tag.path())) { (tag.as_str()) } }
                        }
                    }
                }))
                (components::site_footer())
            },
        ))
    }

    fn tag_details(&self, tag: &Tag, context: &PublishingContext) -> Option<Markup> {
        let config = &context.config;
        if !config.theme.tag_pages {
            return None;
        }
        let title = format!("Tagged with {}", tag.as_str());
        let path = tag.path();
        let head = components::head(
            &HeadMeta {
                title: &title,
                description: "",
                path: &path,
                image: None,
            },
            config,
        );
        let items = context.sections.items_tagged(tag);
        Some(components::document(
            config,
            head,
            None,
            html! {
                (components::site_header(config))
                (components::wrapper(html! {
                    h1 { "Tagged with " span.tag { (tag.as_str()) } }
                    a.browse-all href="/tags" { "Browse all tags" }
                    (components::item_list(&items))
                }))
                (components::site_footer())
            },
        ))
    }
}
