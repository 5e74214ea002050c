//! Shared page components.

use crate::config::SiteConfig;
use crate::types::{Item, Tag};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const FONT_AWESOME_KIT: &str = "https://kit.fontawesome.com/99e4242f25.js";
const QUICKSAND: &str =
    "https://fonts.googleapis.com/css2?family=Quicksand:wght@300;400;500;600;700&display=swap";
const PLAYFAIR: &str = "https://fonts.googleapis.com/css2?family=Playfair+Display:ital,wght@0,400;0,600;0,900;1,400;1,600;1,900&display=swap";
const APP_STORE_BANNER: &str =
    "app-id=1535326851, app-clip-bundle-id=uk.co.oliverbinns.oliverbinns.clip";
const JUXTAPOSE_JS: &str = "https://cdn.knightlab.com/libs/juxtapose/latest/js/juxtapose.min.js";
const JUXTAPOSE_CSS: &str = "https://cdn.knightlab.com/libs/juxtapose/latest/css/juxtapose.css";

/// Metadata for the `<head>` of one page.
#[derive(Debug, Clone)]
pub struct HeadMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Site-relative path of the page.
    pub path: &'a str,
    pub image: Option<&'a str>,
}

/// `Post title | Oliver Binns`, or just the site name.
pub fn page_title(title: &str, config: &SiteConfig) -> String {
    if title.is_empty() || title == config.name {
        config.name.clone()
    } else {
        format!("{} | {}", title, config.name)
    }
}

pub fn document(config: &SiteConfig, head: Markup, body_class: Option<&str>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.language) {
            (head)
            body class=[body_class] {
                (body)
            }
        }
    }
}

pub fn head(meta: &HeadMeta<'_>, config: &SiteConfig) -> Markup {
    let title = page_title(meta.title, config);
    let description = if meta.description.is_empty() {
        config.description.as_str()
    } else {
        meta.description
    };
    let url = config.absolute_url(meta.path);
    let image = meta.image.or(config.image_path.as_deref());
    html! {
        head {
            meta charset="UTF-8";
            title { (title) }
            meta name="description" content=(description);
            meta property="og:site_name" content=(config.name);
            meta property="og:url" content=(url);
            meta property="og:title" content=(title);
            meta property="og:description" content=(description);
            meta name="twitter:title" content=(title);
            meta name="twitter:description" content=(description);
            link rel="canonical" href=(url);
            @if let Some(image) = image {
                meta name="twitter:card" content="summary_large_image";
                meta property="og:image" content=(config.absolute_url(image));
                meta name="twitter:image" content=(config.absolute_url(image));
            } @else {
                meta name="twitter:card" content="summary";
            }
            link rel="stylesheet" href="/styles.css" type="text/css";
            link rel="alternate" type="application/rss+xml"
                href=(format!("/{}", config.feed.path)) title=(format!("Subscribe to {}", config.name));
            (global_head(config))
        }
    }
}

/// Fonts, icon kit, browser theme and the App Store banner.
pub fn global_head(config: &SiteConfig) -> Markup {
    html! {
        link rel="preconnect" href="https://fonts.googleapis.com";
        link rel="preconnect" href="https://fonts.gstatic.com" crossorigin;
        link rel="stylesheet" href=(QUICKSAND);
        link rel="stylesheet" href=(PLAYFAIR);
        script async src=(FONT_AWESOME_KIT) crossorigin="anonymous" {}
        meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1";
        meta name="theme-color" content=(config.theme.theme_color);
        meta name="apple-itunes-app" content=(APP_STORE_BANNER);
    }
}

/// Analytics and the image comparison widget, appended to item pages.
pub fn foot_scripts(config: &SiteConfig) -> Markup {
    html! {
        @if let Some(id) = &config.theme.analytics_id {
            script async src=(format!("https://www.googletagmanager.com/gtag/js?id={id}")) {}
            script {
                (PreEscaped(format!(
                    "window.dataLayer = window.dataLayer || [];\n\
                     function gtag(){{dataLayer.push(arguments);}}\n\
                     gtag('js', new Date());\n\
                     gtag('config', '{id}');"
                )))
            }
        }
        script src=(JUXTAPOSE_JS) {}
        link rel="stylesheet" href=(JUXTAPOSE_CSS);
    }
}

pub fn wrapper(content: Markup) -> Markup {
    html! { div.wrapper { (content) } }
}

pub fn divider() -> Markup {
    html! { hr.divider; }
}

pub fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header {
            (wrapper(html! {
                a href="/" {
                    img src="/images/oliver-binns.svg" alt=(config.name);
                    h2 { (config.description) }
                }
            }))
        }
    }
}

pub fn site_footer() -> Markup {
    html! {
        footer {
            (wrapper(html! {
                h2 { a href="mailto:mail@oliverbinns.co.uk" { "mail@oliverbinns.co.uk" } }
                (social_link("https://www.github.com/oliver-binns", "/images/github.svg", "GitHub Logo", "oliver-binns"))
                (social_link("https://www.twitter.com/oliver_binns", "/images/twitter.svg", "Twitter Logo", "oliver_binns"))
                (social_link("https://www.linkedin.com/in/obinns/", "/images/in.svg", "LinkedIn Logo", "obinns"))
            }))
        }
    }
}

fn social_link(href: &str, icon: &str, alt: &str, handle: &str) -> Markup {
    html! {
        h2 {
            a href=(href) target="_blank" {
                img.icon src=(icon) alt=(alt);
                " " (handle)
            }
        }
    }
}

const BIOGRAPHY: [&str; 3] = [
    "Oliver is an experienced software engineer specialising in native iOS development with Swift, holding an MEng in Computer Science from the University of York. As a Manager at Deloitte Digital, he leads teams delivering high-profile mobile apps primary for the public sector. His work has included scaling a public sector app from the very first lines of code to multiple cross-functional feature teams, reaching #1 on the App Store and Google Play.",
    "Beyond iOS, Oliver has wide knowledge of Android (Java, Kotlin, Unity/C#) and web technologies (Angular, PHP, JS, Python). He was shortlisted for Engineer of the Year at the BCS UK IT Industry Awards 2024, is an international conference speaker, and actively contributes to the open-source community. Oliver received WWDC scholarships in 2015 and 2016.",
    "Previously, he worked at Amadeus across several projects (C++, Java, Angular, Python, PHP, Swift) and led the native rebuild (Swift/Kotlin) and backend development (Swift/Vapor) for a healthcare app.",
];

pub fn biography() -> Markup {
    wrapper(html! {
        img.profile-image src="Images/profile-yellow.jpg" alt="A photo of Oliver in a yellow sweater";
        h3 { "Biography" }
        p {
            @for (i, paragraph) in BIOGRAPHY.iter().enumerate() {
                @if i > 0 { br; br; }
                (paragraph)
            }
        }
    })
}

/// `Jun 27, 2020`
pub fn display_date(item: &Item) -> String {
    item.date.format("%b %-d, %Y").to_string()
}

/// A post card on the index page: light without a color, dark on the
/// item's color otherwise.
pub fn post_thumbnail(item: &Item) -> Markup {
    let (theme, style) = match &item.metadata.color {
        Some(color) => ("dark", format!("background-color:{color};")),
        None => ("light", String::new()),
    };
    html! {
        a href=(item.url()) {
            div class=(format!("blog-post {theme}")) style=(style) {
                @if let Some(image) = &item.image_path {
                    img src=(image) aria-hidden="true";
                }
                h4 { (display_date(item)) }
                h1 { (item.title) }
            }
        }
    }
}

/// Post cards in natural order.
pub fn post_list(items: &[&Item]) -> Markup {
    html! {
        div.blog {
            @for item in items {
                (post_thumbnail(item))
            }
        }
    }
}

pub fn item_tag_list<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> Markup {
    html! {
        ul.tag-list {
            @for tag in tags {
                li { a href=(format!("/{}", tag.path())) { (tag.as_str()) } }
            }
        }
    }
}

pub fn item_list(items: &[&Item]) -> Markup {
    html! {
        ul.item-list {
            @for item in items {
                li {
                    article {
                        h1 { a href=(item.url()) { (item.title) } }
                        (item_tag_list(&item.tags))
                        p { (item.description) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::item_dated;

    #[test]
    fn page_title_appends_site_name() {
        let config = SiteConfig::default();
        assert_eq!(page_title("Posts", &config), "Posts | Oliver Binns");
        assert_eq!(page_title("", &config), "Oliver Binns");
        assert_eq!(page_title("Oliver Binns", &config), "Oliver Binns");
    }

    #[test]
    fn head_includes_global_metadata() {
        let config = SiteConfig::default();
        let html = head(
            &HeadMeta {
                title: "About",
                description: "",
                path: "about",
                image: None,
            },
            &config,
        )
        .into_string();
        assert!(html.contains("<title>About | Oliver Binns</title>"));
        assert!(html.contains("content=\"Lead Mobile Developer\""));
        assert!(html.contains("href=\"https://www.oliverbinns.co.uk/about\""));
        assert!(html.contains("kit.fontawesome.com/99e4242f25.js"));
        assert!(html.contains("name=\"theme-color\" content=\"#F9C300\""));
        assert!(html.contains("app-id=1535326851"));
        assert!(html.contains("content=\"summary\""));
    }

    #[test]
    fn head_uses_absolute_image_url() {
        let config = SiteConfig::default();
        let html = head(
            &HeadMeta {
                title: "Post",
                description: "d",
                path: "posts/a",
                image: Some("/images/a.png"),
            },
            &config,
        )
        .into_string();
        assert!(html.contains("content=\"https://www.oliverbinns.co.uk/images/a.png\""));
        assert!(html.contains("summary_large_image"));
    }

    #[test]
    fn thumbnail_light_without_color() {
        let item = item_dated("widget", "2020-06-27");
        let html = post_thumbnail(&item).into_string();
        assert!(html.contains("class=\"blog-post light\""));
        assert!(html.contains("style=\"\""));
        assert!(html.contains("<h4>Jun 27, 2020</h4>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn thumbnail_dark_with_color_and_image() {
        let mut item = item_dated("widget", "2020-06-07");
        item.metadata.color = Some("#E32017".into());
        item.image_path = Some("/images/widget.png".into());
        let html = post_thumbnail(&item).into_string();
        assert!(html.contains("class=\"blog-post dark\""));
        assert!(html.contains("style=\"background-color:#E32017;\""));
        assert!(html.contains("<img src=\"/images/widget.png\" aria-hidden=\"true\">"));
        assert!(html.contains("<h4>Jun 7, 2020</h4>"));
        assert!(html.starts_with("<a href=\"/posts/widget\">"));
    }

    #[test]
    fn tag_list_links_normalized_paths() {
        let tags = [Tag("Swift UI".into())];
        let html = item_tag_list(&tags).into_string();
        assert!(html.contains("<a href=\"/tags/swift-ui\">Swift UI</a>"));
    }

    #[test]
    fn foot_scripts_without_analytics() {
        let mut config = SiteConfig::default();
        config.theme.analytics_id = None;
        let html = foot_scripts(&config).into_string();
        assert!(!html.contains("googletagmanager"));
        assert!(html.contains("juxtapose.min.js"));
    }
}
