//! RSS feed generation.
//!
//! One RSS 2.0 channel over the configured sections (posts by default),
//! newest first and capped at `feed.max_items`. Each entry carries the
//! rendered HTML as `content:encoded`.

use crate::context::PublishingContext;
use crate::pipeline::BuildError;
use crate::types::{Item, SectionId};
use rss::{Channel, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};

// ============================================================================
// Public API
// ============================================================================

/// Feed entries: items of `sections`, newest first, at most `max_items`.
pub fn feed_items<'a>(
    context: &'a PublishingContext,
    sections: &[SectionId],
    max_items: usize,
) -> Vec<&'a Item> {
    let mut items: Vec<&Item> = sections
        .iter()
        .flat_map(|id| context.sections.get(*id).items.iter())
        .collect();
    items.sort_by(|a, b| Item::natural_order(a, b));
    items.truncate(max_items);
    items
}

/// Build and validate the channel.
pub fn build_channel(
    context: &PublishingContext,
    sections: &[SectionId],
) -> Result<Channel, BuildError> {
    let config = &context.config;
    let entries = feed_items(context, sections, config.feed.max_items);
    let last_build_date = entries.first().map(|item| item.date.to_rfc2822());
    let items: Vec<rss::Item> = entries
        .into_iter()
        .map(|item| item_to_rss(item, context))
        .collect();

    let channel = ChannelBuilder::default()
        .title(config.name.clone())
        .link(config.url.clone())
        .description(config.description.clone())
        .language(Some(config.language.clone()))
        .ttl(Some(config.feed.ttl.to_string()))
        .last_build_date(last_build_date)
        .generator(Some(env!("CARGO_PKG_NAME").to_string()))
        .items(items)
        .build();

    channel.validate()?;
    Ok(channel)
}

/// Write the feed to `feed.path`. Returns the number of files written.
pub fn generate_rss_feed(
    context: &mut PublishingContext,
    sections: &[SectionId],
) -> Result<usize, BuildError> {
    let channel = build_channel(context, sections)?;
    let path = context.config.feed.path.clone();
    context.write_output_file(&path, channel.to_string())?;
    Ok(1)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn item_to_rss(item: &Item, context: &PublishingContext) -> rss::Item {
    let link = context.config.absolute_url(&item.path);
    let description = if item.description.is_empty() {
        None
    } else {
        Some(item.description.clone())
    };
    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(description)
        .pub_date(Some(item.date.to_rfc2822()))
        .content(Some(item.content.clone()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::item_dated;

    fn context() -> PublishingContext {
        let mut ctx = PublishingContext::new(SiteConfig::default(), "/tmp/unused");
        let posts = ctx.sections.get_mut(SectionId::Posts);
        let mut older = item_dated("tube-status-widget", "2020-06-27");
        older.description = "Widgets".into();
        older.content = "<p>Tube</p>".into();
        posts.items.push(older);
        posts.items.push(item_dated("advent-of-code-21", "2021-12-26"));

        let mut thing = item_dated("app-clip", "2022-01-01");
        thing.section = SectionId::Things;
        thing.path = "things/app-clip".into();
        ctx.sections.get_mut(SectionId::Things).items.push(thing);
        ctx
    }

    #[test]
    fn only_configured_sections_newest_first() {
        let ctx = context();
        let paths: Vec<&str> = feed_items(&ctx, &[SectionId::Posts], 100)
            .iter()
            .map(|i| i.path.as_str())
            .collect();
        assert_eq!(paths, vec!["posts/advent-of-code-21", "posts/tube-status-widget"]);
    }

    #[test]
    fn max_items_caps_entries() {
        let ctx = context();
        let items = feed_items(&ctx, &[SectionId::Posts, SectionId::Things], 2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].path, "things/app-clip");
    }

    #[test]
    fn channel_carries_site_metadata() {
        let ctx = context();
        let channel = build_channel(&ctx, &[SectionId::Posts]).unwrap();
        assert_eq!(channel.title(), "Oliver Binns");
        assert_eq!(channel.link(), "https://www.oliverbinns.co.uk");
        assert_eq!(channel.ttl(), Some("250"));
        assert_eq!(channel.items().len(), 2);

        let item = &channel.items()[1];
        assert_eq!(
            item.link(),
            Some("https://www.oliverbinns.co.uk/posts/tube-status-widget")
        );
        assert_eq!(item.description(), Some("Widgets"));
        assert_eq!(item.content(), Some("<p>Tube</p>"));
        assert!(item.guid().unwrap().is_permalink());
        assert_eq!(item.pub_date(), Some("Sat, 27 Jun 2020 00:00:00 +0000"));
    }

    #[test]
    fn invalid_site_url_fails_validation() {
        let mut ctx = context();
        ctx.config.url = "not a url".into();
        let err = build_channel(&ctx, &[SectionId::Posts]).unwrap_err();
        assert!(matches!(err, BuildError::Feed(_)));
        // The validation error stays reachable as the source
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.is::<rss::validation::ValidationError>());
    }
}
