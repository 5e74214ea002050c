//! JSON API export.
//!
//! Produces a machine-readable view of the posts section for the companion
//! app:
//!
//! ```text
//! Output/api/
//! ├── posts.json                     # [{title, readingTime, date, ...}]
//! └── posts/
//!     ├── tube-status-widget.md      # raw markdown, image prefix rewritten
//!     └── ...
//! ```
//!
//! `posts.json` keeps ingestion order. Absent image and color are `null`,
//! never omitted. Dates are RFC 3339 in UTC (`2020-06-27T10:00:00Z`).

use crate::context::PublishingContext;
use crate::pipeline::BuildError;
use crate::types::{Item, SectionId};
use chrono::SecondsFormat;
use serde::Serialize;
use std::fs;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostJson {
    pub title: String,
    pub reading_time: u32,
    pub date: String,
    pub image_path: Option<String>,
    pub content_path: String,
    pub color: Option<String>,
}

impl From<&Item> for PostJson {
    fn from(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            reading_time: item.reading_minutes(),
            date: item.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            image_path: item.image_path.clone(),
            content_path: item.path.clone(),
            color: item.metadata.color.clone(),
        }
    }
}

pub fn posts_json(context: &PublishingContext) -> Vec<PostJson> {
    context
        .sections
        .get(SectionId::Posts)
        .items
        .iter()
        .map(PostJson::from)
        .collect()
}

/// Replace every occurrence of the source-relative image prefix.
pub fn rewrite_image_prefix(markdown: &str, from: &str, to: &str) -> String {
    markdown.replace(from, to)
}

/// Write `posts.json` and mirror the raw posts directory. Returns the number
/// of files written.
pub fn generate_api(context: &mut PublishingContext) -> Result<usize, BuildError> {
    let json = serde_json::to_vec(&posts_json(context))?;
    let posts_json_path = context.config.api.posts_json.clone();
    context.write_output_file(&posts_json_path, json)?;

    let source = context.content_dir().join(SectionId::Posts.as_str());
    if !source.is_dir() {
        return Err(BuildError::MissingDirectory(source));
    }
    let api = context.config.api.clone();
    let mut written = 1;
    for entry in WalkDir::new(&source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path
            .strip_prefix(&source)
            .map_err(|_| BuildError::MissingDirectory(source.clone()))?
            .to_string_lossy()
            .replace('\\', "/");
        let target = format!("{}/{}", api.posts_dir.trim_end_matches('/'), rel);

        let is_markdown = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("md"));
        if is_markdown {
            let markdown = fs::read_to_string(path)?;
            let rewritten =
                rewrite_image_prefix(&markdown, &api.image_prefix_from, &api.image_prefix_to);
            context.write_output_file(&target, rewritten)?;
        } else {
            context.write_output_file(&target, fs::read(path)?)?;
        }
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::item_dated;
    use crate::types::ReadingTime;
    use tempfile::TempDir;

    #[test]
    fn post_json_encodes_fields() {
        let mut item = item_dated("tube-status-widget", "2020-06-27");
        item.title = "Tube Status".into();
        item.reading_time = Some(ReadingTime { words: 900, minutes: 5 });
        item.image_path = Some("/images/tube.png".into());
        item.metadata.color = Some("#E32017".into());

        let value = serde_json::to_value(PostJson::from(&item)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Tube Status",
                "readingTime": 5,
                "date": "2020-06-27T00:00:00Z",
                "imagePath": "/images/tube.png",
                "contentPath": "posts/tube-status-widget",
                "color": "#E32017",
            })
        );
    }

    #[test]
    fn absent_optionals_are_null() {
        let item = item_dated("plain", "2021-01-01");
        let value = serde_json::to_value(PostJson::from(&item)).unwrap();
        assert!(value["imagePath"].is_null());
        assert!(value["color"].is_null());
        assert_eq!(value["readingTime"], 0);
    }

    #[test]
    fn rewrites_every_prefix_occurrence() {
        let md = "![a](../../Images/a.png) and ![b](../../Images/b.png)";
        assert_eq!(
            rewrite_image_prefix(md, "../../Images/", "/Images/"),
            "![a](/Images/a.png) and ![b](/Images/b.png)"
        );
    }

    #[test]
    fn mirrors_posts_directory() {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("Content/posts");
        fs::create_dir_all(posts.join("assets")).unwrap();
        fs::write(posts.join("a.md"), "![x](../../Images/x.png)").unwrap();
        fs::write(posts.join("assets/raw.bin"), [0u8, 159, 146, 150]).unwrap();

        let mut ctx = PublishingContext::new(SiteConfig::default(), tmp.path());
        ctx.sections
            .get_mut(SectionId::Posts)
            .items
            .push(item_dated("a", "2021-01-01"));

        assert_eq!(generate_api(&mut ctx).unwrap(), 3);
        let out = ctx.output_dir().join("api");
        assert_eq!(
            fs::read_to_string(out.join("posts/a.md")).unwrap(),
            "![x](/Images/x.png)"
        );
        assert_eq!(fs::read(out.join("posts/assets/raw.bin")).unwrap(), vec![0u8, 159, 146, 150]);

        let list: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(out.join("posts.json")).unwrap()).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn missing_posts_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = PublishingContext::new(SiteConfig::default(), tmp.path());
        assert!(matches!(
            generate_api(&mut ctx),
            Err(BuildError::MissingDirectory(_))
        ));
    }
}
