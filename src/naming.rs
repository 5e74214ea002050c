//! Path and title derivation for content files and tags.
//!
//! Output paths are derived deterministically from the content tree:
//!
//! - `Content/posts/tube-status-widget.md` → `posts/tube-status-widget`
//! - `Content/about.md` → `about`
//! - `Content/talks/2023.md` → `talks/2023`
//!
//! A front matter `path` overrides the file-derived slug but stays inside the
//! item's section. Tags are normalized for URLs the same way everywhere:
//!
//! - `Swift UI` → `swift-ui`
//! - `C++` → `c-plus-plus`, `C#` → `c-sharp`
//! - `🎉` → `tag-1f389`

/// Normalize a tag for use in a URL path segment.
///
/// Lowercases, turns whitespace into dashes, spells out `#` and `+`, and drops
/// anything else that is not an ASCII alphanumeric or a dash. A tag with
/// nothing left falls back to its code points so it still gets its own page.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim();
    let mut spelled = String::with_capacity(tag.len());
    for c in tag.to_lowercase().chars() {
        match c {
            '#' => spelled.push_str("-sharp-"),
            '+' => spelled.push_str("-plus-"),
            c if c.is_whitespace() || c == '_' => spelled.push('-'),
            c if c.is_ascii_alphanumeric() || c == '-' => spelled.push(c),
            _ => {}
        }
    }

    let slug = collapse_dashes(&spelled);
    if !slug.is_empty() || tag.is_empty() {
        return slug;
    }
    let points: Vec<String> = tag
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| format!("{:x}", c as u32))
        .collect();
    format!("tag-{}", points.join("-"))
}

fn collapse_dashes(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut prev_dash = false;
    for c in raw.chars() {
        if c == '-' {
            if !prev_dash {
                collapsed.push('-');
            }
            prev_dash = true;
        } else {
            collapsed.push(c);
            prev_dash = false;
        }
    }
    collapsed.trim_matches('-').to_string()
}

/// Sanitize a string for use as a path segment.
///
/// - Replaces characters other than ASCII alphanumerics, `-` and `/` with dashes
/// - Collapses consecutive dashes into one
/// - Strips leading and trailing dashes and slashes
pub fn sanitize_path(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '/' {
                c
            } else {
                '-'
            }
        })
        .collect();

    collapse_dashes(&mapped)
        .trim_matches(|c| c == '-' || c == '/')
        .to_string()
}

/// Display title derived from a filename stem when front matter and the
/// body have none: dashes become spaces.
///
/// - `tube-status-widget` → `tube status widget`
pub fn title_from_stem(stem: &str) -> String {
    stem.replace(['-', '_'], " ")
}

/// Join a section directory and an item slug into a site-relative path.
pub fn item_path(section: &str, slug: &str) -> String {
    let slug = sanitize_path(slug);
    if slug.is_empty() {
        section.to_string()
    } else {
        format!("{section}/{slug}")
    }
}
