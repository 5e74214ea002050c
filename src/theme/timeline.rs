//! The "Times" timeline on the index page.
//!
//! Items are grouped by calendar year (UTC). Years run newest first and each
//! year's items follow the section's natural order:
//!
//! ```text
//! 2023
//!   ├── BCS awards shortlist        (2023-07-10)
//! 2021
//!   ├── WWDC                        (2021-11-05)
//!   └── Joined Deloitte             (2021-03-01)
//! ```

use crate::types::Item;
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub items: Vec<&'a Item>,
}

pub fn group_by_year<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<YearGroup<'a>> {
    let mut years: BTreeMap<i32, Vec<&Item>> = BTreeMap::new();
    for item in items {
        years.entry(item.year()).or_default().push(item);
    }
    years
        .into_iter()
        .rev()
        .map(|(year, mut items)| {
            items.sort_by(|a, b| Item::natural_order(a, b));
            YearGroup { year, items }
        })
        .collect()
}

/// `fas fa-briefcase`, or `fas` when the item has no icon.
pub fn icon_class(item: &Item) -> String {
    match item.metadata.icon.as_deref().map(str::trim) {
        Some(icon) if !icon.is_empty() => format!("fas {icon}"),
        _ => "fas".to_string(),
    }
}

pub fn timeline<'a>(items: impl IntoIterator<Item = &'a Item>) -> Markup {
    html! {
        @for group in group_by_year(items) {
            h4.year { (group.year) }
            @for item in &group.items {
                div.timeline-item {
                    i class=(icon_class(item)) aria-hidden="true" {}
                    (PreEscaped(&item.content))
                }
            }
        }
    }
}
