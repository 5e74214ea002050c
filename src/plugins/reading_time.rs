//! Reading-time estimates for ingested items.

use crate::types::{ReadingTime, Sections};

pub const WORDS_PER_MINUTE: usize = 200;

/// Whitespace-separated words in a markdown body.
pub fn count_words(markdown: &str) -> usize {
    markdown.split_whitespace().count()
}

/// Minutes to read `words`, rounded up. Zero words read in zero minutes.
pub fn estimate(words: usize, words_per_minute: usize) -> ReadingTime {
    let wpm = words_per_minute.max(1);
    let minutes = words.div_ceil(wpm);
    ReadingTime {
        words,
        minutes: u32::try_from(minutes).unwrap_or(u32::MAX),
    }
}

/// Set [`Item::reading_time`](crate::types::Item::reading_time) on every item.
pub fn annotate(sections: &mut Sections, words_per_minute: usize) {
    for section in sections.iter_mut() {
        for item in &mut section.items {
            item.reading_time = Some(estimate(count_words(&item.body), words_per_minute));
        }
    }
}
