//! Reading-time estimate

use crate::content::Section;

/// Average reading speed the estimate assumes
pub const WORDS_PER_MINUTE: usize = 200;

/// Number of tokens produced by splitting on single spaces.
///
/// Consecutive spaces are not collapsed: `"hello  world"` yields three
/// tokens, and the empty string yields one.
pub fn count_words(text: &str) -> usize {
    text.split(' ').count()
}

/// Words in every heading and body paragraph
pub fn total_words(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|section| {
            let body: usize = section.body.iter().map(|entry| count_words(&entry.text)).sum();
            count_words(&section.heading) + body
        })
        .sum()
}

/// Minutes needed to read `sections`, rounded up. No content reads in 0.
pub fn estimate_reading_time(sections: &[Section], words_per_minute: usize) -> usize {
    total_words(sections).div_ceil(words_per_minute.max(1))
}
