use std::cmp::Reverse;

use chrono::{Duration, NaiveDateTime};

use crate::model::repository::FileRecord;
use crate::search::{normalize, SearchSpec};

/// how far back a file's modified date still counts as "recent" for scoring and the
/// recent view
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// additive relevance score for one file against one search. Every matching condition
/// contributes independently, so several can stack on the same file:
///
/// - display name contains / starts with the full phrase: +100 / +50 more
/// - original name contains / starts with the full phrase: +80 / +40 more
/// - display name / original name contains a query word: +30 / +25 per word
/// - a tag contains a query word: +20 per (word, tag) pair, +40 more on exact equality
/// - modified within the recent window: +10; favorite: +15
pub fn score(file: &FileRecord, spec: &SearchSpec, now: NaiveDateTime) -> i64 {
    let phrase = normalize(&spec.original_query);
    let name = file.name.to_lowercase();
    let original_name = file.original_name.to_lowercase();
    let mut total: i64 = 0;
    if name.contains(&phrase) {
        total += 100;
        if name.starts_with(&phrase) {
            total += 50;
        }
    }
    if original_name.contains(&phrase) {
        total += 80;
        if original_name.starts_with(&phrase) {
            total += 40;
        }
    }
    for word in spec.words.iter() {
        if name.contains(word) {
            total += 30;
        }
        if original_name.contains(word) {
            total += 25;
        }
        for tag in file.tags.iter() {
            let tag = normalize(tag);
            if tag.contains(word) {
                total += 20;
                if &tag == word {
                    total += 40;
                }
            }
        }
    }
    if file.modified_date >= now - Duration::days(RECENT_WINDOW_DAYS) {
        total += 10;
    }
    if file.is_favorite {
        total += 15;
    }
    total
}

/// reorders a result page by descending relevance. The sort is stable, so files with
/// equal scores keep the store's most-recently-modified-first pre-order
pub fn rank(files: &mut [FileRecord], spec: &SearchSpec) {
    let now = chrono::offset::Local::now().naive_local();
    files.sort_by_key(|file| Reverse(score(file, spec, now)));
}
