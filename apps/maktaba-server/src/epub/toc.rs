//! Table of contents

use super::types::{Chapter, TocEntry};

/// Project the chapter list into TOC entries, one per chapter
pub fn build_toc(chapters: &[Chapter]) -> Vec<TocEntry> {
    chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| TocEntry {
            id: chapter.id.clone(),
            title: chapter.title.clone(),
            order: chapter.order,
            index,
        })
        .collect()
}
