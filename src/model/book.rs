use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::record::Record;

/// A chapter of the memory book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChapter {
    #[serde(default)]
    pub id: String,
    pub title: String,
    /// Reading position, positive and unique within the book. Gaps are allowed.
    pub order: u32,
}

/// A page of the memory book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPage {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub occurred_on: NaiveDate,
    pub chapter_id: String,
    /// Global across all chapters, assigned once at creation
    pub page_number: u32,
}

impl Record for DocumentPage {
    fn date(&self) -> NaiveDate {
        self.occurred_on
    }
    fn text_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }
    fn tags(&self) -> &[String] {
        &[]
    }
    fn category(&self) -> Option<&str> {
        Some(&self.chapter_id)
    }
}

/// The whole memory book: every page in one arena ordered by page number,
/// plus a chapter index used for display grouping only.
#[derive(Debug, Clone, Default)]
pub struct MemoryBook {
    /// Chapters in reading order
    pub chapters: Vec<DocumentChapter>,
    /// All pages, ascending by `page_number`
    pub pages: Vec<DocumentPage>,
    /// Chapter id → indices into `pages`, in page order
    chapter_index: IndexMap<String, Vec<usize>>,
}

impl MemoryBook {
    pub fn new(mut chapters: Vec<DocumentChapter>, mut pages: Vec<DocumentPage>) -> Self {
        chapters.sort_by_key(|c| c.order);
        pages.sort_by_key(|p| p.page_number);

        let mut chapter_index: IndexMap<String, Vec<usize>> = chapters
            .iter()
            .map(|c| (c.id.clone(), Vec::new()))
            .collect();
        for (idx, page) in pages.iter().enumerate() {
            match chapter_index.get_mut(&page.chapter_id) {
                Some(slots) => slots.push(idx),
                None => tracing::warn!(
                    page = %page.id,
                    chapter = %page.chapter_id,
                    "page references a missing chapter"
                ),
            }
        }

        MemoryBook {
            chapters,
            pages,
            chapter_index,
        }
    }

    pub fn chapter(&self, chapter_id: &str) -> Option<&DocumentChapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }

    pub fn page(&self, page_id: &str) -> Option<&DocumentPage> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    /// Pages of one chapter in page order. Empty for an empty or unknown chapter.
    pub fn chapter_pages(&self, chapter_id: &str) -> Vec<&DocumentPage> {
        self.chapter_index
            .get(chapter_id)
            .map(|slots| slots.iter().map(|&i| &self.pages[i]).collect())
            .unwrap_or_default()
    }

    /// Table of contents: every chapter in reading order with its pages.
    pub fn contents(&self) -> Vec<(&DocumentChapter, Vec<&DocumentPage>)> {
        self.chapters
            .iter()
            .map(|c| (c, self.chapter_pages(&c.id)))
            .collect()
    }

    /// Pages whose chapter no longer exists
    pub fn orphaned_pages(&self) -> Vec<&DocumentPage> {
        self.pages
            .iter()
            .filter(|p| !self.chapter_index.contains_key(&p.chapter_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: &str, order: u32) -> DocumentChapter {
        DocumentChapter {
            id: id.into(),
            title: format!("Chapter {}", id),
            order,
        }
    }

    fn page(id: &str, chapter_id: &str, page_number: u32) -> DocumentPage {
        DocumentPage {
            id: id.into(),
            title: format!("Page {}", id),
            content: String::new(),
            occurred_on: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            chapter_id: chapter_id.into(),
            page_number,
        }
    }

    #[test]
    fn test_chapters_sorted_by_order() {
        let book = MemoryBook::new(
            vec![chapter("CH-002", 5), chapter("CH-001", 1)],
            Vec::new(),
        );
        let ids: Vec<_> = book.chapters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CH-001", "CH-002"]);
    }

    #[test]
    fn test_chapter_pages_in_page_order() {
        let book = MemoryBook::new(
            vec![chapter("A", 1), chapter("B", 2)],
            vec![page("P3", "A", 3), page("P1", "A", 1), page("P2", "B", 2)],
        );
        let a: Vec<_> = book.chapter_pages("A").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(a, vec!["P1", "P3"]);
        let b: Vec<_> = book.chapter_pages("B").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(b, vec!["P2"]);
    }

    #[test]
    fn test_empty_chapter_lists_nothing() {
        let book = MemoryBook::new(vec![chapter("A", 1), chapter("B", 2)], vec![page("P1", "A", 1)]);
        assert!(book.chapter_pages("B").is_empty());
        assert!(book.chapter_pages("nope").is_empty());
        let toc = book.contents();
        assert_eq!(toc.len(), 2);
        assert!(toc[1].1.is_empty());
    }

    #[test]
    fn test_orphaned_pages_stay_in_arena() {
        let book = MemoryBook::new(vec![chapter("A", 1)], vec![page("P1", "A", 1), page("P2", "Z", 2)]);
        assert_eq!(book.pages.len(), 2);
        let orphans: Vec<_> = book.orphaned_pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(orphans, vec!["P2"]);
    }
}
