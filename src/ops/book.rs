use chrono::NaiveDate;

use crate::model::book::{DocumentChapter, DocumentPage, MemoryBook};
use crate::store::{RecordStore, StoreError};

/// Error type for memory book operations
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("chapter not found: {0}")]
    ChapterNotFound(String),
    #[error("page not found: {0}")]
    PageNotFound(String),
    #[error("chapter order must be a positive number")]
    InvalidOrder,
    #[error("chapter order {order} is already used by {chapter_id}")]
    DuplicateOrder { order: u32, chapter_id: String },
    #[error("no {0} left to assign")]
    NumberingExhausted(&'static str),
    #[error("chapter {chapter_id} still has {pages} page(s)")]
    ChapterNotEmpty { chapter_id: String, pages: usize },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// The pages on either side of a page in global page order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent<'a> {
    pub previous: Option<&'a DocumentPage>,
    pub next: Option<&'a DocumentPage>,
}

/// Fields for a page that does not exist yet
#[derive(Debug, Clone)]
pub struct NewPage {
    pub title: String,
    pub content: String,
    pub occurred_on: NaiveDate,
    pub chapter_id: String,
}

/// Changes to an existing page. `None` leaves a field as it is. The page
/// number is not editable.
#[derive(Debug, Clone, Default)]
pub struct PageEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub chapter_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Ordering rules
// ---------------------------------------------------------------------------

/// One past the highest page number in the whole book, regardless of chapter.
pub fn next_page_number(pages: &[DocumentPage]) -> Result<u32, BookError> {
    pages
        .iter()
        .map(|p| p.page_number)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(BookError::NumberingExhausted("page numbers"))
}

/// One past the highest chapter order.
pub fn next_chapter_order(chapters: &[DocumentChapter]) -> Result<u32, BookError> {
    chapters
        .iter()
        .map(|c| c.order)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(BookError::NumberingExhausted("chapter orders"))
}

/// Previous and next page around `page_id`, walking every page of the
/// book by page number. Navigation crosses chapter boundaries.
pub fn adjacent<'a>(pages: &'a [DocumentPage], page_id: &str) -> Result<Adjacent<'a>, BookError> {
    let mut ordered: Vec<&DocumentPage> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page_number);
    let pos = ordered
        .iter()
        .position(|p| p.id == page_id)
        .ok_or_else(|| BookError::PageNotFound(page_id.to_string()))?;
    Ok(Adjacent {
        previous: pos.checked_sub(1).map(|i| ordered[i]),
        next: ordered.get(pos + 1).copied(),
    })
}

fn require_chapter(chapters: &[DocumentChapter], chapter_id: &str) -> Result<(), BookError> {
    if chapters.iter().any(|c| c.id == chapter_id) {
        Ok(())
    } else {
        Err(BookError::ChapterNotFound(chapter_id.to_string()))
    }
}

/// Build a chapter. Without an explicit order it goes after the last chapter.
pub fn new_chapter(
    chapters: &[DocumentChapter],
    title: String,
    order: Option<u32>,
) -> Result<DocumentChapter, BookError> {
    let order = match order {
        Some(0) => return Err(BookError::InvalidOrder),
        Some(n) => {
            if let Some(taken) = chapters.iter().find(|c| c.order == n) {
                return Err(BookError::DuplicateOrder {
                    order: n,
                    chapter_id: taken.id.clone(),
                });
            }
            n
        }
        None => next_chapter_order(chapters)?,
    };
    Ok(DocumentChapter {
        id: String::new(),
        title,
        order,
    })
}

/// Build a page at the end of the book's global page sequence.
pub fn new_page(
    chapters: &[DocumentChapter],
    pages: &[DocumentPage],
    new: NewPage,
) -> Result<DocumentPage, BookError> {
    require_chapter(chapters, &new.chapter_id)?;
    Ok(DocumentPage {
        id: String::new(),
        title: new.title,
        content: new.content,
        occurred_on: new.occurred_on,
        chapter_id: new.chapter_id,
        page_number: next_page_number(pages)?,
    })
}

/// Apply an edit to a page. Moving to another chapter keeps the page number.
pub fn edit_page(
    chapters: &[DocumentChapter],
    page: &DocumentPage,
    edit: PageEdit,
) -> Result<DocumentPage, BookError> {
    let mut next = page.clone();
    if let Some(chapter_id) = edit.chapter_id {
        require_chapter(chapters, &chapter_id)?;
        next.chapter_id = chapter_id;
    }
    if let Some(title) = edit.title {
        next.title = title;
    }
    if let Some(content) = edit.content {
        next.content = content;
    }
    if let Some(on) = edit.occurred_on {
        next.occurred_on = on;
    }
    Ok(next)
}

// ---------------------------------------------------------------------------
// Store round trips
// ---------------------------------------------------------------------------

/// Read every chapter and page into a `MemoryBook`.
pub fn load_book<S: RecordStore>(store: &S) -> Result<MemoryBook, BookError> {
    let chapters: Vec<DocumentChapter> = store.list_all()?;
    let pages: Vec<DocumentPage> = store.list_all()?;
    Ok(MemoryBook::new(chapters, pages))
}

pub fn add_chapter<S: RecordStore>(
    store: &mut S,
    title: String,
    order: Option<u32>,
) -> Result<DocumentChapter, BookError> {
    let chapters: Vec<DocumentChapter> = store.list_all()?;
    let chapter = new_chapter(&chapters, title, order)?;
    let saved = store.insert(chapter)?;
    tracing::info!(id = %saved.id, order = saved.order, "chapter created");
    Ok(saved)
}

/// Create a page numbered after every existing page in the book.
pub fn add_page<S: RecordStore>(store: &mut S, new: NewPage) -> Result<DocumentPage, BookError> {
    let chapters: Vec<DocumentChapter> = store.list_all()?;
    let pages: Vec<DocumentPage> = store.list_all()?;
    let page = new_page(&chapters, &pages, new)?;
    let saved = store.insert(page)?;
    tracing::info!(
        id = %saved.id,
        chapter = %saved.chapter_id,
        page_number = saved.page_number,
        "page created"
    );
    Ok(saved)
}

pub fn update_page<S: RecordStore>(
    store: &mut S,
    page_id: &str,
    edit: PageEdit,
) -> Result<DocumentPage, BookError> {
    let chapters: Vec<DocumentChapter> = store.list_all()?;
    let page = match store.get::<DocumentPage>(page_id) {
        Ok(page) => page,
        Err(StoreError::NotFound { .. }) => {
            return Err(BookError::PageNotFound(page_id.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    let next = edit_page(&chapters, &page, edit)?;
    Ok(store.update(page_id, next)?)
}

/// Delete a page. Other pages keep their numbers.
pub fn delete_page<S: RecordStore>(store: &mut S, page_id: &str) -> Result<(), BookError> {
    match store.delete::<DocumentPage>(page_id) {
        Ok(()) => {
            tracing::info!(id = page_id, "page deleted");
            Ok(())
        }
        Err(StoreError::NotFound { .. }) => Err(BookError::PageNotFound(page_id.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Delete an empty chapter. Other chapters keep their order.
pub fn delete_chapter<S: RecordStore>(store: &mut S, chapter_id: &str) -> Result<(), BookError> {
    let pages = store.list(|p: &DocumentPage| p.chapter_id == chapter_id)?;
    if !pages.is_empty() {
        return Err(BookError::ChapterNotEmpty {
            chapter_id: chapter_id.to_string(),
            pages: pages.len(),
        });
    }
    match store.delete::<DocumentChapter>(chapter_id) {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound { .. }) => Err(BookError::ChapterNotFound(chapter_id.to_string())),
        Err(e) => Err(e.into()),
    }
}
