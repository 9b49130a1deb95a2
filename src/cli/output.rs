use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::book::{DocumentChapter, DocumentPage, MemoryBook};
use crate::model::message::ScheduledMessage;
use crate::model::record::{AnyRecord, EmergencyContact, Medication, Record};
use crate::ops::book::Adjacent;
use crate::ops::classify::{CalendarBuckets, PriorityTier, TimeOfDay};
use crate::util::unicode::column;

const TITLE_CELLS: usize = 32;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CalendarMonthJson<'a> {
    pub month: String,
    pub days: Vec<CalendarDayJson<'a>>,
}

#[derive(Serialize)]
pub struct CalendarDayJson<'a> {
    pub day: u32,
    pub records: Vec<&'a AnyRecord>,
}

#[derive(Serialize)]
pub struct YearJson<'a, R: Serialize> {
    pub year: i32,
    pub records: Vec<&'a R>,
}

#[derive(Serialize)]
pub struct SlotJson<'a> {
    pub slot: TimeOfDay,
    pub medications: Vec<&'a Medication>,
}

#[derive(Serialize)]
pub struct TierJson<'a> {
    pub tier: PriorityTier,
    pub contacts: Vec<&'a EmergencyContact>,
}

#[derive(Serialize)]
pub struct PageRefJson {
    pub id: String,
    pub title: String,
    pub page_number: u32,
}

#[derive(Serialize)]
pub struct PageViewJson<'a> {
    pub page: &'a DocumentPage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<&'a DocumentChapter>,
    pub previous: Option<PageRefJson>,
    pub next: Option<PageRefJson>,
}

#[derive(Serialize)]
pub struct TocChapterJson<'a> {
    #[serde(flatten)]
    pub chapter: &'a DocumentChapter,
    pub pages: Vec<PageRefJson>,
}

#[derive(Serialize)]
pub struct TocJson<'a> {
    pub chapters: Vec<TocChapterJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orphaned: Vec<PageRefJson>,
}

pub fn calendar_to_json<'a>(
    buckets: &CalendarBuckets<'a, AnyRecord>,
) -> Vec<CalendarMonthJson<'a>> {
    buckets
        .iter()
        .map(|(month, days)| CalendarMonthJson {
            month: month.clone(),
            days: days
                .iter()
                .map(|(day, records)| CalendarDayJson {
                    day: *day,
                    records: records.clone(),
                })
                .collect(),
        })
        .collect()
}

pub fn years_to_json<'a, R: Serialize>(
    years: &IndexMap<i32, Vec<&'a R>>,
) -> Vec<YearJson<'a, R>> {
    years
        .iter()
        .map(|(year, records)| YearJson {
            year: *year,
            records: records.clone(),
        })
        .collect()
}

pub fn page_ref(page: &DocumentPage) -> PageRefJson {
    PageRefJson {
        id: page.id.clone(),
        title: page.title.clone(),
        page_number: page.page_number,
    }
}

pub fn page_view_to_json<'a>(
    page: &'a DocumentPage,
    chapter: Option<&'a DocumentChapter>,
    adjacent: &Adjacent<'_>,
) -> PageViewJson<'a> {
    PageViewJson {
        page,
        chapter,
        previous: adjacent.previous.map(page_ref),
        next: adjacent.next.map(page_ref),
    }
}

pub fn toc_to_json(book: &MemoryBook) -> TocJson<'_> {
    TocJson {
        chapters: book
            .contents()
            .into_iter()
            .map(|(chapter, pages)| TocChapterJson {
                chapter,
                pages: pages.into_iter().map(page_ref).collect(),
            })
            .collect(),
        orphaned: book.orphaned_pages().into_iter().map(page_ref).collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// One-line summary: `ID  DATE  TITLE  CATEGORY  #tags`
pub fn format_record_line(record: &AnyRecord, date_format: &str) -> String {
    let id = column(record.id(), 8);
    let date = record.date().format(date_format).to_string();
    let title = column(record.display_title(), TITLE_CELLS);
    let tags = format_tags(record.tags());
    join_nonempty(&[
        id.as_str(),
        date.as_str(),
        title.as_str(),
        record.category().unwrap_or(""),
        tags.as_str(),
    ])
}

pub fn format_month_header(label: &str) -> String {
    format!("== {} ==", label)
}

pub fn format_medication_line(med: &Medication) -> String {
    let id = column(&med.id, 8);
    let name = column(&med.name, TITLE_CELLS);
    join_nonempty(&[
        id.as_str(),
        name.as_str(),
        med.dosage.as_str(),
        med.frequency.as_str(),
    ])
}

pub fn format_contact_line(contact: &EmergencyContact) -> String {
    let id = column(&contact.id, 8);
    let name = column(&contact.name, 24);
    join_nonempty(&[
        id.as_str(),
        name.as_str(),
        contact.relationship.as_str(),
        contact.phone.as_str(),
        contact.email.as_deref().unwrap_or(""),
    ])
}

fn format_optional_date(date: Option<NaiveDate>, date_format: &str) -> String {
    match date {
        Some(d) => d.format(date_format).to_string(),
        None => "-".to_string(),
    }
}

/// `ID  [status]  deliver-date  to RECIPIENT: SUBJECT`
pub fn format_message_line(message: &ScheduledMessage, date_format: &str) -> String {
    let id = column(&message.id, 8);
    let status = column(&format!("[{}]", message.status), 11);
    let delivery = column(&format_optional_date(message.delivery_on, date_format), 10);
    let target = format!("to {}: {}", message.recipient, message.subject);
    join_nonempty(&[
        id.as_str(),
        status.as_str(),
        delivery.as_str(),
        target.as_str(),
    ])
}

pub fn format_message_detail(message: &ScheduledMessage, date_format: &str) -> Vec<String> {
    let mut lines = vec![
        format!("{} [{}]", message.id, message.status),
        format!("to: {}", message.recipient),
        format!("subject: {}", message.subject),
        format!("written: {}", message.authored_on.format(date_format)),
        format!(
            "deliver: {}",
            format_optional_date(message.delivery_on, date_format)
        ),
    ];
    if !message.tags.is_empty() {
        lines.push(format!("tags: {}", format_tags(&message.tags)));
    }
    lines.push(String::new());
    lines.extend(message.content.lines().map(str::to_string));
    lines
}

pub fn format_chapter_line(chapter: &DocumentChapter) -> String {
    format!("{:>3}. {}  ({})", chapter.order, chapter.title, chapter.id)
}

pub fn format_page_line(page: &DocumentPage) -> String {
    format!(
        "  p{:<4} {}  {}",
        page.page_number,
        column(&page.id, 8),
        page.title
    )
}

pub fn format_page_detail(
    page: &DocumentPage,
    chapter: Option<&DocumentChapter>,
    adjacent: &Adjacent<'_>,
    date_format: &str,
) -> Vec<String> {
    let chapter_label = match chapter {
        Some(c) => format!("{} ({})", c.title, c.id),
        None => format!("{} (missing)", page.chapter_id),
    };
    let neighbour = |p: Option<&DocumentPage>| match p {
        Some(p) => format!("p{} {} {}", p.page_number, p.id, p.title),
        None => "-".to_string(),
    };
    let mut lines = vec![
        format!("p{} {}  {}", page.page_number, page.id, page.title),
        format!("chapter: {}", chapter_label),
        format!("date: {}", page.occurred_on.format(date_format)),
        String::new(),
    ];
    lines.extend(page.content.lines().map(str::to_string));
    lines.push(String::new());
    lines.push(format!("prev: {}", neighbour(adjacent.previous)));
    lines.push(format!("next: {}", neighbour(adjacent.next)));
    lines
}

pub fn format_toc(book: &MemoryBook) -> Vec<String> {
    let mut lines = Vec::new();
    for (chapter, pages) in book.contents() {
        lines.push(format_chapter_line(chapter));
        lines.extend(pages.into_iter().map(format_page_line));
    }
    let orphaned = book.orphaned_pages();
    if !orphaned.is_empty() {
        lines.push("  -- pages with a missing chapter --".to_string());
        lines.extend(orphaned.into_iter().map(format_page_line));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::message::MessageStatus;
    use crate::model::record::{Appointment, AppointmentStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_appointment() -> AnyRecord {
        AnyRecord::Appointment(Appointment {
            id: "APT-001".into(),
            title: "Dental cleaning".into(),
            provider: "Dr. Ortiz".into(),
            location: String::new(),
            occurred_on: date(2025, 3, 14),
            time: None,
            notes: String::new(),
            tags: vec!["dental".into()],
            status: AppointmentStatus::Upcoming,
        })
    }

    fn sample_book() -> MemoryBook {
        let chapters = vec![DocumentChapter {
            id: "CH-001".into(),
            title: "Early years".into(),
            order: 1,
        }];
        let page = |id: &str, n: u32, chapter: &str| DocumentPage {
            id: id.into(),
            title: format!("Page {}", n),
            content: String::new(),
            occurred_on: date(1990, 1, 1),
            chapter_id: chapter.into(),
            page_number: n,
        };
        MemoryBook::new(
            chapters,
            vec![page("PG-001", 1, "CH-001"), page("PG-002", 2, "CH-009")],
        )
    }

    #[test]
    fn test_format_record_line() {
        let line = format_record_line(&sample_appointment(), "%Y-%m-%d");
        assert!(line.starts_with("APT-001   2025-03-14  Dental cleaning"));
        assert!(line.ends_with("upcoming  #dental"));
    }

    #[test]
    fn test_format_record_line_custom_date() {
        let line = format_record_line(&sample_appointment(), "%d/%m/%Y");
        assert!(line.contains("14/03/2025"));
    }

    #[test]
    fn test_format_message_line_without_date() {
        let message = ScheduledMessage {
            id: "MSG-001".into(),
            recipient: "Sam".into(),
            subject: "For your wedding day".into(),
            content: "Dear Sam".into(),
            authored_on: date(2025, 1, 1),
            delivery_on: None,
            status: MessageStatus::Draft,
            tags: Vec::new(),
        };
        let line = format_message_line(&message, "%Y-%m-%d");
        assert!(line.starts_with("MSG-001   [draft]"));
        assert!(line.contains("-"));
        assert!(line.ends_with("to Sam: For your wedding day"));
    }

    #[test]
    fn test_toc_lists_orphans() {
        let book = sample_book();
        let lines = format_toc(&book);
        assert_eq!(lines[0], "  1. Early years  (CH-001)");
        assert!(lines[1].contains("PG-001"));
        assert!(lines.iter().any(|l| l.contains("missing chapter")));
        assert!(lines.last().unwrap().contains("PG-002"));
    }

    #[test]
    fn test_toc_json_shape() {
        let book = sample_book();
        let json = serde_json::to_value(toc_to_json(&book)).unwrap();
        assert_eq!(json["chapters"][0]["id"], "CH-001");
        assert_eq!(json["chapters"][0]["pages"][0]["page_number"], 1);
        assert_eq!(json["orphaned"][0]["id"], "PG-002");
    }

    #[test]
    fn test_record_json_is_tagged() {
        let json = serde_json::to_value(sample_appointment()).unwrap();
        assert_eq!(json["kind"], "appointment");
        assert_eq!(json["occurred_on"], "2025-03-14");
    }
}
