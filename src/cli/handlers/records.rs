use crate::cli::commands::{AddArgs, CalendarArgs, RmArgs, SearchArgs, TagsArgs};
use crate::cli::output::*;
use crate::model::entity::Entity;
use crate::model::record::*;
use crate::ops::classify;
use crate::ops::index::{self, CategoryFilter};
use crate::store::{RecordStore, StoreError};

use super::{CmdResult, Context, print_json, print_lines};

fn parse_kind(s: &str) -> Result<RecordKind, String> {
    RecordKind::parse_kind(s).ok_or_else(|| {
        let kinds: Vec<&str> = RecordKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("unknown record kind: {} (expected {})", s, kinds.join(", "))
    })
}

/// `--kind` if given, otherwise every kind
fn kinds_or_all(kind: Option<&str>) -> Result<Vec<RecordKind>, String> {
    match kind {
        Some(k) => Ok(vec![parse_kind(k)?]),
        None => Ok(RecordKind::ALL.to_vec()),
    }
}

// ---------------------------------------------------------------------------
// Kind-dispatched store access
// ---------------------------------------------------------------------------

fn list_as_any<S, T>(store: &S) -> Result<Vec<AnyRecord>, StoreError>
where
    S: RecordStore,
    T: Entity + Into<AnyRecord>,
{
    Ok(store.list_all::<T>()?.into_iter().map(Into::into).collect())
}

fn load_kind<S: RecordStore>(store: &S, kind: RecordKind) -> Result<Vec<AnyRecord>, StoreError> {
    match kind {
        RecordKind::Appointment => list_as_any::<S, Appointment>(store),
        RecordKind::Immunization => list_as_any::<S, Immunization>(store),
        RecordKind::Medication => list_as_any::<S, Medication>(store),
        RecordKind::Contact => list_as_any::<S, EmergencyContact>(store),
        RecordKind::Document => list_as_any::<S, LegacyDocument>(store),
        RecordKind::Pet => list_as_any::<S, PetRecord>(store),
    }
}

fn load_kinds<S: RecordStore>(
    store: &S,
    kinds: &[RecordKind],
) -> Result<Vec<AnyRecord>, StoreError> {
    let mut records = Vec::new();
    for kind in kinds {
        records.extend(load_kind(store, *kind)?);
    }
    Ok(records)
}

fn insert_json<S, T>(store: &mut S, json: &str) -> Result<AnyRecord, Box<dyn std::error::Error>>
where
    S: RecordStore,
    T: Entity + Into<AnyRecord>,
{
    let record: T = serde_json::from_str(json)
        .map_err(|e| format!("invalid {} record: {}", T::TABLE, e))?;
    Ok(store.insert(record)?.into())
}

fn insert_kind<S: RecordStore>(
    store: &mut S,
    kind: RecordKind,
    json: &str,
) -> Result<AnyRecord, Box<dyn std::error::Error>> {
    match kind {
        RecordKind::Appointment => insert_json::<S, Appointment>(store, json),
        RecordKind::Immunization => insert_json::<S, Immunization>(store, json),
        RecordKind::Medication => insert_json::<S, Medication>(store, json),
        RecordKind::Contact => insert_json::<S, EmergencyContact>(store, json),
        RecordKind::Document => insert_json::<S, LegacyDocument>(store, json),
        RecordKind::Pet => insert_json::<S, PetRecord>(store, json),
    }
}

fn delete_kind<S: RecordStore>(store: &mut S, kind: RecordKind, id: &str) -> Result<(), StoreError> {
    match kind {
        RecordKind::Appointment => store.delete::<Appointment>(id),
        RecordKind::Immunization => store.delete::<Immunization>(id),
        RecordKind::Medication => store.delete::<Medication>(id),
        RecordKind::Contact => store.delete::<EmergencyContact>(id),
        RecordKind::Document => store.delete::<LegacyDocument>(id),
        RecordKind::Pet => store.delete::<PetRecord>(id),
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

pub fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let kind = parse_kind(&args.kind)?;
    let mut session = ctx.open()?;
    let record = insert_kind(session.writer()?, kind, &args.json)?;
    if session.json {
        return print_json(&record);
    }
    println!("{} added: {}", record.id(), record.display_title());
    Ok(())
}

pub fn cmd_rm(ctx: &Context, args: RmArgs) -> CmdResult {
    let kind = parse_kind(&args.kind)?;
    let mut session = ctx.open()?;
    delete_kind(session.writer()?, kind, &args.id)?;
    println!("{} removed", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Grouped views
// ---------------------------------------------------------------------------

pub fn cmd_calendar(ctx: &Context, args: CalendarArgs) -> CmdResult {
    let kind = parse_kind(&args.kind)?;
    let session = ctx.open()?;
    let all = load_kind(&session.store, kind)?;
    let category = CategoryFilter::from_option(args.category.as_deref());
    let mut records: Vec<AnyRecord> = index::filter(&all, "", &category)
        .into_iter()
        .cloned()
        .collect();
    classify::sort_by_date(&mut records);

    let buckets = classify::group_by_month(&records, &session.vault.config.display.month_label);
    if session.json {
        return print_json(&calendar_to_json(&buckets));
    }
    let mut lines = Vec::new();
    for (month, days) in &buckets {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_month_header(month));
        for (day, on_day) in days {
            lines.push(format!("{:>2}", day));
            for record in on_day {
                lines.push(format!("    {}", format_record_line(record, session.date_format())));
            }
        }
    }
    print_lines(&lines);
    Ok(())
}

pub fn cmd_immunizations(ctx: &Context) -> CmdResult {
    let session = ctx.open()?;
    let mut records = load_kind(&session.store, RecordKind::Immunization)?;
    classify::sort_by_date(&mut records);
    let years = classify::group_by_year(&records);
    if session.json {
        return print_json(&years_to_json(&years));
    }
    let mut lines = Vec::new();
    for (year, in_year) in &years {
        lines.push(year.to_string());
        for record in in_year {
            lines.push(format!("  {}", format_record_line(record, session.date_format())));
        }
    }
    print_lines(&lines);
    Ok(())
}

pub fn cmd_meds(ctx: &Context) -> CmdResult {
    let session = ctx.open()?;
    let meds: Vec<Medication> = session.store.list_all()?;
    let slots = classify::group_by_time_of_day(&meds);
    if session.json {
        let out: Vec<SlotJson> = slots
            .into_iter()
            .map(|(slot, medications)| SlotJson { slot, medications })
            .collect();
        return print_json(&out);
    }
    if slots.is_empty() {
        println!("no active daily medications");
        return Ok(());
    }
    for (slot, due) in &slots {
        println!("{}", slot);
        for med in due {
            println!("  {}", format_medication_line(med));
        }
    }
    Ok(())
}

pub fn cmd_contacts(ctx: &Context) -> CmdResult {
    let session = ctx.open()?;
    let contacts: Vec<EmergencyContact> = session.store.list_all()?;
    let tiers = classify::group_by_priority(&contacts);
    if session.json {
        let out: Vec<TierJson> = tiers
            .into_iter()
            .map(|(tier, contacts)| TierJson { tier, contacts })
            .collect();
        return print_json(&out);
    }
    for (tier, in_tier) in &tiers {
        println!("{}", tier);
        for contact in in_tier {
            println!("  {}", format_contact_line(contact));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Search and tags
// ---------------------------------------------------------------------------

pub fn cmd_search(ctx: &Context, args: SearchArgs) -> CmdResult {
    let kinds = kinds_or_all(args.kind.as_deref())?;
    let session = ctx.open()?;
    let mut records = load_kinds(&session.store, &kinds)?;
    if let Some(tag) = &args.tag {
        records = index::filter_by_tag(&records, tag)
            .into_iter()
            .cloned()
            .collect();
    }
    let category = CategoryFilter::from_option(args.category.as_deref());
    let hits = index::filter(&records, &args.query, &category);

    if session.json {
        return print_json(&hits);
    }
    if hits.is_empty() {
        println!("no matches");
        return Ok(());
    }
    for hit in hits {
        println!(
            "{:<12} {}",
            hit.kind().as_str(),
            format_record_line(hit, session.date_format())
        );
    }
    Ok(())
}

pub fn cmd_tags(ctx: &Context, args: TagsArgs) -> CmdResult {
    let kinds = kinds_or_all(args.kind.as_deref())?;
    let session = ctx.open()?;
    let records = load_kinds(&session.store, &kinds)?;
    let tags = index::distinct_tags(&records);
    if session.json {
        return print_json(&tags);
    }
    for tag in tags {
        println!("#{}", tag);
    }
    Ok(())
}
