use chrono::NaiveDate;

use crate::model::message::{MessageStatus, ScheduledMessage};
use crate::store::{RecordStore, StoreError};

/// Error type for message lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("message is missing required field: {0}")]
    MissingField(&'static str),
    #[error("a scheduled message needs a delivery date")]
    MissingDeliveryDate,
    #[error("cannot move message {id} from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: MessageStatus,
        to: MessageStatus,
    },
    #[error("message {0} has been delivered and can no longer change")]
    AlreadyDelivered(String),
    #[error("message not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Fields for a message that does not exist yet
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub recipient: String,
    pub subject: String,
    pub content: String,
    pub authored_on: NaiveDate,
    pub delivery_on: Option<NaiveDate>,
    /// Initial status; `Scheduled` requires `delivery_on`
    pub status: MessageStatus,
    pub tags: Vec<String>,
}

/// Changes to an existing message. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct MessageEdit {
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub delivery_on: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl MessageEdit {
    pub fn is_empty(&self) -> bool {
        self.recipient.is_none()
            && self.subject.is_none()
            && self.content.is_none()
            && self.delivery_on.is_none()
            && self.tags.is_none()
    }
}

/// A requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// draft → scheduled. Without a date, the draft's own date is kept, else today.
    Schedule { delivery_on: Option<NaiveDate> },
    /// draft | scheduled → delivered
    Deliver,
}

impl Transition {
    pub fn target(self) -> MessageStatus {
        match self {
            Transition::Schedule { .. } => MessageStatus::Scheduled,
            Transition::Deliver => MessageStatus::Delivered,
        }
    }
}

// ---------------------------------------------------------------------------
// Pure lifecycle rules
// ---------------------------------------------------------------------------

fn require_fields(recipient: &str, subject: &str, content: &str) -> Result<(), DeliveryError> {
    for (name, value) in [
        ("recipient", recipient),
        ("subject", subject),
        ("content", content),
    ] {
        if value.trim().is_empty() {
            return Err(DeliveryError::MissingField(name));
        }
    }
    Ok(())
}

/// Build a new message. Creating one directly as scheduled requires a
/// delivery date up front; there is no defaulting here.
pub fn create_message(new: NewMessage) -> Result<ScheduledMessage, DeliveryError> {
    require_fields(&new.recipient, &new.subject, &new.content)?;
    if new.status == MessageStatus::Scheduled && new.delivery_on.is_none() {
        return Err(DeliveryError::MissingDeliveryDate);
    }
    Ok(ScheduledMessage {
        id: String::new(),
        recipient: new.recipient,
        subject: new.subject,
        content: new.content,
        authored_on: new.authored_on,
        delivery_on: new.delivery_on,
        status: new.status,
        tags: new.tags,
    })
}

/// draft → scheduled. The delivery date is `delivery_on` when given, else
/// the date already on the draft, else `today`.
pub fn schedule(
    message: &ScheduledMessage,
    delivery_on: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<ScheduledMessage, DeliveryError> {
    match message.status {
        MessageStatus::Draft => {}
        MessageStatus::Delivered => {
            return Err(DeliveryError::AlreadyDelivered(message.id.clone()));
        }
        from => {
            return Err(DeliveryError::InvalidTransition {
                id: message.id.clone(),
                from,
                to: MessageStatus::Scheduled,
            });
        }
    }
    require_fields(&message.recipient, &message.subject, &message.content)?;

    let mut next = message.clone();
    next.delivery_on = Some(delivery_on.or(message.delivery_on).unwrap_or(today));
    next.status = MessageStatus::Scheduled;
    Ok(next)
}

/// draft | scheduled → delivered.
pub fn deliver(message: &ScheduledMessage) -> Result<ScheduledMessage, DeliveryError> {
    if message.status.is_terminal() {
        return Err(DeliveryError::AlreadyDelivered(message.id.clone()));
    }
    let mut next = message.clone();
    next.status = MessageStatus::Delivered;
    Ok(next)
}

pub fn transition(
    message: &ScheduledMessage,
    transition: Transition,
    today: NaiveDate,
) -> Result<ScheduledMessage, DeliveryError> {
    match transition {
        Transition::Schedule { delivery_on } => schedule(message, delivery_on, today),
        Transition::Deliver => deliver(message),
    }
}

/// Apply an edit. Drafts change freely; a scheduled message keeps its
/// delivery date unless the edit names a new one; delivered messages are frozen.
pub fn edit(
    message: &ScheduledMessage,
    edit: MessageEdit,
) -> Result<ScheduledMessage, DeliveryError> {
    if message.status.is_terminal() {
        return Err(DeliveryError::AlreadyDelivered(message.id.clone()));
    }
    let mut next = message.clone();
    if let Some(recipient) = edit.recipient {
        next.recipient = recipient;
    }
    if let Some(subject) = edit.subject {
        next.subject = subject;
    }
    if let Some(content) = edit.content {
        next.content = content;
    }
    if let Some(tags) = edit.tags {
        next.tags = tags;
    }
    if let Some(on) = edit.delivery_on {
        next.delivery_on = Some(on);
    }
    require_fields(&next.recipient, &next.subject, &next.content)?;
    Ok(next)
}

/// Scheduled messages whose delivery date has arrived, earliest first.
pub fn due_messages(messages: &[ScheduledMessage], today: NaiveDate) -> Vec<&ScheduledMessage> {
    let mut due: Vec<&ScheduledMessage> = messages
        .iter()
        .filter(|m| m.status == MessageStatus::Scheduled)
        .filter(|m| m.delivery_on.is_some_and(|on| on <= today))
        .collect();
    due.sort_by_key(|m| m.delivery_on);
    due
}

// ---------------------------------------------------------------------------
// Store round trips
// ---------------------------------------------------------------------------

fn load<S: RecordStore>(store: &S, id: &str) -> Result<ScheduledMessage, DeliveryError> {
    match store.get::<ScheduledMessage>(id) {
        Ok(message) => Ok(message),
        Err(StoreError::NotFound { .. }) => Err(DeliveryError::NotFound(id.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Validate and insert a new message. Returns it with its assigned id.
pub fn add_message<S: RecordStore>(
    store: &mut S,
    new: NewMessage,
) -> Result<ScheduledMessage, DeliveryError> {
    let message = create_message(new)?;
    let saved = store.insert(message)?;
    tracing::info!(id = %saved.id, status = %saved.status, "message created");
    Ok(saved)
}

/// Read the message, apply the transition, and write the whole record back
/// in one update, so status and delivery date change together or not at all.
pub fn apply_transition<S: RecordStore>(
    store: &mut S,
    id: &str,
    requested: Transition,
    today: NaiveDate,
) -> Result<ScheduledMessage, DeliveryError> {
    let current = load(store, id)?;
    let next = transition(&current, requested, today)?;
    let saved = store.update(id, next)?;
    tracing::info!(
        id,
        from = %current.status,
        to = %saved.status,
        delivery_on = ?saved.delivery_on,
        "message transition"
    );
    Ok(saved)
}

pub fn edit_message<S: RecordStore>(
    store: &mut S,
    id: &str,
    changes: MessageEdit,
) -> Result<ScheduledMessage, DeliveryError> {
    let current = load(store, id)?;
    let next = edit(&current, changes)?;
    Ok(store.update(id, next)?)
}

/// Mark every due message delivered. Returns the messages that changed.
pub fn deliver_due<S: RecordStore>(
    store: &mut S,
    today: NaiveDate,
) -> Result<Vec<ScheduledMessage>, DeliveryError> {
    let messages: Vec<ScheduledMessage> = store.list_all()?;
    let due_ids: Vec<String> = due_messages(&messages, today)
        .into_iter()
        .map(|m| m.id.clone())
        .collect();
    let mut delivered = Vec::with_capacity(due_ids.len());
    for id in due_ids {
        delivered.push(apply_transition(store, &id, Transition::Deliver, today)?);
    }
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    fn sample_new() -> NewMessage {
        NewMessage {
            recipient: "Theo".into(),
            subject: "On your eighteenth birthday".into(),
            content: "I am so proud of you.".into(),
            authored_on: date(2025, 6, 1),
            delivery_on: None,
            status: MessageStatus::Draft,
            tags: vec!["birthday".into()],
        }
    }

    fn sample_draft() -> ScheduledMessage {
        let mut m = create_message(sample_new()).unwrap();
        m.id = "MSG-001".into();
        m
    }

    // --- Creation ---

    #[test]
    fn test_create_draft() {
        let m = create_message(sample_new()).unwrap();
        assert_eq!(m.status, MessageStatus::Draft);
        assert_eq!(m.delivery_on, None);
    }

    #[test]
    fn test_create_scheduled_requires_date() {
        let mut new = sample_new();
        new.status = MessageStatus::Scheduled;
        assert!(matches!(
            create_message(new.clone()),
            Err(DeliveryError::MissingDeliveryDate)
        ));

        new.delivery_on = Some(date(2031, 3, 9));
        let m = create_message(new).unwrap();
        assert_eq!(m.status, MessageStatus::Scheduled);
        assert_eq!(m.delivery_on, Some(date(2031, 3, 9)));
    }

    #[test]
    fn test_create_requires_fields() {
        let mut new = sample_new();
        new.subject = "   ".into();
        assert!(matches!(
            create_message(new),
            Err(DeliveryError::MissingField("subject"))
        ));
    }

    // --- Schedule ---

    #[test]
    fn test_schedule_defaults_to_today() {
        let m = schedule(&sample_draft(), None, today()).unwrap();
        assert_eq!(m.status, MessageStatus::Scheduled);
        assert_eq!(m.delivery_on, Some(today()));
    }

    #[test]
    fn test_schedule_with_explicit_date() {
        let m = schedule(&sample_draft(), Some(date(2030, 1, 1)), today()).unwrap();
        assert_eq!(m.delivery_on, Some(date(2030, 1, 1)));
    }

    #[test]
    fn test_schedule_keeps_date_already_on_draft() {
        let mut draft = sample_draft();
        draft.delivery_on = Some(date(2029, 12, 25));
        let m = schedule(&draft, None, today()).unwrap();
        assert_eq!(m.delivery_on, Some(date(2029, 12, 25)));
    }

    #[test]
    fn test_schedule_missing_recipient_fails() {
        let mut draft = sample_draft();
        draft.recipient = String::new();
        let err = schedule(&draft, None, today()).unwrap_err();
        assert!(matches!(err, DeliveryError::MissingField("recipient")));
        assert_eq!(draft.status, MessageStatus::Draft);
    }

    #[test]
    fn test_schedule_twice_is_invalid() {
        let scheduled = schedule(&sample_draft(), None, today()).unwrap();
        assert!(matches!(
            schedule(&scheduled, None, today()),
            Err(DeliveryError::InvalidTransition {
                from: MessageStatus::Scheduled,
                to: MessageStatus::Scheduled,
                ..
            })
        ));
    }

    // --- Deliver ---

    #[test]
    fn test_deliver_from_draft_and_scheduled() {
        let from_draft = deliver(&sample_draft()).unwrap();
        assert_eq!(from_draft.status, MessageStatus::Delivered);
        assert_eq!(from_draft.delivery_on, None);

        let scheduled = schedule(&sample_draft(), Some(date(2025, 7, 1)), today()).unwrap();
        let from_scheduled = deliver(&scheduled).unwrap();
        assert_eq!(from_scheduled.status, MessageStatus::Delivered);
        assert_eq!(from_scheduled.delivery_on, Some(date(2025, 7, 1)));
    }

    #[test]
    fn test_delivered_is_terminal() {
        let delivered = deliver(&sample_draft()).unwrap();
        assert!(matches!(
            deliver(&delivered),
            Err(DeliveryError::AlreadyDelivered(_))
        ));
        assert!(matches!(
            schedule(&delivered, None, today()),
            Err(DeliveryError::AlreadyDelivered(_))
        ));
        assert!(matches!(
            edit(&delivered, MessageEdit::default()),
            Err(DeliveryError::AlreadyDelivered(_))
        ));
    }

    // --- Edit ---

    #[test]
    fn test_edit_scheduled_keeps_delivery_date() {
        let scheduled = schedule(&sample_draft(), Some(date(2026, 2, 2)), today()).unwrap();
        let edited = edit(
            &scheduled,
            MessageEdit {
                subject: Some("For your 18th".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(edited.subject, "For your 18th");
        assert_eq!(edited.delivery_on, Some(date(2026, 2, 2)));
        assert_eq!(edited.status, MessageStatus::Scheduled);
    }

    #[test]
    fn test_edit_scheduled_new_date() {
        let scheduled = schedule(&sample_draft(), Some(date(2026, 2, 2)), today()).unwrap();
        let edited = edit(
            &scheduled,
            MessageEdit {
                delivery_on: Some(date(2027, 2, 2)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(edited.delivery_on, Some(date(2027, 2, 2)));
    }

    #[test]
    fn test_edit_cannot_blank_required_field() {
        let result = edit(
            &sample_draft(),
            MessageEdit {
                content: Some(String::new()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(DeliveryError::MissingField("content"))));
    }

    // --- Due ---

    #[test]
    fn test_due_messages() {
        let mut a = schedule(&sample_draft(), Some(date(2025, 6, 15)), today()).unwrap();
        a.id = "MSG-001".into();
        let mut b = schedule(&sample_draft(), Some(date(2025, 1, 1)), today()).unwrap();
        b.id = "MSG-002".into();
        let mut c = schedule(&sample_draft(), Some(date(2025, 6, 16)), today()).unwrap();
        c.id = "MSG-003".into();
        let mut d = sample_draft();
        d.id = "MSG-004".into();
        let messages = vec![a, b, c, d];
        let due: Vec<_> = due_messages(&messages, today())
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(due, vec!["MSG-002", "MSG-001"]);
    }

    // --- Store round trips ---

    #[test]
    fn test_apply_transition_persists() {
        let mut store = MemoryStore::new();
        let saved = add_message(&mut store, sample_new()).unwrap();
        assert_eq!(saved.id, "MSG-001");

        let scheduled = apply_transition(
            &mut store,
            "MSG-001",
            Transition::Schedule { delivery_on: None },
            today(),
        )
        .unwrap();
        assert_eq!(scheduled.delivery_on, Some(today()));

        let stored: ScheduledMessage = store.get("MSG-001").unwrap();
        assert_eq!(stored.status, MessageStatus::Scheduled);
        assert_eq!(stored.delivery_on, Some(today()));
    }

    #[test]
    fn test_apply_transition_not_found() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            apply_transition(&mut store, "MSG-404", Transition::Deliver, today()),
            Err(DeliveryError::NotFound(_))
        ));
    }

    #[test]
    fn test_failed_validation_leaves_store_untouched() {
        let mut store = MemoryStore::new();
        let mut draft = create_message(sample_new()).unwrap();
        draft.recipient = String::new();
        store.insert(draft).unwrap();

        let result = apply_transition(
            &mut store,
            "MSG-001",
            Transition::Schedule { delivery_on: None },
            today(),
        );
        assert!(result.is_err());
        let stored: ScheduledMessage = store.get("MSG-001").unwrap();
        assert_eq!(stored.status, MessageStatus::Draft);
        assert_eq!(stored.delivery_on, None);
    }

    #[test]
    fn test_store_failure_propagates_without_partial_write() {
        let mut store = MemoryStore::new();
        add_message(&mut store, sample_new()).unwrap();
        store.set_fail_writes(true);

        let result = apply_transition(
            &mut store,
            "MSG-001",
            Transition::Schedule { delivery_on: None },
            today(),
        );
        assert!(matches!(
            result,
            Err(DeliveryError::Store(StoreError::Unavailable(_)))
        ));
        let stored: ScheduledMessage = store.get("MSG-001").unwrap();
        assert_eq!(stored.status, MessageStatus::Draft);
        assert_eq!(stored.delivery_on, None);
    }

    #[test]
    fn test_deliver_due() {
        let mut store = MemoryStore::new();
        let mut new = sample_new();
        new.status = MessageStatus::Scheduled;
        new.delivery_on = Some(date(2025, 6, 1));
        add_message(&mut store, new.clone()).unwrap();
        new.delivery_on = Some(date(2025, 9, 1));
        add_message(&mut store, new).unwrap();

        let delivered = deliver_due(&mut store, today()).unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].id, "MSG-001");
        let later: ScheduledMessage = store.get("MSG-002").unwrap();
        assert_eq!(later.status, MessageStatus::Scheduled);
    }
}
