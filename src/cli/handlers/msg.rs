use crate::cli::commands::{MsgAction, MsgCmd, MsgEditArgs, MsgNewArgs};
use crate::cli::output::*;
use crate::model::message::{MessageStatus, ScheduledMessage};
use crate::ops::delivery::{self, MessageEdit, NewMessage, Transition};
use crate::store::RecordStore;

use super::{CmdResult, Context, Session, print_json, print_lines, today};

pub fn cmd_msg(ctx: &Context, cmd: MsgCmd) -> CmdResult {
    let mut session = ctx.open()?;
    match cmd.action {
        MsgAction::New(args) => cmd_new(&mut session, args),
        MsgAction::List(args) => {
            let status = args
                .status
                .as_deref()
                .map(|s| {
                    MessageStatus::parse_status(s).ok_or_else(|| format!("invalid status: {}", s))
                })
                .transpose()?;
            let messages = session
                .store
                .list(|m: &ScheduledMessage| status.is_none_or(|s| m.status == s))?;
            if session.json {
                return print_json(&messages);
            }
            for message in &messages {
                println!("{}", format_message_line(message, session.date_format()));
            }
            Ok(())
        }
        MsgAction::Schedule(args) => change_status(
            &mut session,
            &args.id,
            Transition::Schedule {
                delivery_on: args.delivery_on,
            },
        ),
        MsgAction::Deliver(args) => change_status(&mut session, &args.id, Transition::Deliver),
        MsgAction::Edit(args) => cmd_edit(&mut session, args),
        MsgAction::Due(args) => {
            let today = today();
            if args.deliver {
                let delivered = delivery::deliver_due(session.writer()?, today)?;
                if session.json {
                    return print_json(&delivered);
                }
                for message in &delivered {
                    println!("{} → delivered", message.id);
                }
                return Ok(());
            }
            let messages: Vec<ScheduledMessage> = session.store.list_all()?;
            let due = delivery::due_messages(&messages, today);
            if session.json {
                return print_json(&due);
            }
            for message in due {
                println!("{}", format_message_line(message, session.date_format()));
            }
            Ok(())
        }
    }
}

fn cmd_new(session: &mut Session, args: MsgNewArgs) -> CmdResult {
    let status = if args.schedule {
        MessageStatus::Scheduled
    } else {
        MessageStatus::Draft
    };
    let new = NewMessage {
        recipient: args.recipient,
        subject: args.subject,
        content: args.content,
        authored_on: today(),
        delivery_on: args.delivery_on,
        status,
        tags: args.tag,
    };
    let message = delivery::add_message(session.writer()?, new)?;
    if session.json {
        return print_json(&message);
    }
    println!("{} created [{}]", message.id, message.status);
    Ok(())
}

fn change_status(session: &mut Session, id: &str, requested: Transition) -> CmdResult {
    let message = delivery::apply_transition(session.writer()?, id, requested, today())?;
    if session.json {
        return print_json(&message);
    }
    match message.delivery_on {
        Some(on) if requested.target() == MessageStatus::Scheduled => println!(
            "{} → {} ({})",
            message.id,
            message.status,
            on.format(session.date_format())
        ),
        _ => println!("{} → {}", message.id, message.status),
    }
    Ok(())
}

fn cmd_edit(session: &mut Session, args: MsgEditArgs) -> CmdResult {
    let tags = if args.clear_tags {
        Some(Vec::new())
    } else if args.tag.is_empty() {
        None
    } else {
        Some(args.tag)
    };
    let changes = MessageEdit {
        recipient: args.recipient,
        subject: args.subject,
        content: args.content,
        delivery_on: args.delivery_on,
        tags,
    };
    if changes.is_empty() {
        return Err("nothing to change (use --to, --subject, --content, --on or --tag)".into());
    }
    let message = delivery::edit_message(session.writer()?, &args.id, changes)?;
    if session.json {
        return print_json(&message);
    }
    print_lines(&format_message_detail(&message, session.date_format()));
    Ok(())
}
