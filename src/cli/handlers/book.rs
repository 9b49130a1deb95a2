use crate::cli::commands::{BookAction, BookCmd, PageArgs, PageEditArgs};
use crate::cli::output::*;
use crate::ops::book::{self, BookError, NewPage, PageEdit};

use super::{CmdResult, Context, Session, print_json, print_lines, today};

pub fn cmd_book(ctx: &Context, cmd: BookCmd) -> CmdResult {
    let mut session = ctx.open()?;
    match cmd.action {
        BookAction::Chapter(args) => {
            let chapter = book::add_chapter(session.writer()?, args.title, args.order)?;
            if session.json {
                return print_json(&chapter);
            }
            println!("{} created (order {}): {}", chapter.id, chapter.order, chapter.title);
            Ok(())
        }
        BookAction::Chapters => {
            let memory_book = book::load_book(&session.store)?;
            if session.json {
                return print_json(&memory_book.chapters);
            }
            for chapter in &memory_book.chapters {
                println!("{}", format_chapter_line(chapter));
            }
            Ok(())
        }
        BookAction::Page(args) => cmd_page(&mut session, args),
        BookAction::Pages(args) => {
            let memory_book = book::load_book(&session.store)?;
            let pages = match args.chapter.as_deref() {
                Some(chapter_id) => {
                    if memory_book.chapter(chapter_id).is_none() {
                        return Err(BookError::ChapterNotFound(chapter_id.to_string()).into());
                    }
                    memory_book.chapter_pages(chapter_id)
                }
                None => memory_book.pages.iter().collect(),
            };
            if session.json {
                return print_json(&pages);
            }
            for page in pages {
                println!("{}", format_page_line(page));
            }
            Ok(())
        }
        BookAction::Show(args) => {
            let memory_book = book::load_book(&session.store)?;
            let page = memory_book
                .page(&args.id)
                .ok_or_else(|| BookError::PageNotFound(args.id.clone()))?;
            let adjacent = book::adjacent(&memory_book.pages, &page.id)?;
            let chapter = memory_book.chapter(&page.chapter_id);
            if session.json {
                return print_json(&page_view_to_json(page, chapter, &adjacent));
            }
            print_lines(&format_page_detail(
                page,
                chapter,
                &adjacent,
                session.date_format(),
            ));
            Ok(())
        }
        BookAction::Edit(args) => cmd_edit(&mut session, args),
        BookAction::RmPage(args) => {
            book::delete_page(session.writer()?, &args.id)?;
            println!("{} removed", args.id);
            Ok(())
        }
        BookAction::RmChapter(args) => {
            book::delete_chapter(session.writer()?, &args.id)?;
            println!("{} removed", args.id);
            Ok(())
        }
        BookAction::Toc => {
            let memory_book = book::load_book(&session.store)?;
            if session.json {
                return print_json(&toc_to_json(&memory_book));
            }
            print_lines(&format_toc(&memory_book));
            Ok(())
        }
    }
}

fn cmd_page(session: &mut Session, args: PageArgs) -> CmdResult {
    let new = NewPage {
        title: args.title,
        content: args.content,
        occurred_on: args.date.unwrap_or_else(today),
        chapter_id: args.chapter,
    };
    let page = book::add_page(session.writer()?, new)?;
    if session.json {
        return print_json(&page);
    }
    println!("{} created as page {} in {}", page.id, page.page_number, page.chapter_id);
    Ok(())
}

fn cmd_edit(session: &mut Session, args: PageEditArgs) -> CmdResult {
    let edit = PageEdit {
        title: args.title,
        content: args.content,
        occurred_on: args.date,
        chapter_id: args.chapter,
    };
    let page = book::update_page(session.writer()?, &args.id, edit)?;
    if session.json {
        return print_json(&page);
    }
    println!("{}", format_page_line(&page).trim_start());
    Ok(())
}
