//! Subcommand handlers.

use std::io::BufRead;

use folio_api::{ApiError, BookSummary, Plan, Session, account, billing, books, favorites};
use folio_core::BookId;

use crate::{BillingCommand, BooksCommand, Command, FavoritesCommand};

/// Run one subcommand. Failures have already been published as banners.
pub async fn run(session: &Session, command: Command) -> Result<(), ApiError> {
    match command {
        Command::Login { email, password } => {
            let password = password_or_prompt(password);
            let payload = session.login(&email, &password).await?;
            if let Some(user) = payload.user {
                println!("Logged in as {}", user.email);
            }
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let password = password_or_prompt(password);
            session.register(&name, &email, &password).await?;
            println!("Run `folio verify {email} <code>` once the code arrives.");
        }
        Command::Verify { email, code } => {
            let _ = session.verify(&email, &code).await?;
        }
        Command::Logout => session.logout(),
        Command::Whoami => {
            let user = account::me(session).await?;
            println!("{} <{}> ({} plan)", user.name.as_deref().unwrap_or("-"), user.email, user.plan);
        }
        Command::Books { command } => run_books(session, command).await?,
        Command::Favorites { command } => run_favorites(session, command).await?,
        Command::Billing { command } => {
            let link = match command {
                BillingCommand::Checkout => billing::checkout(session, Plan::Premium).await?,
                BillingCommand::Portal => billing::portal(session).await?,
            };
            println!("Open this link to continue: {}", link.url);
        }
    }
    Ok(())
}

async fn run_books(session: &Session, command: BooksCommand) -> Result<(), ApiError> {
    match command {
        BooksCommand::List { page } => print_books(&books::list(session, page).await?),
        BooksCommand::Search { query } => {
            print_books(&books::search(session, &query.join(" ")).await?);
        }
        BooksCommand::Show { id } => {
            let plan = account::current_plan(session).await?;
            let view = books::detail(session, &BookId::from(id), plan).await?;
            let star = if view.is_favorite { " *" } else { "" };
            println!("{} by {}{star}", view.book.title, view.book.author);
            println!();
            println!("{}", view.visible_text());
            if !view.access.is_full() {
                println!();
                println!("[preview] Upgrade with `folio billing checkout` to read the rest.");
            }
        }
    }
    Ok(())
}

async fn run_favorites(session: &Session, command: FavoritesCommand) -> Result<(), ApiError> {
    match command {
        FavoritesCommand::List => print_books(&favorites::list(session).await?),
        FavoritesCommand::Add { id } => favorites::add(session, &BookId::from(id)).await?,
        FavoritesCommand::Remove { id } => favorites::remove(session, &BookId::from(id)).await?,
    }
    Ok(())
}

fn print_books(books: &[BookSummary]) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }
    for book in books {
        let lock = if book.is_locked { " [locked]" } else { "" };
        println!("{}\t{} by {}{lock}", book.id, book.title, book.author);
    }
}

/// Use the flag value, or read one line from stdin.
fn password_or_prompt(password: Option<String>) -> String {
    if let Some(p) = password {
        return p;
    }
    eprint!("Password: ");
    let mut line = String::new();
    if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
        tracing::warn!("failed to read password from stdin: {e}");
    }
    line.trim_end_matches(['\r', '\n']).to_string()
}
