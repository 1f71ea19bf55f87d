use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;
use study_companion::config::AppConfig;
use study_companion::database::db;
use study_companion::export::json::{export_snapshot_to_path, import_snapshot};
use study_companion::models::{CardFace, CustomReviewConfig, Deck, Flashcard, Question, Rating, ReviewCue, ReviewOrder};
use study_companion::StoreError;
use study_companion::sync::{FileRemote, SyncService, merge};

#[derive(Parser)]
#[command(name = "study-companion", about = "Spaced repetition deck and snapshot sync", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List cards due for review
    Due,

    /// Build an error-review deck
    Deck {
        #[arg(long, default_value = "10")]
        count: usize,
        /// newest, oldest or random
        #[arg(long, default_value = "random")]
        order: ReviewOrder,
        /// Also include cards whose last review was hard
        #[arg(long)]
        include_hard: bool,
    },

    /// Add a card for a question answered wrong, or a manual card with --front/--back
    Add {
        #[arg(long)]
        pdf_id: String,
        #[arg(long)]
        pdf_name: String,
        #[arg(long)]
        question: String,
        #[arg(long, default_value = "")]
        answer: String,
        #[arg(long, requires = "back")]
        front: Option<String>,
        #[arg(long, requires = "front")]
        back: Option<String>,
    },

    /// Record a review
    Review {
        card_id: String,
        /// wrong, hard or easy
        rating: Rating,
        /// Practice only: keep the schedule unchanged
        #[arg(long)]
        practice: bool,
    },

    /// Delete a card
    Remove { card_id: String },

    /// Show pending, flagged and total card counts
    Stats,

    /// Show every card by next review date
    Calendar,

    /// Sync with the remote snapshot
    Sync,

    /// Write all local data to a snapshot file
    Export { path: PathBuf },

    /// Replace all local data with a snapshot file
    Import { path: PathBuf },

    /// Merge two snapshot files without touching local data
    Merge {
        local: PathBuf,
        remote: PathBuf,
        output: PathBuf,
    },
}

/// Formats epoch ms as local YYYY-MM-DD HH:MM
fn format_timestamp(ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ms) {
        Some(utc) => utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

fn print_card(card: &Flashcard) {
    println!(
        "{}  [{}]  next {}  reps {}  ef {:.2}{}  {}",
        card.id,
        card.source_pdf_name,
        format_timestamp(card.next_review),
        card.repetitions,
        card.ease_factor,
        if card.is_flagged_error { "  !" } else { "" },
        card.front_text()
    );
}

fn open_database(config: &AppConfig) -> anyhow::Result<Connection> {
    db::init_database(&config.database_path)
        .with_context(|| format!("opening '{}'", config.database_path.display()))
}

fn load_deck(conn: &Connection) -> anyhow::Result<Deck> {
    Ok(Deck::new(db::load_flashcards(conn)?))
}

/// Deletes a card; false when no card has that id.
fn remove_card(conn: &Connection, card_id: &str) -> study_companion::Result<bool> {
    match db::delete_flashcard(conn, card_id) {
        Ok(()) => Ok(true),
        Err(StoreError::CardNotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref()).context("loading config")?;
    let now = Utc::now().timestamp_millis();

    match cli.command {
        Command::Due => {
            let due = load_deck(&open_database(&config)?)?.due(now);
            println!("{} cards due", due.len());
            for card in &due {
                print_card(card);
            }
        }
        Command::Deck {
            count,
            order,
            include_hard,
        } => {
            let review_config = CustomReviewConfig {
                count,
                order,
                include_hard,
            };
            let deck = load_deck(&open_database(&config)?)?;
            for card in &deck.custom_review_deck(&review_config) {
                print_card(card);
            }
        }
        Command::Add {
            pdf_id,
            pdf_name,
            question,
            answer,
            front,
            back,
        } => {
            let mut conn = open_database(&config)?;
            let mut deck = load_deck(&conn)?;
            let question = Question {
                question_text: question,
                correct_answer: answer,
                ..Default::default()
            };
            let id = match (front, back) {
                (Some(front), Some(back)) => {
                    deck.add_manual_flashcard(&question, CardFace { front, back }, &pdf_id, &pdf_name, now)
                }
                _ => Some(deck.add_error(&question, &pdf_id, &pdf_name, now)),
            };
            match id {
                Some(id) => {
                    if let Some(card) = deck.get(&id) {
                        db::upsert_flashcard(&mut conn, card)?;
                    }
                    println!("{}", id);
                }
                None => println!("A card for this question already exists"),
            }
        }
        Command::Review {
            card_id,
            rating,
            practice,
        } => {
            let mut conn = open_database(&config)?;
            let mut deck = load_deck(&conn)?;
            let Some(cue) = deck.process_review(&card_id, rating, !practice, now) else {
                println!("Card '{}' not found, nothing to review", card_id);
                return Ok(());
            };
            if let Some(card) = deck.get(&card_id) {
                db::upsert_flashcard(&mut conn, card)?;
                let mark = match cue {
                    ReviewCue::Success => "ok",
                    ReviewCue::Failure => "missed",
                };
                println!(
                    "{}: {} day(s), next review {}",
                    mark,
                    card.interval,
                    format_timestamp(card.next_review)
                );
            }
        }
        Command::Remove { card_id } => {
            if remove_card(&open_database(&config)?, &card_id)? {
                println!("Removed {}", card_id);
            } else {
                println!("Card '{}' not found, nothing to remove", card_id);
            }
        }
        Command::Stats => {
            let stats = load_deck(&open_database(&config)?)?.stats(now);
            println!(
                "pending: {}  errors: {}  total: {}",
                stats.pending, stats.errors, stats.total
            );
        }
        Command::Calendar => {
            let deck = load_deck(&open_database(&config)?)?;
            for entry in deck.calendar(now) {
                let label = if entry.overdue { "overdue  " } else { "scheduled" };
                println!(
                    "{}  {}  level {}  {}",
                    label,
                    format_timestamp(entry.card.next_review),
                    entry.card.repetitions,
                    entry.card.front_text()
                );
            }
        }
        Command::Sync => {
            let remote = FileRemote::new(config.remote_path());
            let mut service = SyncService::new(open_database(&config)?, remote);
            let report = service.sync(now)?;
            if report.remote_existed {
                println!(
                    "Synced {} cards, {} folders, {} documents",
                    report.flashcards, report.folders, report.documents
                );
            } else {
                println!("Uploaded {} cards (first sync)", report.flashcards);
            }
        }
        Command::Export { path } => {
            let snapshot = db::load_snapshot(&open_database(&config)?, now)?;
            export_snapshot_to_path(&snapshot, &path)?;
            println!("Exported to {}", path.display());
        }
        Command::Import { path } => {
            let snapshot = import_snapshot(&path)?;
            db::replace_snapshot(&mut open_database(&config)?, &snapshot)?;
            println!("Imported {} cards", snapshot.flashcards.len());
        }
        Command::Merge {
            local,
            remote,
            output,
        } => {
            let merged = merge(&import_snapshot(&local)?, &import_snapshot(&remote)?);
            export_snapshot_to_path(&merged, &output)?;
            println!("Merged snapshot has {} cards", merged.flashcards.len());
        }
    }

    Ok(())
}
