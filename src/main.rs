//! Flashcards scheduling CLI
//!
//! Operates on JSON deck-state files: creates decks, applies reviews and
//! reports which cards are due.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use flashcards_scheduler::export::json::{DeckState, export_json_to_path, import_json};
use flashcards_scheduler::scheduler::{
    DayBoundaryResolver, ReviewScheduler, SchedulerConfig, SessionMode, StatusClassifier,
    format_interval, resolve_now, select_for_session,
};
use flashcards_scheduler::{CardId, QualityRating, ReviewEvent};

#[derive(Parser)]
#[command(name = "flashcards")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Spaced-repetition scheduling for flashcard decks")]
struct Cli {
    /// Scheduler config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a deck file of new cards
    Init {
        file: PathBuf,
        #[arg(long, default_value = "My Deck")]
        name: String,
        #[arg(long, default_value = "10")]
        cards: u32,
    },

    /// Apply a review to one card and save the deck
    Review {
        file: PathBuf,
        card_id: CardId,
        /// forgot, struggled, got-it or too-easy (or 0, 3, 4, 5)
        rating: QualityRating,
        /// Review instant (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Learner's UTC offset in minutes
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i32,
    },

    /// Print the study order for a session
    Due {
        file: PathBuf,
        /// Include cards that are not due yet, after the due ones
        #[arg(long)]
        all: bool,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Print status and due label of every card
    Status {
        file: PathBuf,
        /// Learner's UTC offset in minutes
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i32,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Show the interval each rating would give a card
    Preview {
        file: PathBuf,
        card_id: CardId,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => SchedulerConfig::from_path(path)?,
        None => SchedulerConfig::default(),
    };

    match cli.command {
        Commands::Init { file, name, cards } => run_init(&file, name, cards, &config),
        Commands::Review {
            file,
            card_id,
            rating,
            at,
            offset,
        } => {
            let event = ReviewEvent {
                card_id,
                quality: rating,
                reviewed_at: instant(at),
                client_day_offset_minutes: offset,
            };
            run_review(&file, &event, config)
        }
        Commands::Due { file, all, at } => run_due(&file, all, instant(at)),
        Commands::Status { file, offset, at } => run_status(&file, offset, instant(at), &config),
        Commands::Preview { file, card_id, at } => run_preview(&file, card_id, instant(at), config),
    }
}

/// `RUST_LOG` directives when set, otherwise warnings only.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn instant(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or_else(Utc::now)
}

fn run_init(
    file: &Path,
    name: String,
    cards: u32,
    config: &SchedulerConfig,
) -> anyhow::Result<()> {
    if file.exists() {
        bail!("{} already exists", file.display());
    }
    let deck = DeckState::new(name, cards, Utc::now(), config.initial_ease_factor);
    export_json_to_path(&deck, file)?;
    println!("Deck '{}' created with {} cards", deck.name, deck.cards.len());
    Ok(())
}

fn run_review(file: &Path, event: &ReviewEvent, config: SchedulerConfig) -> anyhow::Result<()> {
    let card_id = event.card_id;
    let mut deck = import_json(file)?;
    let state = deck
        .get(card_id)
        .with_context(|| format!("card {card_id} not found in {}", file.display()))?;

    let next = ReviewScheduler::new(config).apply_event(state, event);
    info!(card_id, rating = %event.quality, interval = next.interval, "review recorded");
    deck.update(card_id, next.clone());
    export_json_to_path(&deck, file)?;

    let days = DayBoundaryResolver::new(event.client_day_offset_minutes);
    println!(
        "Card {card_id}: {} → next review in {}, {} ({})",
        event.quality,
        format_interval(next.interval),
        days.due_label(&next, event.reviewed_at),
        next.next_review.to_rfc3339()
    );
    Ok(())
}

fn run_due(file: &Path, all: bool, now: DateTime<Utc>) -> anyhow::Result<()> {
    let deck = import_json(file)?;
    let mode = if all { SessionMode::All } else { SessionMode::Due };
    let order = select_for_session(&deck.to_pairs(), now, mode);
    if order.is_empty() {
        println!("Nothing to study in '{}'", deck.name);
        return Ok(());
    }
    for id in order {
        println!("{id}");
    }
    Ok(())
}

fn run_status(
    file: &Path,
    offset: i32,
    server_now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> anyhow::Result<()> {
    let deck = import_json(file)?;
    let now = resolve_now(server_now, offset);
    let classifier = StatusClassifier::new(config);
    let days = DayBoundaryResolver::new(offset);

    println!(
        "Deck '{}' ({} cards), local day ends {}",
        deck.name,
        deck.cards.len(),
        days
            .start_of_next_local_day(now)
            .with_timezone(&days.offset())
            .to_rfc3339()
    );
    for card in &deck.cards {
        println!(
            "  {:>5}  {:<9}  {:<12}  interval {:>4}  ease {:.2}",
            card.id,
            classifier.classify(&card.state, now).to_string(),
            days.due_label(&card.state, now).to_string(),
            card.state.interval,
            card.state.ease_factor
        );
    }
    Ok(())
}

fn run_preview(
    file: &Path,
    card_id: CardId,
    now: DateTime<Utc>,
    config: SchedulerConfig,
) -> anyhow::Result<()> {
    let deck = import_json(file)?;
    let state = deck
        .get(card_id)
        .with_context(|| format!("card {card_id} not found in {}", file.display()))?;

    for (rating, next) in ReviewScheduler::new(config).preview(state, now) {
        println!("{:<10} {}", rating.label(), format_interval(next.interval));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_filter_keeps_env_level() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("trace")).max_level_hint(), Some(LevelFilter::TRACE));
    }
}
