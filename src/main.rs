use std::cmp::Ordering;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{cursor, execute, queue};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use wordpace::config::Config;
use wordpace::engine::display_sequence;
use wordpace::event::{AppEvent, EventHandler, KeyAction};
use wordpace::store::{self, ResultStore};
use wordpace::{
    Session, SessionStatus, TestResult, aggregate_slow_sequences, find_problematic_words,
};

#[derive(Parser)]
#[command(name = "wordpace", version, about = "Typing-speed trainer with n-gram latency analytics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a timed typing test (the default)
    Practice(PracticeArgs),
    /// List stored results
    History,
    /// Slowest character sequences across all stored results
    Slow {
        #[arg(short, long, help = "Number of sequences to show")]
        limit: Option<usize>,
    },
    /// Words mistyped in more than one place
    Problems,
    /// Sequence timings of one stored result
    Sequences {
        id: Uuid,
        #[arg(short, long, default_value_t = 2, help = "Sequence length (2 or 3)")]
        n: usize,
        #[arg(short, long, help = "Number of sequences to show")]
        max: Option<usize>,
    },
}

#[derive(Args, Default)]
struct PracticeArgs {
    #[arg(short, long, help = "Words to type, separated by whitespace")]
    text: Option<String>,

    #[arg(short, long, help = "Test duration in seconds")]
    duration: Option<f64>,

    #[arg(short, long, help = "Content identifier recorded with the result")]
    content_id: Option<String>,

    #[arg(long, help = "Do not write the result to history")]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_tracing(&config.log_level);
    config.validate()?;

    let open_store =
        |dry_run: bool| store::open(config.history_path(), config.history_cap, dry_run);

    match cli.command.unwrap_or(Command::Practice(PracticeArgs::default())) {
        Command::Practice(args) => {
            let store = open_store(args.dry_run)?;
            practice(&config, args, store.as_ref())
        }
        Command::History => print_history(open_store(false)?.as_ref()),
        Command::Slow { limit } => print_slow(
            open_store(false)?.as_ref(),
            limit.unwrap_or(config.slow_sequence_limit),
        ),
        Command::Problems => print_problems(open_store(false)?.as_ref()),
        Command::Sequences { id, n, max } => print_sequences(
            open_store(false)?.as_ref(),
            id,
            n,
            max.unwrap_or(config.sequence_results),
        ),
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn practice(config: &Config, args: PracticeArgs, store: &dyn ResultStore) -> Result<()> {
    let words = match args.text {
        Some(text) => text.split_whitespace().map(str::to_string).collect(),
        None => config.practice_words(),
    };
    let duration = args.duration.unwrap_or(config.duration_secs);
    let content_id = args.content_id.unwrap_or_else(|| config.content_id.clone());

    let mut session = Session::new();
    session.initialize(words, duration, content_id)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let outcome = run_session(&mut stdout, &mut session, &events);

    execute!(stdout, cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;

    let Some(result) = outcome? else {
        println!("Test abandoned, nothing recorded.");
        return Ok(());
    };

    print_summary(&result, config.sequence_results)?;
    if let Err(e) = store.save_result(&result) {
        tracing::warn!(id = %result.id, error = %e, "failed to persist result");
        eprintln!("Warning: result was not saved: {e:#}");
    }
    Ok(())
}

fn run_session(
    out: &mut impl Write,
    session: &mut Session,
    events: &EventHandler,
) -> Result<Option<TestResult>> {
    loop {
        render(out, session)?;

        match events.next()? {
            AppEvent::Key(key) => match KeyAction::from_key_event(key) {
                KeyAction::Quit => {
                    session.reset();
                    return Ok(None);
                }
                action => {
                    action.apply(session);
                }
            },
            AppEvent::Tick => {}
        }

        if session.is_time_up()
            || (session.status() == SessionStatus::Active && session.all_words_committed())
        {
            return Ok(Some(session.complete()?));
        }
    }
}

fn render(out: &mut impl Write, session: &Session) -> Result<()> {
    let remaining = match session.status() {
        SessionStatus::Idle => session.duration_secs(),
        _ => session.remaining_secs(),
    };
    queue!(
        out,
        cursor::MoveTo(0, 0),
        Clear(ClearType::CurrentLine),
        Print(format!(
            "{:>4.0}s   type to start, Tab skips a word, Esc quits",
            remaining.ceil()
        )),
        cursor::MoveTo(0, 2),
        Clear(ClearType::FromCursorDown)
    )?;

    let current = session.current_word_index();
    for (i, word) in session.target_words().iter().enumerate() {
        let styled = match i.cmp(&current) {
            Ordering::Less if session.completed_words().get(i) == Some(word) => {
                word.as_str().green()
            }
            Ordering::Less => word.as_str().red(),
            Ordering::Equal if session.is_current_input_prefix() => word.as_str().underlined(),
            Ordering::Equal => word.as_str().red().underlined(),
            Ordering::Greater => word.as_str().dark_grey(),
        };
        queue!(out, PrintStyledContent(styled), Print(' '))?;
    }

    queue!(
        out,
        Print("\r\n\r\n> "),
        Print(session.current_input())
    )?;
    out.flush()?;
    Ok(())
}

fn print_summary(result: &TestResult, max_results: usize) -> Result<()> {
    println!(
        "{} wpm   {}% accuracy   {} of {} words correct   {:.1}s",
        result.wpm, result.accuracy, result.correct_words, result.total_words, result.elapsed_secs
    );
    println!("id {}", result.id);

    for (n, label) in [(2, "bigrams"), (3, "trigrams")] {
        let timings = result.sequence_timings(n, max_results)?;
        if timings.is_empty() {
            continue;
        }
        println!();
        println!("Slowest {label}:");
        for t in timings {
            println!(
                "  {:<5} {:>6.0} ms  x{}",
                display_sequence(&t.sequence),
                t.average_time,
                t.occurrences
            );
        }
    }
    Ok(())
}

fn print_history(store: &dyn ResultStore) -> Result<()> {
    let results = store.load_results()?;
    if results.is_empty() {
        println!("No results yet.");
        return Ok(());
    }
    for r in &results {
        println!(
            "{}  {}  {:>3} wpm  {:>3}%  {:>3}/{:<3} {}",
            r.created_at.format("%Y-%m-%d %H:%M"),
            r.id,
            r.wpm,
            r.accuracy,
            r.correct_words,
            r.total_words,
            r.content_id
        );
    }
    Ok(())
}

fn print_slow(store: &dyn ResultStore, limit: usize) -> Result<()> {
    let results = store.load_results()?;
    let slow = aggregate_slow_sequences(&results, limit);
    if slow.is_empty() {
        println!("Not enough history to rank sequences.");
        return Ok(());
    }
    for (rank, sequence) in slow.iter().enumerate() {
        println!("{:>3}. {}", rank + 1, display_sequence(sequence));
    }
    Ok(())
}

fn print_problems(store: &dyn ResultStore) -> Result<()> {
    let results = store.load_results()?;
    let words = find_problematic_words(&results);
    if words.is_empty() {
        println!("No repeatedly mistyped words.");
        return Ok(());
    }
    for w in words {
        println!("{:>4}x  {}", w.count, w.word);
    }
    Ok(())
}

fn print_sequences(store: &dyn ResultStore, id: Uuid, n: usize, max_results: usize) -> Result<()> {
    let results = store.load_results()?;
    let Some(result) = results.iter().find(|r| r.id == id) else {
        bail!("no stored result with id {id}");
    };
    let timings = result.sequence_timings(n, max_results)?;
    if timings.is_empty() {
        println!("No correctly typed sequences in this result.");
        return Ok(());
    }
    for t in timings {
        println!(
            "{:<5} {:>6.0} ms  x{}",
            display_sequence(&t.sequence),
            t.average_time,
            t.occurrences
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_redraws_without_full_screen_clear() {
        let mut session = Session::new();
        session
            .initialize(vec!["one".to_string(), "two".to_string()], 30.0, "render")
            .unwrap();
        let mut out: Vec<u8> = Vec::new();
        render(&mut out, &session).unwrap();

        let drawn = String::from_utf8_lossy(&out);
        assert!(!drawn.contains("\x1b[2J"), "whole screen cleared: {drawn:?}");
        assert!(drawn.contains("\x1b[2K"));
        assert!(drawn.contains("\x1b[J"));
        assert!(drawn.contains("one"));
        assert!(drawn.contains("two"));
    }
}
