use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use wordle_hint_solver::*;

/// Suggests guesses for a Wordle game, narrowing down the possible words using the feedback from
/// each guess.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a file that contains a list of possible words, separated by whitespace.
    #[arg(short = 'f', long)]
    words_file: String,

    /// The length of the words to guess. Words of any other length are ignored.
    #[arg(long, default_value_t = DEFAULT_WORD_LENGTH)]
    word_length: usize,

    /// The maximum number of guesses per game.
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Suggest guesses for a game you are playing, entering the game's feedback after each one.
    Interactive,
    /// Play a single game against the given word.
    Single { word: String },
    /// Play against every word in the words file and summarize how many guesses were needed.
    Benchmark,
}

fn main() -> Result<(), WordleError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let start_time = Instant::now();
    let args = Args::parse();
    let config = SolverConfig {
        word_length: args.word_length,
        max_rounds: args.max_rounds,
    };

    let words_reader = io::BufReader::new(File::open(&args.words_file)?);
    let word_bank = WordBank::from_reader(words_reader, config.word_length)?;
    println!("Starting the game with {} candidates", word_bank.len());

    match args.command {
        Command::Interactive => play_interactive_game(word_bank, config)?,
        Command::Single { word } => play_single_game(&word, word_bank, config)?,
        Command::Benchmark => {
            run_benchmark(word_bank, config)?;
            let elapsed_secs = start_time.elapsed().as_secs_f64();
            info!(elapsed_secs, "benchmark finished");
            println!("Command executed in {:.3}s.", elapsed_secs);
        }
    }

    Ok(())
}

/// Reads the game's feedback from stdin, one whitespace-separated token per guess.
struct StdinFeedback {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl StdinFeedback {
    fn new() -> StdinFeedback {
        StdinFeedback {
            lines: io::stdin().lock().lines(),
        }
    }
}

impl FeedbackSource for StdinFeedback {
    fn next_feedback(&mut self, guess: &str) -> Result<String, WordleError> {
        loop {
            println!("What did you get? (+ for green, * for yellow, - for black)");
            println!("{}", guess);
            io::stdout().flush()?;
            let line = self.lines.next().ok_or(WordleError::FeedbackClosed)??;
            if let Some(token) = line.split_whitespace().next() {
                if token.chars().count() != guess.chars().count() {
                    println!(
                        "Something was wrong with your response. Try again. Got: {}",
                        token
                    );
                }
                return Ok(token.to_string());
            }
        }
    }
}

fn play_interactive_game(word_bank: WordBank, config: SolverConfig) -> Result<(), WordleError> {
    let mut session = Session::new(word_bank, config)?;
    let mut feedback = StdinFeedback::new();
    let mut last_shown_round = 0;

    loop {
        if session.advance(&mut feedback)? == SessionState::AwaitingFeedback {
            println!("Guessing among {} words", session.pool().len());
            if let Some(guess) = session.pending_guess() {
                println!("Try: {}", guess);
            }
        }
        if let Some(tips) = unseen_tips(&session, &mut last_shown_round) {
            println!("Current tips: {}", tips);
        }
        if let Some(outcome) = session.outcome() {
            match outcome {
                SessionOutcome::Solved(guesses) => {
                    println!("Solved it! It took {} guesses.", guesses.len())
                }
                SessionOutcome::RoundsExhausted(guesses) => {
                    println!("I still couldn't solve it after {} guesses :(", guesses.len())
                }
                SessionOutcome::PoolExhausted(_) => println!("Was that correct?"),
            }
            return Ok(());
        }
    }
}

/// Returns the constraints from the latest round, unless they were already shown.
fn unseen_tips<'a>(session: &'a Session, last_shown_round: &mut u32) -> Option<&'a ConstraintSet> {
    let report = session.last_report()?;
    if report.round <= *last_shown_round {
        return None;
    }
    *last_shown_round = report.round;
    Some(&report.constraints)
}

fn play_single_game(
    word: &str,
    word_bank: WordBank,
    config: SolverConfig,
) -> Result<(), WordleError> {
    let mut session = Session::new(word_bank, config)?;
    let outcome = session.run(&mut ObjectiveFeedback::new(word), |report| {
        println!(
            "{}. {} ({} candidates): {}",
            report.round, report.guess, report.num_candidates, report.feedback
        );
    })?;
    match outcome {
        SessionOutcome::Solved(guesses) => {
            println!("Solved it! It took me {} guesses.", guesses.len());
        }
        SessionOutcome::RoundsExhausted(guesses) => {
            println!(
                "I still couldn't solve it after {} guesses :(",
                guesses.len()
            );
        }
        SessionOutcome::PoolExhausted(_) => {
            eprintln!("Error: given word not in the word list.");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run_benchmark(word_bank: WordBank, config: SolverConfig) -> Result<(), WordleError> {
    let mut num_games_per_round: BTreeMap<usize, u32> = BTreeMap::new();
    let mut num_failures = 0;
    for word in word_bank.iter() {
        let mut session = Session::new(word_bank.clone(), config)?;
        match session.run(&mut ObjectiveFeedback::new(word), |_| {})? {
            SessionOutcome::Solved(guesses) => {
                *num_games_per_round.entry(guesses.len()).or_insert(0) += 1;
            }
            _ => num_failures += 1,
        }
    }
    println!("Played {} words. Results:", word_bank.len());

    println!("|Num guesses|Num games|");
    println!("|-----------|---------|");
    for (num_guesses, num_games) in num_games_per_round.iter() {
        println!("|{}|{}|", num_guesses, num_games);
    }

    let num_solved: u32 = num_games_per_round.values().sum();
    if num_solved > 0 {
        let average = num_games_per_round
            .iter()
            .map(|(num_guesses, num_games)| *num_guesses as f64 * *num_games as f64)
            .sum::<f64>()
            / num_solved as f64;
        println!("\n**Average number of guesses:** {:.2}", average);
    }
    println!("**Not solved within {} rounds:** {}", config.max_rounds, num_failures);
    Ok(())
}
