use crate::config::SolverConfig;
use crate::config::MAX_WORD_LENGTH;
use crate::constraints::ConstraintSet;
use crate::data::WordBank;
use crate::results::get_result_for_guess;
use crate::results::GuessResult;
use crate::results::LetterResult;
use crate::results::WordleError;
use crate::scorers::select_best_guess;
use crate::scorers::LocatedLetterFrequencyScorer;
use std::result::Result;
use std::sync::Arc;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Provides the game's feedback for each guess.
pub trait FeedbackSource {
    /// Returns the feedback symbols for `guess`, one per letter: `+` for a correct letter, `*`
    /// for a letter that is present elsewhere, and `-` for a letter that is not present.
    ///
    /// This may block, e.g. while waiting for a person to type in the game's response.
    fn next_feedback(&mut self, guess: &str) -> Result<String, WordleError>;
}

/// Answers with the true feedback for a known objective word.
#[derive(Debug, Clone)]
pub struct ObjectiveFeedback {
    objective: Arc<str>,
}

impl ObjectiveFeedback {
    pub fn new(objective: &str) -> ObjectiveFeedback {
        ObjectiveFeedback {
            objective: Arc::from(objective),
        }
    }
}

impl FeedbackSource for ObjectiveFeedback {
    fn next_feedback(&mut self, guess: &str) -> Result<String, WordleError> {
        Ok(get_result_for_guess(&self.objective, guess)?.to_symbols())
    }
}

/// The stage a [`Session`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The word bank is loaded, but the session has not started.
    Loading,
    /// The candidates are about to be narrowed down by the known constraints.
    Filtering,
    /// The next guess is about to be chosen.
    Guessing,
    /// A guess was made, and the session is waiting on its feedback.
    AwaitingFeedback,
    /// Feedback was received, and is about to be merged into the known constraints.
    Merging,
    Done,
}

/// How a session ended. Each variant holds the guesses that were made, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The last guess was entirely correct.
    Solved(Vec<Arc<str>>),
    /// The maximum number of rounds was played without solving the word.
    RoundsExhausted(Vec<Arc<str>>),
    /// No candidate words were left. Most likely, some feedback was entered incorrectly.
    PoolExhausted(Vec<Arc<str>>),
}

impl SessionOutcome {
    pub fn guesses(&self) -> &[Arc<str>] {
        match self {
            SessionOutcome::Solved(guesses)
            | SessionOutcome::RoundsExhausted(guesses)
            | SessionOutcome::PoolExhausted(guesses) => guesses,
        }
    }
}

/// A summary of a completed round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// The one-based round number.
    pub round: u32,
    /// The number of candidates the guess was chosen from.
    pub num_candidates: usize,
    pub guess: Arc<str>,
    /// The feedback symbols received for the guess.
    pub feedback: String,
    /// All constraints known after merging this round's feedback.
    pub constraints: ConstraintSet,
}

#[derive(Debug)]
enum Phase {
    Loading,
    Filtering,
    Guessing,
    AwaitingFeedback(Arc<str>),
    Merging(Arc<str>, Vec<LetterResult>),
    Done(SessionOutcome),
}

/// Plays one game: each round, it narrows down the candidates, suggests the best guess, and
/// learns from the feedback.
///
/// The session is a state machine driven by [`Session::advance`], or by [`Session::run`] to play
/// through to the end.
///
/// ```
/// use wordle_hint_solver::ObjectiveFeedback;
/// use wordle_hint_solver::Session;
/// use wordle_hint_solver::SessionOutcome;
/// use wordle_hint_solver::SolverConfig;
/// use wordle_hint_solver::WordBank;
///
/// let bank = WordBank::from_iterator(["cigar", "rebut", "sissy", "humph"], 5);
/// let mut session = Session::new(bank, SolverConfig::default()).unwrap();
///
/// let outcome = session.run(&mut ObjectiveFeedback::new("humph"), |_| {}).unwrap();
///
/// assert!(matches!(outcome, SessionOutcome::Solved(_)));
/// ```
#[derive(Debug)]
pub struct Session {
    config: SolverConfig,
    phase: Phase,
    pool: WordBank,
    constraints: ConstraintSet,
    guesses: Vec<Arc<str>>,
    last_report: Option<RoundReport>,
}

impl Session {
    /// Creates a session that guesses from the given words.
    ///
    /// Fails if the bank's word length differs from the configured one, or is longer than
    /// [`MAX_WORD_LENGTH`].
    pub fn new(bank: WordBank, config: SolverConfig) -> Result<Session, WordleError> {
        if config.word_length > MAX_WORD_LENGTH {
            return Err(WordleError::UnsupportedWordLength(config.word_length));
        }
        if bank.word_length() != config.word_length {
            return Err(WordleError::WordLength(config.word_length));
        }
        Ok(Session {
            config,
            phase: Phase::Loading,
            pool: bank,
            constraints: ConstraintSet::new(),
            guesses: Vec::new(),
            last_report: None,
        })
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Loading => SessionState::Loading,
            Phase::Filtering => SessionState::Filtering,
            Phase::Guessing => SessionState::Guessing,
            Phase::AwaitingFeedback(_) => SessionState::AwaitingFeedback,
            Phase::Merging(..) => SessionState::Merging,
            Phase::Done(_) => SessionState::Done,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The current candidates. These are only narrowed down by the latest constraints once the
    /// session has passed through [`SessionState::Filtering`].
    pub fn pool(&self) -> &WordBank {
        &self.pool
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// All guesses made so far, including one still awaiting feedback.
    pub fn guesses(&self) -> &[Arc<str>] {
        &self.guesses
    }

    /// The number of guesses made so far.
    pub fn round(&self) -> u32 {
        self.guesses.len() as u32
    }

    /// The guess awaiting feedback, if any.
    pub fn pending_guess(&self) -> Option<&Arc<str>> {
        match &self.phase {
            Phase::AwaitingFeedback(guess) => Some(guess),
            _ => None,
        }
    }

    /// The report for the most recently completed round.
    pub fn last_report(&self) -> Option<&RoundReport> {
        self.last_report.as_ref()
    }

    /// How the session ended, once it is [`SessionState::Done`].
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        match &self.phase {
            Phase::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Moves the session to its next state and returns it.
    ///
    /// Only [`SessionState::AwaitingFeedback`] consults the feedback source. Feedback of the wrong
    /// length is discarded and requested again until valid feedback arrives. Advancing a finished
    /// session does nothing.
    pub fn advance<F>(&mut self, source: &mut F) -> Result<SessionState, WordleError>
    where
        F: FeedbackSource + ?Sized,
    {
        let next = match &self.phase {
            Phase::Loading => self.start(),
            Phase::Filtering => self.filter(),
            Phase::Guessing => self.guess()?,
            Phase::AwaitingFeedback(guess) => {
                let guess = Arc::clone(guess);
                self.await_feedback(guess, source)?
            }
            Phase::Merging(guess, results) => {
                let (guess, results) = (Arc::clone(guess), results.clone());
                self.merge(guess, results)
            }
            Phase::Done(_) => return Ok(SessionState::Done),
        };
        self.phase = next;
        Ok(self.state())
    }

    /// Plays the session until it is done, calling `on_round` after each round.
    pub fn run<F, R>(
        &mut self,
        source: &mut F,
        mut on_round: R,
    ) -> Result<SessionOutcome, WordleError>
    where
        F: FeedbackSource + ?Sized,
        R: FnMut(&RoundReport),
    {
        loop {
            let merged = self.state() == SessionState::Merging;
            self.advance(source)?;
            if merged {
                if let Some(report) = &self.last_report {
                    on_round(report);
                }
            }
            if let Some(outcome) = self.outcome() {
                return Ok(outcome.clone());
            }
        }
    }

    fn start(&mut self) -> Phase {
        info!(
            num_words = self.pool.len(),
            max_rounds = self.config.max_rounds,
            "starting session"
        );
        if self.config.max_rounds == 0 {
            return self.finish(SessionOutcome::RoundsExhausted(Vec::new()));
        }
        Phase::Filtering
    }

    fn filter(&mut self) -> Phase {
        self.pool = self.pool.filter(&self.constraints);
        info!(
            round = self.round() + 1,
            num_candidates = self.pool.len(),
            "filtered candidates"
        );
        if self.pool.is_empty() {
            return self.finish(SessionOutcome::PoolExhausted(self.guesses.clone()));
        }
        Phase::Guessing
    }

    fn guess(&mut self) -> Result<Phase, WordleError> {
        let scorer = LocatedLetterFrequencyScorer::new(&*self.pool);
        let guess = select_best_guess(&self.pool, &scorer).ok_or(WordleError::EmptyPool)?;
        info!(%guess, "selected guess");
        self.guesses.push(Arc::clone(&guess));
        Ok(Phase::AwaitingFeedback(guess))
    }

    fn await_feedback<F>(&mut self, guess: Arc<str>, source: &mut F) -> Result<Phase, WordleError>
    where
        F: FeedbackSource + ?Sized,
    {
        loop {
            let response = source.next_feedback(&guess)?;
            match GuessResult::parse(&guess, response.trim()) {
                Ok(result) => {
                    let results = result.results;
                    return Ok(Phase::Merging(guess, results));
                }
                Err(WordleError::FeedbackLength { expected, actual }) => {
                    warn!(expected, actual, "feedback has the wrong length, asking again");
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn merge(&mut self, guess: Arc<str>, results: Vec<LetterResult>) -> Phase {
        let result = GuessResult {
            guess: &guess,
            results,
        };
        self.constraints.update(&result);
        debug!(constraints = %self.constraints, "merged feedback");
        self.last_report = Some(RoundReport {
            round: self.round(),
            num_candidates: self.pool.len(),
            guess: Arc::clone(&guess),
            feedback: result.to_symbols(),
            constraints: self.constraints.clone(),
        });

        if result.is_solved() {
            return self.finish(SessionOutcome::Solved(self.guesses.clone()));
        }
        if self.round() >= self.config.max_rounds {
            return self.finish(SessionOutcome::RoundsExhausted(self.guesses.clone()));
        }
        Phase::Filtering
    }

    fn finish(&self, outcome: SessionOutcome) -> Phase {
        match &outcome {
            SessionOutcome::Solved(guesses) => info!(num_guesses = guesses.len(), "solved"),
            SessionOutcome::RoundsExhausted(guesses) => {
                info!(num_guesses = guesses.len(), "out of rounds")
            }
            SessionOutcome::PoolExhausted(guesses) => {
                warn!(num_guesses = guesses.len(), "no candidates remain")
            }
        }
        Phase::Done(outcome)
    }
}
