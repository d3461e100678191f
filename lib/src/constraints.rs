use crate::results::GuessResult;
use crate::results::LetterResult;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::iter::zip;
use tracing::debug;
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a [`Constraint`], ordered by the sequence in which a round's constraints are
/// merged: absent, then present, then exact.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum ConstraintKind {
    Absent,
    Present,
    Exact,
}

/// A single rule derived from the feedback for one letter.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constraint {
    /// The word has `letter` at `position`.
    PositionMatch { letter: char, position: u8 },
    /// The word has at least `minimum_count` copies of `letter` outside of
    /// `excluded_positions`.
    LetterPresent {
        letter: char,
        excluded_positions: BTreeSet<u8>,
        minimum_count: u8,
    },
    /// The word has at most `tolerance` copies of `letter`.
    LetterAbsent { letter: char, tolerance: u8 },
}

impl Constraint {
    pub fn letter(&self) -> char {
        match self {
            Constraint::PositionMatch { letter, .. }
            | Constraint::LetterPresent { letter, .. }
            | Constraint::LetterAbsent { letter, .. } => *letter,
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::PositionMatch { .. } => ConstraintKind::Exact,
            Constraint::LetterPresent { .. } => ConstraintKind::Present,
            Constraint::LetterAbsent { .. } => ConstraintKind::Absent,
        }
    }

    /// Returns `true` iff the given word satisfies this constraint.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        match self {
            Constraint::PositionMatch { letter, position } => {
                word.chars().nth(*position as usize) == Some(*letter)
            }
            Constraint::LetterPresent {
                letter,
                excluded_positions,
                minimum_count,
            } => {
                let count_found = word
                    .chars()
                    .enumerate()
                    .filter(|(index, other_letter)| {
                        other_letter == letter && !excluded_positions.contains(&(*index as u8))
                    })
                    .count();
                count_found >= *minimum_count as usize
            }
            Constraint::LetterAbsent { letter, tolerance } => {
                let mut remaining = *tolerance;
                for other_letter in word.chars() {
                    if other_letter != *letter {
                        continue;
                    }
                    if remaining == 0 {
                        return false;
                    }
                    remaining -= 1;
                }
                true
            }
        }
    }

    fn key(&self) -> ConstraintKey {
        match self {
            Constraint::PositionMatch { letter, position } => {
                ConstraintKey::position_match(*letter, *position)
            }
            Constraint::LetterPresent { letter, .. } => ConstraintKey::letter_present(*letter),
            Constraint::LetterAbsent { letter, .. } => ConstraintKey::letter_absent(*letter),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::PositionMatch { letter, position } => write!(f, "{letter} at {position}"),
            Constraint::LetterPresent {
                letter,
                excluded_positions,
                minimum_count,
            } => write!(
                f,
                "{letter} x{minimum_count} not at {excluded_positions:?}"
            ),
            Constraint::LetterAbsent { letter, tolerance } => {
                write!(f, "{letter} at most {tolerance}")
            }
        }
    }
}

/// Identifies the slot a constraint occupies in a [`ConstraintSet`]. Only position matches carry
/// a position, so a letter has at most one present and one absent constraint.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
struct ConstraintKey {
    letter: char,
    kind: ConstraintKind,
    position: Option<u8>,
}

impl ConstraintKey {
    fn position_match(letter: char, position: u8) -> ConstraintKey {
        ConstraintKey {
            letter,
            kind: ConstraintKind::Exact,
            position: Some(position),
        }
    }

    fn letter_present(letter: char) -> ConstraintKey {
        ConstraintKey {
            letter,
            kind: ConstraintKind::Present,
            position: None,
        }
    }

    fn letter_absent(letter: char) -> ConstraintKey {
        ConstraintKey {
            letter,
            kind: ConstraintKind::Absent,
            position: None,
        }
    }
}

/// Builds the constraints reported by a single guess, sorted in merge order.
///
/// Every present signal for a letter is folded into one [`Constraint::LetterPresent`]. Its count
/// also includes the letter's exact signals from the same guess, since each of those is another
/// copy of the letter, and its excluded positions include the letter's absent signals. Unknown
/// results produce no constraint.
pub fn round_constraints(result: &GuessResult) -> Vec<Constraint> {
    let mut constraints = Vec::with_capacity(result.results.len());
    let mut present_letters: Vec<char> = Vec::new();
    for (index, (letter, letter_result)) in
        zip(result.guess.chars(), result.results.iter()).enumerate()
    {
        let position = index as u8;
        match letter_result {
            LetterResult::Correct => {
                constraints.push(Constraint::PositionMatch { letter, position })
            }
            LetterResult::PresentNotHere => {
                if !present_letters.contains(&letter) {
                    present_letters.push(letter);
                }
            }
            LetterResult::NotPresent => constraints.push(Constraint::LetterAbsent {
                letter,
                tolerance: 0,
            }),
            LetterResult::Unknown => {
                warn!(
                    guess = result.guess,
                    position, "ignoring unrecognized feedback symbol"
                );
            }
        }
    }

    for letter in present_letters {
        let mut excluded_positions = BTreeSet::new();
        let mut minimum_count = 0;
        for (index, (other_letter, letter_result)) in
            zip(result.guess.chars(), result.results.iter()).enumerate()
        {
            if other_letter != letter {
                continue;
            }
            match letter_result {
                LetterResult::PresentNotHere => {
                    excluded_positions.insert(index as u8);
                    minimum_count += 1;
                }
                LetterResult::Correct => minimum_count += 1,
                LetterResult::NotPresent => {
                    excluded_positions.insert(index as u8);
                }
                LetterResult::Unknown => {}
            }
        }
        constraints.push(Constraint::LetterPresent {
            letter,
            excluded_positions,
            minimum_count,
        });
    }

    // Absent tolerances depend on the exact matches, so the merge order is load-bearing.
    constraints.sort_by_key(Constraint::kind);
    constraints
}

/// The accumulated, de-duplicated constraints learned over a game.
///
/// The set only ever tightens: any word that satisfies it after a merge also satisfied it before.
/// A letter's present constraint always excludes the positions where the letter is already
/// pinned, so its minimum count tracks the copies beyond the pinned ones.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Vec<Constraint>", into = "Vec<Constraint>")
)]
pub struct ConstraintSet {
    constraints: BTreeMap<ConstraintKey, Constraint>,
}

impl ConstraintSet {
    /// Creates an empty `ConstraintSet`, which every word satisfies.
    pub fn new() -> ConstraintSet {
        ConstraintSet::default()
    }

    /// Returns the constraints imposed by the given result.
    pub fn from_result(result: &GuessResult) -> ConstraintSet {
        let mut constraints = ConstraintSet::new();
        constraints.update(result);
        constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterates over the constraints, grouped by letter.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    /// Returns `true` iff this exact constraint is in the set.
    pub fn contains(&self, constraint: &Constraint) -> bool {
        self.constraints.get(&constraint.key()) == Some(constraint)
    }

    /// Returns `true` iff the given word satisfies every constraint.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        self.constraints
            .values()
            .all(|constraint| constraint.is_satisfied_by(word))
    }

    /// The number of copies of `letter` the word is known to contain: one per pinned position,
    /// plus the copies required by the letter's present constraint.
    pub fn confirmed_count(&self, letter: char) -> u8 {
        let num_pinned = self.pinned_positions(letter).count() as u8;
        match self.constraints.get(&ConstraintKey::letter_present(letter)) {
            Some(Constraint::LetterPresent { minimum_count, .. }) => {
                num_pinned.saturating_add(*minimum_count)
            }
            _ => num_pinned,
        }
    }

    /// Adds constraints arising from the given guess result.
    pub fn update(&mut self, result: &GuessResult) {
        self.merge(round_constraints(result));
    }

    /// Merges one round's worth of constraints into this set.
    ///
    /// Constraints are merged absent first, then present, then exact. Constraints already in the
    /// set are skipped. Once the round is merged, the tolerance of each letter reported absent
    /// this round is recomputed from the letter's confirmed count, without ever exceeding a
    /// tolerance learned in an earlier round.
    pub fn merge<I>(&mut self, constraints: I)
    where
        I: IntoIterator<Item = Constraint>,
    {
        let mut constraints: Vec<Constraint> = constraints.into_iter().collect();
        constraints.sort_by_key(Constraint::kind);

        // Absent letters merged this round, with their tolerance from earlier rounds.
        let mut absent_letters: BTreeMap<char, Option<u8>> = BTreeMap::new();
        for constraint in constraints {
            if self.contains(&constraint) {
                continue;
            }
            debug!(%constraint, "merging constraint");
            match constraint {
                Constraint::PositionMatch { letter, position } => {
                    self.merge_position_match(letter, position)
                }
                Constraint::LetterPresent {
                    letter,
                    excluded_positions,
                    minimum_count,
                } => self.merge_letter_present(letter, excluded_positions, minimum_count),
                Constraint::LetterAbsent { letter, .. } => {
                    let previous = self.tolerance(letter);
                    absent_letters.entry(letter).or_insert(previous);
                    self.set_tolerance(letter, previous);
                }
            }
        }

        for (letter, previous) in absent_letters {
            self.set_tolerance(letter, previous);
        }
    }

    fn merge_position_match(&mut self, letter: char, position: u8) {
        let present_key = ConstraintKey::letter_present(letter);
        let mut exhausted = false;
        if let Some(Constraint::LetterPresent {
            excluded_positions,
            minimum_count,
            ..
        }) = self.constraints.get_mut(&present_key)
        {
            // This copy of the letter is now pinned, so it no longer counts towards the present
            // constraint.
            if excluded_positions.insert(position) {
                *minimum_count = minimum_count.saturating_sub(1);
                exhausted = *minimum_count == 0;
            }
        }
        if exhausted {
            debug!(%letter, "present constraint fully placed");
            self.constraints.remove(&present_key);
        }
        self.constraints.insert(
            ConstraintKey::position_match(letter, position),
            Constraint::PositionMatch { letter, position },
        );
    }

    fn merge_letter_present(
        &mut self,
        letter: char,
        mut excluded_positions: BTreeSet<u8>,
        mut minimum_count: u8,
    ) {
        // Rebase onto the pinned positions: a pinned copy may be one of the counted ones.
        for position in self.pinned_positions(letter) {
            if excluded_positions.insert(position) {
                minimum_count = minimum_count.saturating_sub(1);
            }
        }
        let key = ConstraintKey::letter_present(letter);
        if let Some(Constraint::LetterPresent {
            excluded_positions: known_excluded,
            minimum_count: known_count,
            ..
        }) = self.constraints.get(&key)
        {
            excluded_positions.extend(known_excluded.iter().copied());
            minimum_count = minimum_count.max(*known_count);
        }
        if minimum_count == 0 {
            return;
        }
        self.constraints.insert(
            key,
            Constraint::LetterPresent {
                letter,
                excluded_positions,
                minimum_count,
            },
        );
    }

    fn pinned_positions(&self, letter: char) -> impl Iterator<Item = u8> + '_ {
        self.constraints
            .values()
            .filter_map(move |constraint| match constraint {
                Constraint::PositionMatch {
                    letter: other_letter,
                    position,
                } if *other_letter == letter => Some(*position),
                _ => None,
            })
    }

    fn tolerance(&self, letter: char) -> Option<u8> {
        match self.constraints.get(&ConstraintKey::letter_absent(letter)) {
            Some(Constraint::LetterAbsent { tolerance, .. }) => Some(*tolerance),
            _ => None,
        }
    }

    fn set_tolerance(&mut self, letter: char, previous: Option<u8>) {
        let confirmed = self.confirmed_count(letter);
        let tolerance = previous.map_or(confirmed, |previous| previous.min(confirmed));
        self.constraints.insert(
            ConstraintKey::letter_absent(letter),
            Constraint::LetterAbsent { letter, tolerance },
        );
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    /// Collects constraints as-is, without merging. A later constraint replaces an earlier one
    /// occupying the same slot.
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> ConstraintSet {
        ConstraintSet {
            constraints: iter
                .into_iter()
                .map(|constraint| (constraint.key(), constraint))
                .collect(),
        }
    }
}

impl From<Vec<Constraint>> for ConstraintSet {
    fn from(constraints: Vec<Constraint>) -> ConstraintSet {
        constraints.into_iter().collect()
    }
}

impl From<ConstraintSet> for Vec<Constraint> {
    fn from(set: ConstraintSet) -> Vec<Constraint> {
        set.constraints.into_values().collect()
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, constraint) in self.constraints.values().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{constraint}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::WordleError;

    fn present(letter: char, excluded: &[u8], minimum_count: u8) -> Constraint {
        Constraint::LetterPresent {
            letter,
            excluded_positions: excluded.iter().copied().collect(),
            minimum_count,
        }
    }

    fn exact(letter: char, position: u8) -> Constraint {
        Constraint::PositionMatch { letter, position }
    }

    fn absent(letter: char, tolerance: u8) -> Constraint {
        Constraint::LetterAbsent { letter, tolerance }
    }

    #[test]
    fn position_match_is_satisfied_by() {
        let constraint = exact('a', 2);

        assert!(constraint.is_satisfied_by("scale"));
        assert!(!constraint.is_satisfied_by("apple"));
        assert!(!constraint.is_satisfied_by("ab"));
    }

    #[test]
    fn letter_present_is_satisfied_by() {
        let constraint = present('e', &[4], 1);

        assert!(constraint.is_satisfied_by("eight"));
        assert!(constraint.is_satisfied_by("where"));
        assert!(!constraint.is_satisfied_by("apple"));
        assert!(!constraint.is_satisfied_by("crazy"));

        let constraint = present('e', &[0], 2);
        assert!(constraint.is_satisfied_by("geese"));
        assert!(!constraint.is_satisfied_by("eaten"));
    }

    #[test]
    fn letter_absent_is_satisfied_by() {
        assert!(absent('z', 0).is_satisfied_by("apple"));
        assert!(!absent('p', 0).is_satisfied_by("apple"));
        assert!(!absent('p', 1).is_satisfied_by("apple"));
        assert!(absent('p', 2).is_satisfied_by("apple"));
    }

    #[test]
    fn round_constraints_sorted_absent_present_exact() -> Result<(), WordleError> {
        let result = GuessResult::parse("crane", "+*--*")?;

        let constraints = round_constraints(&result);

        assert_eq!(
            constraints,
            vec![
                absent('a', 0),
                absent('n', 0),
                present('r', &[1], 1),
                present('e', &[4], 1),
                exact('c', 0),
            ]
        );
        Ok(())
    }

    #[test]
    fn round_constraints_coalesces_present_letters() -> Result<(), WordleError> {
        let result = GuessResult::parse("eerie", "**-+-")?;

        let constraints = round_constraints(&result);

        assert_eq!(
            constraints,
            vec![
                absent('r', 0),
                absent('e', 0),
                present('e', &[0, 1, 4], 2),
                exact('i', 3),
            ]
        );
        Ok(())
    }

    #[test]
    fn round_constraints_counts_exact_copies_of_present_letters() -> Result<(), WordleError> {
        let result = GuessResult::parse("speed", "--+*-")?;

        let constraints = round_constraints(&result);

        assert!(constraints.contains(&present('e', &[3], 2)));
        assert!(constraints.contains(&exact('e', 2)));
        Ok(())
    }

    #[test]
    fn round_constraints_skips_unknown_symbols() -> Result<(), WordleError> {
        let result = GuessResult::parse("crane", "+?x-!")?;

        assert_eq!(
            round_constraints(&result),
            vec![absent('n', 0), exact('c', 0)]
        );
        Ok(())
    }

    #[test]
    fn merge_skips_duplicates() {
        let mut constraints = ConstraintSet::new();

        constraints.merge(vec![exact('a', 0), absent('z', 0)]);
        constraints.merge(vec![exact('a', 0), absent('z', 0)]);

        assert_eq!(constraints.len(), 2);
        assert!(constraints.contains(&exact('a', 0)));
        assert!(constraints.contains(&absent('z', 0)));
    }

    #[test]
    fn merge_position_match_removes_placed_present_letter() {
        let mut constraints: ConstraintSet = vec![present('a', &[1], 1)].into();

        constraints.merge(vec![exact('a', 3)]);

        assert_eq!(
            constraints.iter().cloned().collect::<Vec<_>>(),
            vec![exact('a', 3)]
        );
    }

    #[test]
    fn merge_position_match_decrements_present_letter() {
        let mut constraints: ConstraintSet = vec![present('a', &[1], 2)].into();

        constraints.merge(vec![exact('a', 3)]);

        assert!(constraints.contains(&present('a', &[1, 3], 1)));
        assert!(constraints.contains(&exact('a', 3)));
        assert!(constraints.is_satisfied_by("aaxax"));
        assert!(!constraints.is_satisfied_by("xxxax"));
    }

    #[test]
    fn merge_letter_present_unions_positions() {
        let mut constraints = ConstraintSet::new();

        constraints.merge(vec![present('e', &[1], 1)]);
        constraints.merge(vec![present('e', &[3], 1)]);

        assert_eq!(
            constraints.iter().cloned().collect::<Vec<_>>(),
            vec![present('e', &[1, 3], 1)]
        );
    }

    #[test]
    fn merge_letter_present_keeps_larger_count() {
        let mut constraints = ConstraintSet::new();

        constraints.merge(vec![present('e', &[1, 2], 2)]);
        constraints.merge(vec![present('e', &[3], 1)]);

        assert!(constraints.contains(&present('e', &[1, 2, 3], 2)));
    }

    #[test]
    fn merge_letter_present_rebases_onto_pinned_letters() {
        let mut constraints = ConstraintSet::new();
        constraints.merge(vec![exact('e', 0)]);

        // A lone present signal may refer to the pinned copy.
        constraints.merge(vec![present('e', &[2], 1)]);
        assert_eq!(constraints.len(), 1);

        constraints.merge(vec![present('e', &[2], 2)]);
        assert!(constraints.contains(&present('e', &[0, 2], 1)));
    }

    #[test]
    fn update_exact_and_present_in_same_round() -> Result<(), WordleError> {
        // The objective has two copies of 'e': one pinned, one elsewhere.
        let constraints = ConstraintSet::from_result(&GuessResult::parse("speed", "--+*-")?);

        assert!(constraints.contains(&exact('e', 2)));
        assert!(constraints.contains(&present('e', &[2, 3], 1)));
        assert!(constraints.is_satisfied_by("there"));
        assert!(!constraints.is_satisfied_by("cheap"));
        Ok(())
    }

    #[test]
    fn update_absent_tolerance_counts_exact_matches() -> Result<(), WordleError> {
        let constraints = ConstraintSet::from_result(&GuessResult::parse("level", "---++")?);

        assert!(constraints.contains(&absent('l', 1)));
        assert!(constraints.contains(&absent('e', 1)));
        assert!(constraints.contains(&absent('v', 0)));
        assert!(constraints.is_satisfied_by("hotel"));
        assert!(!constraints.is_satisfied_by("lapel"));
        Ok(())
    }

    #[test]
    fn update_absent_tolerance_counts_present_letters() -> Result<(), WordleError> {
        let constraints = ConstraintSet::from_result(&GuessResult::parse("radar", "*----")?);

        assert!(constraints.contains(&absent('r', 1)));
        assert!(constraints.contains(&present('r', &[0, 4], 1)));
        assert!(constraints.is_satisfied_by("shirt"));
        assert!(!constraints.is_satisfied_by("furor"));
        assert!(!constraints.is_satisfied_by("rusty"));
        assert!(!constraints.is_satisfied_by("honor"));
        Ok(())
    }

    #[test]
    fn update_never_raises_earlier_tolerance() -> Result<(), WordleError> {
        let mut constraints = ConstraintSet::new();
        constraints.update(&GuessResult::parse("rusty", "-----")?);

        // Contradicts the earlier round.
        constraints.update(&GuessResult::parse("shirt", "---+-")?);

        assert!(constraints.contains(&absent('r', 0)));
        assert!(constraints.contains(&exact('r', 3)));
        assert!(!constraints.is_satisfied_by("shirt"));
        Ok(())
    }

    #[test]
    fn confirmed_count() {
        let constraints: ConstraintSet =
            vec![exact('e', 0), present('e', &[0, 2], 2), absent('x', 0)].into();

        assert_eq!(constraints.confirmed_count('e'), 3);
        assert_eq!(constraints.confirmed_count('x'), 0);
        assert_eq!(constraints.confirmed_count('q'), 0);
    }

    #[test]
    fn confirmed_count_saturates() {
        let constraints: ConstraintSet = vec![exact('e', 0), present('e', &[0], u8::MAX)].into();

        assert_eq!(constraints.confirmed_count('e'), u8::MAX);
    }

    #[test]
    fn display() {
        let constraints: ConstraintSet =
            vec![exact('a', 0), present('e', &[1, 3], 1), absent('z', 0)].into();

        assert_eq!(
            constraints.to_string(),
            "[a at 0, e x1 not at {1, 3}, z at most 0]"
        );
    }
}
