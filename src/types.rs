//! This module defines the core data structures and types used throughout the compiler,
//! including the parsed machine description, transition keys and actions, and error types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::GrammarFormat;

/// The raw machine description as read from a `.json` machine file.
///
/// Nothing in a description is trusted: identifiers are plain strings and directions are
/// plain codes until [`crate::machine::Machine::new`] validates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineDescription {
    /// State identifiers, in declaration order.
    pub states: Vec<String>,
    /// Symbol identifiers, in declaration order. Each must be a single character.
    pub symbols: Vec<String>,
    /// The symbol the tape is padded with beyond its materialized extent.
    pub blank_symbol: String,
    pub start_state: String,
    pub accept_state: String,
    pub reject_state: String,
    /// Transition entries: `[[state, symbol], [target, write, direction]]`.
    #[serde(default)]
    pub delta: Vec<TransitionEntry>,
}

/// A single `delta` entry of a machine description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionEntry(pub (String, String), pub (String, String, String));

impl TransitionEntry {
    /// Builds an entry from its textual parts.
    pub fn new(state: &str, symbol: &str, target: &str, write: &str, direction: &str) -> Self {
        Self(
            (state.to_string(), symbol.to_string()),
            (target.to_string(), write.to_string(), direction.to_string()),
        )
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the right.
    Right,
    /// Move the head one position to the left.
    Left,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Converts an external direction code into a `Direction`.
    ///
    /// Codes must be exactly one character and match one of the format's direction codes.
    pub fn from_code(code: &str, format: &GrammarFormat) -> Option<Self> {
        let mut chars = code.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        [Direction::Right, Direction::Left, Direction::Stay]
            .into_iter()
            .find(|direction| direction.code(format) == c)
    }

    /// Returns the external code of this direction in the given format.
    pub fn code(self, format: &GrammarFormat) -> char {
        match self {
            Direction::Right => format.directions.right,
            Direction::Left => format.directions.left,
            Direction::Stay => format.directions.stay,
        }
    }
}

/// The lookup key for "what to do next": the current state and the symbol under the head.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateSymbol {
    pub state: String,
    pub symbol: char,
}

impl StateSymbol {
    pub fn new(state: impl Into<String>, symbol: char) -> Self {
        Self {
            state: state.into(),
            symbol,
        }
    }

    /// Returns the rule name for this key: `<marker><state><marker><symbol>`.
    ///
    /// Validated identifiers never contain the marker, so the two marker positions
    /// delimit the components and the name is injective over keys.
    pub fn code(&self, marker: char) -> String {
        format!("{marker}{}{marker}{}", self.state, self.symbol)
    }

    /// Recovers the key from a rule name produced by [`StateSymbol::code`].
    pub fn from_code(name: &str, marker: char) -> Option<Self> {
        let rest = name.strip_prefix(marker)?;
        let (state, symbol) = rest.split_once(marker)?;

        let mut chars = symbol.chars();
        let symbol = chars.next()?;
        if chars.next().is_some() || state.contains(marker) || symbol == marker {
            return None;
        }

        Some(Self::new(state, symbol))
    }
}

impl fmt::Display for StateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.state, self.symbol)
    }
}

/// The machine's response to a [`StateSymbol`]: move to `state`, write `symbol`, then move
/// the head in `direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub state: String,
    pub symbol: char,
    pub direction: Direction,
}

/// A partial mapping from [`StateSymbol`] to [`Action`], in declaration order.
pub type TransitionFunction = IndexMap<StateSymbol, Action>;

/// A single violated machine invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("state name \"{0}\" is not unique")]
    DuplicateState(String),
    #[error("symbol \"{0}\" is not unique")]
    DuplicateSymbol(String),
    #[error("state name \"{state}\" contains reserved character {character:?}")]
    ReservedCharacterInState { state: String, character: char },
    #[error("symbol \"{0}\" must be a single character")]
    SymbolNotSingleCharacter(String),
    #[error("symbol \"{0}\" is reserved")]
    ReservedSymbol(String),
    #[error("blank symbol \"{0}\" must be a single symbol")]
    BlankNotSingleCharacter(String),
    #[error("blank symbol \"{0}\" not in symbols")]
    BlankNotInSymbols(String),
    #[error("start state \"{0}\" not in states")]
    StartStateNotInStates(String),
    #[error("accept state \"{0}\" not in states")]
    AcceptStateNotInStates(String),
    #[error("reject state \"{0}\" not in states")]
    RejectStateNotInStates(String),
    #[error("transition for state \"{state}\" and symbol \"{symbol}\" is defined more than once")]
    DuplicateTransition { state: String, symbol: String },
    #[error("transition starts in nonexistent state \"{0}\"")]
    TransitionFromUnknownState(String),
    #[error("transition requires nonexistent symbol \"{0}\"")]
    TransitionOnUnknownSymbol(String),
    #[error("transition starts in accepting state \"{0}\"")]
    TransitionFromAcceptState(String),
    #[error("transition starts in rejecting state \"{0}\"")]
    TransitionFromRejectState(String),
    #[error("transition goes to nonexistent state \"{0}\"")]
    TransitionToUnknownState(String),
    #[error("transition writes nonexistent symbol \"{0}\"")]
    TransitionWritesUnknownSymbol(String),
    #[error("transition goes in invalid direction \"{0}\"")]
    InvalidDirection(String),
    #[error("no transition defined for state \"{state}\" and symbol \"{symbol}\"")]
    MissingTransition { state: String, symbol: char },
}

/// Every invariant violation found in a machine description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// Represents the errors that can abort a compilation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The machine description violates one or more invariants.
    #[error("Machine validation failed:\n{0}")]
    Validation(ValidationErrors),
    /// The input tape contains a character outside the machine's alphabet.
    #[error("Input symbol {symbol:?} at position {position} is not in the machine's symbols")]
    InvalidInputSymbol { symbol: char, position: usize },
    /// The base template lacks a rule the compiled grammar depends on.
    #[error("Base template is missing required rule \"{0}\"")]
    MissingTemplateRule(String),
    /// The grammar format configuration is self-inconsistent.
    #[error("Invalid grammar format: {0}")]
    InvalidFormat(String),
    /// A machine, template or format file could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

impl From<ValidationErrors> for CompileError {
    fn from(errors: ValidationErrors) -> Self {
        CompileError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_direction_codes() {
        let format = GrammarFormat::default();

        assert_eq!(Direction::from_code(">", &format), Some(Direction::Right));
        assert_eq!(Direction::from_code("<", &format), Some(Direction::Left));
        assert_eq!(Direction::from_code("_", &format), Some(Direction::Stay));
        assert_eq!(Direction::from_code("R", &format), None);
        assert_eq!(Direction::from_code(">>", &format), None);
        assert_eq!(Direction::from_code("", &format), None);
        assert_eq!(Direction::Left.code(&format), '<');
    }

    #[test]
    fn test_state_symbol_code() {
        let key = StateSymbol::new("q0", '1');
        assert_eq!(key.code('*'), "*q0*1");
        assert_eq!(StateSymbol::from_code("*q0*1", '*'), Some(key));
    }

    #[test]
    fn test_state_symbol_code_rejects_foreign_names() {
        assert_eq!(StateSymbol::from_code("run", '*'), None);
        assert_eq!(StateSymbol::from_code("*q0", '*'), None);
        assert_eq!(StateSymbol::from_code("*q0*10", '*'), None);
        assert_eq!(StateSymbol::from_code("*q*0*1", '*'), None);
    }

    #[test]
    fn test_transition_entry_deserialization() {
        let entry: TransitionEntry = serde_json::from_str(r#"[["q0", "0"], ["q1", "1", ">"]]"#)
            .unwrap();
        assert_eq!(entry, TransitionEntry::new("q0", "0", "q1", "1", ">"));
    }

    #[test]
    fn test_error_display() {
        let errors = ValidationErrors(vec![
            ValidationError::BlankNotInSymbols("B".to_string()),
            ValidationError::TransitionFromAcceptState("qa".to_string()),
        ]);
        let error = CompileError::from(errors);

        let error_msg = error.to_string();
        assert!(error_msg.contains("blank symbol \"B\" not in symbols"));
        assert!(error_msg.contains("transition starts in accepting state \"qa\""));
    }
}
