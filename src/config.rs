//! Configuration of the target grammar format and of a compilation run.
//!
//! Every character and rule name the compiler bakes into its output comes from a
//! [`GrammarFormat`], so the compiler can target another tag-based engine by swapping the
//! format instead of touching the compiler itself.

use serde::{Deserialize, Serialize};

use crate::types::CompileError;

/// Tracery special characters, JSON special characters, CBDQ special characters, and `*`.
pub const DEFAULT_RESERVED_CHARACTERS: &str = "[],{}#\"*\n \t";
/// The character that delimits state and symbol in compiled rule names.
pub const DEFAULT_ESCAPE_MARKER: char = '*';

/// The external single-character codes of the three head movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionCodes {
    pub right: char,
    pub left: char,
    pub stay: char,
}

impl Default for DirectionCodes {
    fn default() -> Self {
        Self {
            right: '>',
            left: '<',
            stay: '_',
        }
    }
}

/// Describes the target grammar: its reserved characters and the names of the rules and
/// stacks the compiled rules talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarFormat {
    /// Characters that may not appear in any state or symbol identifier.
    pub reserved_characters: String,
    pub escape_marker: char,
    pub directions: DirectionCodes,
    /// The template rule that composes state and tape symbol into a compiled rule name.
    pub dispatcher_rule: String,
    /// The template rule a continuation reference expands to.
    pub activation_rule: String,
    /// Rules whose name contains this marker are never instrumented in verbose mode.
    pub activation_marker: String,
    /// The slot a compiled rule pushes its continuation onto.
    pub continuation_slot: String,
    pub state_slot: String,
    pub direction_slot: String,
    /// The stack whose top is the cell under the head.
    pub tape_stack: String,
    /// Rules whose name starts with this prefix are never instrumented in verbose mode.
    pub tape_prefix: String,
    pub pop_token: String,
    pub padder_left_prefix: String,
    pub padder_right_prefix: String,
    pub init_tape_rule: String,
    pub init_state_rule: String,
    pub blank_rule: String,
}

impl Default for GrammarFormat {
    fn default() -> Self {
        Self {
            reserved_characters: DEFAULT_RESERVED_CHARACTERS.to_string(),
            escape_marker: DEFAULT_ESCAPE_MARKER,
            directions: DirectionCodes::default(),
            dispatcher_rule: "run".to_string(),
            activation_rule: "activate_next".to_string(),
            activation_marker: "activate".to_string(),
            continuation_slot: "run_next".to_string(),
            state_slot: "state".to_string(),
            direction_slot: "direction".to_string(),
            tape_stack: "tape_right".to_string(),
            tape_prefix: "tape".to_string(),
            pop_token: "POP".to_string(),
            padder_left_prefix: "padder_left".to_string(),
            padder_right_prefix: "padder_right".to_string(),
            init_tape_rule: "init_tape".to_string(),
            init_state_rule: "init_state".to_string(),
            blank_rule: "blank".to_string(),
        }
    }
}

impl GrammarFormat {
    /// Returns `true` if `c` may not appear in identifiers.
    pub fn is_reserved(&self, c: char) -> bool {
        self.reserved_characters.contains(c)
    }

    /// Returns the first reserved character in `identifier`, if any.
    pub fn find_reserved(&self, identifier: &str) -> Option<char> {
        identifier.chars().find(|&c| self.is_reserved(c))
    }

    /// Checks that the format can produce collision-free rule names.
    pub fn check(&self) -> Result<(), CompileError> {
        if !self.is_reserved(self.escape_marker) {
            return Err(CompileError::InvalidFormat(format!(
                "escape marker {:?} must be a reserved character",
                self.escape_marker
            )));
        }

        let DirectionCodes { right, left, stay } = self.directions;
        if right == left || right == stay || left == stay {
            return Err(CompileError::InvalidFormat(format!(
                "direction codes must be distinct, got right={right:?} left={left:?} stay={stay:?}"
            )));
        }

        Ok(())
    }
}

/// Controls how the compiler treats (state, symbol) pairs without a transition.
///
/// - `Strict` (default): an incomplete transition table is a validation error.
/// - `Normal`: missing pairs are skipped with a warning; the grammar then holds a dangling
///   reference that only fails once the engine reaches it.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    Normal,
    #[default]
    Strict,
}

/// Options for a single compilation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub mode: Mode,
    /// Instrument every production with trace annotations.
    pub verbose: bool,
}
