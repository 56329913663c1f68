//! This module defines the `Machine` struct, the validated and immutable form of a
//! Turing machine description that the compiler reads from.

use indexmap::IndexSet;
use tracing::warn;

use crate::config::{GrammarFormat, Mode};
use crate::types::{Action, CompileError, MachineDescription, StateSymbol, TransitionFunction};
use crate::validator::validate;

/// A validated deterministic single-tape Turing machine.
///
/// A `Machine` can only be obtained through validation, so every identifier it holds is
/// free of the format's reserved characters and every transition refers to known states
/// and symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    states: IndexSet<String>,
    symbols: IndexSet<char>,
    blank: char,
    start_state: String,
    accept_state: String,
    reject_state: String,
    delta: TransitionFunction,
}

impl Machine {
    /// Validates `description` and builds the machine it describes.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the description satisfies every invariant.
    /// * `Err(CompileError::Validation)` listing every violated invariant.
    pub fn new(
        description: &MachineDescription,
        format: &GrammarFormat,
        mode: Mode,
    ) -> Result<Self, CompileError> {
        let machine = validate(description, format, mode)?;

        if machine.accept_state == machine.reject_state {
            warn!(
                state = %machine.accept_state,
                "accept and reject states coincide; rejection is indistinguishable from acceptance"
            );
        }

        Ok(machine)
    }

    pub(crate) fn from_parts(
        states: IndexSet<String>,
        symbols: IndexSet<char>,
        blank: char,
        start_state: String,
        accept_state: String,
        reject_state: String,
        delta: TransitionFunction,
    ) -> Self {
        Self {
            states,
            symbols,
            blank,
            start_state,
            accept_state,
            reject_state,
            delta,
        }
    }

    /// Returns the states in declaration order.
    pub fn states(&self) -> &IndexSet<String> {
        &self.states
    }

    /// Returns the alphabet in declaration order.
    pub fn symbols(&self) -> &IndexSet<char> {
        &self.symbols
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    pub fn accept_state(&self) -> &str {
        &self.accept_state
    }

    pub fn reject_state(&self) -> &str {
        &self.reject_state
    }

    pub fn transitions(&self) -> &TransitionFunction {
        &self.delta
    }

    /// Looks up the action for the given (state, symbol) pair.
    pub fn transition(&self, key: &StateSymbol) -> Option<&Action> {
        self.delta.get(key)
    }

    /// Checks if `state` is the accept or the reject state.
    pub fn is_halting(&self, state: &str) -> bool {
        state == self.accept_state || state == self.reject_state
    }

    /// Returns the non-halting states in declaration order.
    pub fn live_states(&self) -> impl Iterator<Item = &str> {
        self.states
            .iter()
            .map(String::as_str)
            .filter(move |state| !self.is_halting(state))
    }

    /// Returns every (non-halting state, symbol) pair, state-major.
    pub fn live_pairs(&self) -> impl Iterator<Item = StateSymbol> + '_ {
        self.live_states().flat_map(move |state| {
            self.symbols
                .iter()
                .map(move |&symbol| StateSymbol::new(state, symbol))
        })
    }

    /// Checks if every live pair has a transition.
    pub fn is_total(&self) -> bool {
        self.live_pairs().all(|key| self.delta.contains_key(&key))
    }

    /// Checks that every character of `input` belongs to the alphabet.
    pub fn check_input(&self, input: &str) -> Result<(), CompileError> {
        input
            .chars()
            .enumerate()
            .find(|(_, symbol)| !self.symbols.contains(symbol))
            .map_or(Ok(()), |(position, symbol)| {
                Err(CompileError::InvalidInputSymbol { symbol, position })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, TransitionEntry};

    fn create_test_machine() -> Machine {
        let description = MachineDescription {
            states: vec![
                "q0".to_string(),
                "q1".to_string(),
                "qa".to_string(),
                "qr".to_string(),
            ],
            symbols: vec!["0".to_string(), "1".to_string(), "B".to_string()],
            blank_symbol: "B".to_string(),
            start_state: "q0".to_string(),
            accept_state: "qa".to_string(),
            reject_state: "qr".to_string(),
            delta: vec![
                TransitionEntry::new("q0", "0", "q1", "0", ">"),
                TransitionEntry::new("q0", "1", "q0", "1", ">"),
                TransitionEntry::new("q0", "B", "qr", "B", "_"),
                TransitionEntry::new("q1", "0", "qa", "0", "_"),
            ],
        };

        Machine::new(&description, &GrammarFormat::default(), Mode::Normal).unwrap()
    }

    #[test]
    fn test_machine_creation() {
        let machine = create_test_machine();

        assert_eq!(machine.states().len(), 4);
        assert_eq!(machine.symbols().len(), 3);
        assert_eq!(machine.blank(), 'B');
        assert_eq!(machine.start_state(), "q0");
        assert_eq!(machine.accept_state(), "qa");
        assert_eq!(machine.reject_state(), "qr");
    }

    #[test]
    fn test_transition_lookup() {
        let machine = create_test_machine();

        let action = machine.transition(&StateSymbol::new("q0", '0')).unwrap();
        assert_eq!(action.state, "q1");
        assert_eq!(action.symbol, '0');
        assert_eq!(action.direction, Direction::Right);

        assert!(machine.transition(&StateSymbol::new("q1", '1')).is_none());
    }

    #[test]
    fn test_live_states_and_pairs() {
        let machine = create_test_machine();

        let live: Vec<&str> = machine.live_states().collect();
        assert_eq!(live, vec!["q0", "q1"]);

        let pairs: Vec<StateSymbol> = machine.live_pairs().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], StateSymbol::new("q0", '0'));
        assert_eq!(pairs[5], StateSymbol::new("q1", 'B'));
        assert!(!machine.is_total());
    }

    #[test]
    fn test_is_halting() {
        let machine = create_test_machine();

        assert!(machine.is_halting("qa"));
        assert!(machine.is_halting("qr"));
        assert!(!machine.is_halting("q0"));
    }

    #[test]
    fn test_check_input() {
        let machine = create_test_machine();

        assert!(machine.check_input("").is_ok());
        assert!(machine.check_input("01B1").is_ok());
        assert_eq!(
            machine.check_input("012"),
            Err(CompileError::InvalidInputSymbol {
                symbol: '2',
                position: 2,
            })
        );
    }

    #[test]
    fn test_invalid_description_is_rejected() {
        let description = MachineDescription {
            states: vec!["q0".to_string()],
            symbols: vec!["0".to_string()],
            blank_symbol: "B".to_string(),
            start_state: "q0".to_string(),
            accept_state: "q0".to_string(),
            reject_state: "q0".to_string(),
            delta: Vec::new(),
        };

        let result = Machine::new(&description, &GrammarFormat::default(), Mode::Strict);
        assert!(matches!(result, Err(CompileError::Validation(_))));
    }
}
