//! This module validates a raw [`MachineDescription`] against the machine invariants and,
//! when every check passes, produces the typed [`Machine`].
//!
//! All checks always run, so a faulty description reports every violation at once instead
//! of one per attempt.

use indexmap::IndexSet;

use crate::config::{GrammarFormat, Mode};
use crate::machine::Machine;
use crate::types::{
    Action, Direction, MachineDescription, StateSymbol, TransitionFunction, ValidationError,
    ValidationErrors,
};

/// Validates `description` and builds the machine it describes.
///
/// # Arguments
///
/// * `description` - The parsed machine description.
/// * `format` - Supplies the reserved characters and direction codes.
/// * `mode` - In `Mode::Strict`, every non-halting (state, symbol) pair must have a transition.
///
/// # Returns
///
/// * `Ok(Machine)` if no invariant is violated.
/// * `Err(ValidationErrors)` listing every violation found.
pub fn validate(
    description: &MachineDescription,
    format: &GrammarFormat,
    mode: Mode,
) -> Result<Machine, ValidationErrors> {
    let mut errors = Vec::new();

    let states = check_states(description, format, &mut errors);
    let symbols = check_symbols(description, format, &mut errors);
    let blank = check_blank(description, &symbols, &mut errors);
    check_designated_states(description, &states, &mut errors);
    let delta = check_transitions(description, format, &states, &symbols, &mut errors);

    if mode == Mode::Strict {
        check_totality(description, &states, &symbols, &delta, &mut errors);
    }

    match blank {
        Some(blank) if errors.is_empty() => Ok(Machine::from_parts(
            states,
            symbols,
            blank,
            description.start_state.clone(),
            description.accept_state.clone(),
            description.reject_state.clone(),
            delta,
        )),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Checks that state names are unique and free of reserved characters.
fn check_states(
    description: &MachineDescription,
    format: &GrammarFormat,
    errors: &mut Vec<ValidationError>,
) -> IndexSet<String> {
    let mut states = IndexSet::new();

    for state in &description.states {
        if let Some(character) = format.find_reserved(state) {
            errors.push(ValidationError::ReservedCharacterInState {
                state: state.clone(),
                character,
            });
        }

        if !states.insert(state.clone()) {
            errors.push(ValidationError::DuplicateState(state.clone()));
        }
    }

    states
}

/// Checks that symbols are unique single unreserved characters.
///
/// Only well-formed symbols make it into the returned alphabet.
fn check_symbols(
    description: &MachineDescription,
    format: &GrammarFormat,
    errors: &mut Vec<ValidationError>,
) -> IndexSet<char> {
    let mut symbols = IndexSet::new();
    let mut seen = IndexSet::new();

    for symbol in &description.symbols {
        if !seen.insert(symbol.as_str()) {
            errors.push(ValidationError::DuplicateSymbol(symbol.clone()));
            continue;
        }

        match single_char(symbol) {
            None => errors.push(ValidationError::SymbolNotSingleCharacter(symbol.clone())),
            Some(c) if format.is_reserved(c) => {
                errors.push(ValidationError::ReservedSymbol(symbol.clone()))
            }
            Some(c) => {
                symbols.insert(c);
            }
        }
    }

    symbols
}

fn check_blank(
    description: &MachineDescription,
    symbols: &IndexSet<char>,
    errors: &mut Vec<ValidationError>,
) -> Option<char> {
    let blank = &description.blank_symbol;

    match single_char(blank) {
        None => {
            errors.push(ValidationError::BlankNotSingleCharacter(blank.clone()));
            None
        }
        Some(c) if !symbols.contains(&c) => {
            errors.push(ValidationError::BlankNotInSymbols(blank.clone()));
            None
        }
        Some(c) => Some(c),
    }
}

fn check_designated_states(
    description: &MachineDescription,
    states: &IndexSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    if !states.contains(&description.start_state) {
        errors.push(ValidationError::StartStateNotInStates(
            description.start_state.clone(),
        ));
    }
    if !states.contains(&description.accept_state) {
        errors.push(ValidationError::AcceptStateNotInStates(
            description.accept_state.clone(),
        ));
    }
    if !states.contains(&description.reject_state) {
        errors.push(ValidationError::RejectStateNotInStates(
            description.reject_state.clone(),
        ));
    }
}

/// Checks every transition entry and collects the well-formed ones.
fn check_transitions(
    description: &MachineDescription,
    format: &GrammarFormat,
    states: &IndexSet<String>,
    symbols: &IndexSet<char>,
    errors: &mut Vec<ValidationError>,
) -> TransitionFunction {
    let mut delta = TransitionFunction::new();
    let mut seen = IndexSet::new();

    for entry in &description.delta {
        let (state, symbol) = &entry.0;
        let (target, write, direction) = &entry.1;
        let before = errors.len();

        if !seen.insert((state.as_str(), symbol.as_str())) {
            errors.push(ValidationError::DuplicateTransition {
                state: state.clone(),
                symbol: symbol.clone(),
            });
            continue;
        }

        if !states.contains(state) {
            errors.push(ValidationError::TransitionFromUnknownState(state.clone()));
        }
        if *state == description.accept_state {
            errors.push(ValidationError::TransitionFromAcceptState(state.clone()));
        }
        if *state == description.reject_state {
            errors.push(ValidationError::TransitionFromRejectState(state.clone()));
        }

        let read = single_char(symbol).filter(|c| symbols.contains(c));
        if read.is_none() {
            errors.push(ValidationError::TransitionOnUnknownSymbol(symbol.clone()));
        }

        if !states.contains(target) {
            errors.push(ValidationError::TransitionToUnknownState(target.clone()));
        }

        let written = single_char(write).filter(|c| symbols.contains(c));
        if written.is_none() {
            errors.push(ValidationError::TransitionWritesUnknownSymbol(write.clone()));
        }

        let direction_value = Direction::from_code(direction, format);
        if direction_value.is_none() {
            errors.push(ValidationError::InvalidDirection(direction.clone()));
        }

        if errors.len() != before {
            continue;
        }

        if let (Some(read), Some(written), Some(direction)) = (read, written, direction_value) {
            delta.insert(
                StateSymbol::new(state.clone(), read),
                Action {
                    state: target.clone(),
                    symbol: written,
                    direction,
                },
            );
        }
    }

    delta
}

/// Checks that every non-halting state has a transition for every symbol.
fn check_totality(
    description: &MachineDescription,
    states: &IndexSet<String>,
    symbols: &IndexSet<char>,
    delta: &TransitionFunction,
    errors: &mut Vec<ValidationError>,
) {
    let live_states = states
        .iter()
        .filter(|s| **s != description.accept_state && **s != description.reject_state);

    for state in live_states {
        for &symbol in symbols {
            let key = StateSymbol::new(state.clone(), symbol);
            if !delta.contains_key(&key) {
                errors.push(ValidationError::MissingTransition {
                    state: state.clone(),
                    symbol,
                });
            }
        }
    }
}

/// Returns the only character of `s`, or `None` if `s` is not exactly one code point.
fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
