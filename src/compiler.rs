//! This module compiles the transition table of a [`Machine`] into named rewrite rules,
//! one per (non-halting state, symbol) pair.
//!
//! A compiled rule records the new state, replaces the cell under the head, records the
//! head movement and, unless the machine halts, re-activates the dispatcher:
//!
//! ```text
//! *q0*0 -> [state:q1][tape_right:POP][tape_right:1][direction:>][run_next:#activate_next#]
//! ```

use tracing::{debug, info, warn};

use crate::config::{GrammarFormat, Mode};
use crate::machine::Machine;
use crate::types::{Action, StateSymbol};

/// A single compiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub key: StateSymbol,
    pub name: String,
    pub body: String,
    /// `true` if the body carries no continuation reference.
    pub halts: bool,
}

/// Returns the rule name for `key` in the given format.
pub fn rule_name(key: &StateSymbol, format: &GrammarFormat) -> String {
    key.code(format.escape_marker)
}

/// Encodes `action` as a rule body.
///
/// The continuation reference is present if and only if the target state is neither the
/// accept nor the reject state.
pub fn encode_action(action: &Action, machine: &Machine, format: &GrammarFormat) -> String {
    let continuation = if machine.is_halting(&action.state) {
        String::new()
    } else {
        format!(
            "[{}:#{}#]",
            format.continuation_slot, format.activation_rule
        )
    };

    format!(
        "[{state_slot}:{state}][{tape}:{pop}][{tape}:{symbol}][{direction_slot}:{direction}]{continuation}",
        state_slot = format.state_slot,
        state = action.state,
        tape = format.tape_stack,
        pop = format.pop_token,
        symbol = action.symbol,
        direction_slot = format.direction_slot,
        direction = action.direction.code(format),
    )
}

/// Compiles every live (state, symbol) pair of `machine`, state-major in declaration order.
///
/// Pairs without a transition only occur for machines validated in `Mode::Normal`; they
/// are skipped with a warning. In `Mode::Strict` the validator has already rejected them.
pub fn compile(machine: &Machine, format: &GrammarFormat, mode: Mode) -> Vec<CompiledRule> {
    let mut rules = Vec::new();
    let mut missing = 0;

    for key in machine.live_pairs() {
        let Some(action) = machine.transition(&key) else {
            missing += 1;
            warn!(?mode, pair = %key, "no transition defined; the engine will fail on reaching it");
            continue;
        };

        let name = rule_name(&key, format);
        let body = encode_action(action, machine, format);
        let halts = machine.is_halting(&action.state);
        debug!(rule = %name, %body, halts, "compiled transition");

        rules.push(CompiledRule {
            key,
            name,
            body,
            halts,
        });
    }

    info!(
        compiled = rules.len(),
        missing,
        "compiled transition table"
    );

    rules
}
