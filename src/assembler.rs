//! This module overlays the compiled machine onto a base template: the initial tape and
//! state, the blank and padding rules, the compiled transitions and, optionally, verbose
//! trace annotations.

use tracing::{debug, info};

use crate::compiler::compile;
use crate::config::{CompileOptions, GrammarFormat};
use crate::grammar::Grammar;
use crate::machine::Machine;
use crate::types::CompileError;

/// Encodes `input` as a sequence of pushes onto the tape stack.
///
/// Each push lands on top of the stack, so the characters are pushed last to first and the
/// first input character ends up under the head.
pub fn encode_initial_tape(input: &str, format: &GrammarFormat) -> String {
    input
        .chars()
        .rev()
        .map(|symbol| format!("[{}:{}]", format.tape_stack, symbol))
        .collect()
}

/// Encodes the rule that records the start state.
pub fn encode_initial_state(machine: &Machine, format: &GrammarFormat) -> String {
    format!("[{}:{}]", format.state_slot, machine.start_state())
}

pub fn padder_left_name(symbol: char, format: &GrammarFormat) -> String {
    format!("{}{}", format.padder_left_prefix, symbol)
}

pub fn padder_right_name(symbol: char, format: &GrammarFormat) -> String {
    format!("{}{}", format.padder_right_prefix, symbol)
}

/// Returns `true` for a padding rule name.
fn is_padder(name: &str, format: &GrammarFormat) -> bool {
    name.starts_with(&format.padder_left_prefix) || name.starts_with(&format.padder_right_prefix)
}

/// Checks whether verbose mode instruments the rule called `name`.
///
/// Tape rules, the initial tape, continuation-activation rules, the blank rule and padding
/// rules are left alone: their bodies are data or plumbing, not productions.
pub fn is_instrumented(name: &str, format: &GrammarFormat) -> bool {
    !name.contains(&format.activation_marker)
        && !name.starts_with(&format.tape_prefix)
        && name != format.init_tape_rule
        && name != format.blank_rule
        && !is_padder(name, format)
}

/// Adds trace annotations to `grammar` in place.
///
/// The dispatcher first announces the state and the cell under the head, then every
/// instrumented rule is prefixed with a line naming itself.
pub fn instrument(grammar: &mut Grammar, format: &GrammarFormat) {
    let announcement = format!("#{}##{}# ", format.state_slot, format.tape_stack);
    grammar.update(
        |name| name == format.dispatcher_rule,
        |_, body| format!("{announcement}{body}"),
    );

    let marker = format.escape_marker;
    grammar.update(
        |name| is_instrumented(name, format),
        |name, body| format!("\n{marker}{name}{marker}{body}"),
    );
}

/// Builds the complete grammar for running `machine` on `input`.
///
/// # Arguments
///
/// * `machine` - The validated machine to compile.
/// * `template` - The base template; its rules keep their positions unless overwritten.
/// * `input` - The initial tape content; every character must be a machine symbol.
/// * `format` - The target grammar format.
/// * `options` - Compilation mode and verbose instrumentation.
///
/// # Returns
///
/// * `Ok(Grammar)` holding the template overlaid with the computed rules.
/// * `Err(CompileError::InvalidInputSymbol)` if the input contains a foreign symbol.
/// * `Err(CompileError::MissingTemplateRule)` if the template lacks the dispatcher or the
///   continuation-activation rule.
pub fn assemble(
    machine: &Machine,
    template: Grammar,
    input: &str,
    format: &GrammarFormat,
    options: CompileOptions,
) -> Result<Grammar, CompileError> {
    format.check()?;
    machine.check_input(input)?;

    for required in [&format.dispatcher_rule, &format.activation_rule] {
        if !template.contains(required) {
            return Err(CompileError::MissingTemplateRule(required.clone()));
        }
    }

    let mut grammar = template;
    grammar.insert(&format.init_tape_rule, encode_initial_tape(input, format));
    grammar.insert(&format.init_state_rule, encode_initial_state(machine, format));
    grammar.insert(&format.blank_rule, machine.blank().to_string());

    for &symbol in machine.symbols() {
        grammar.insert(padder_left_name(symbol, format), "");
        grammar.insert(padder_right_name(symbol, format), "");
    }

    for rule in compile(machine, format, options.mode) {
        grammar.insert(rule.name, rule.body);
    }

    if options.verbose {
        debug!("instrumenting grammar for step tracing");
        instrument(&mut grammar, format);
    }

    info!(
        rules = grammar.len(),
        tape = input.chars().count(),
        verbose = options.verbose,
        "assembled grammar"
    );

    Ok(grammar)
}
