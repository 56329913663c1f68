//! This crate compiles deterministic Turing machines into Tracery grammars.
//! It includes modules for loading and validating machine descriptions, compiling their
//! transition tables into rewrite rules, and assembling the rules onto a base template.

pub mod assembler;
pub mod compiler;
pub mod config;
pub mod grammar;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod types;
pub mod validator;

/// Re-exports the assembly entry points from the assembler module.
pub use assembler::{assemble, encode_initial_tape, instrument};
/// Re-exports the transition compiler from the compiler module.
pub use compiler::{compile, rule_name, CompiledRule};
/// Re-exports the run configuration from the config module.
pub use config::{CompileOptions, GrammarFormat, Mode};
/// Re-exports the ordered rule container from the grammar module.
pub use grammar::Grammar;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the validated `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports `MachineInfo`, `ProgramManager`, and `BASE_TEMPLATE` from the programs module.
pub use programs::{MachineInfo, ProgramManager, BASE_TEMPLATE};
/// Re-exports the machine model and error types from the types module.
pub use types::{
    Action, CompileError, Direction, MachineDescription, StateSymbol, TransitionEntry,
    TransitionFunction, ValidationError, ValidationErrors,
};
/// Re-exports the `validate` function from the validator module.
pub use validator::validate;
