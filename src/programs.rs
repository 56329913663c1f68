use crate::grammar::Grammar;
use crate::loader::ProgramLoader;
use crate::types::{CompileError, MachineDescription};

// Default embedded machines, by name
const MACHINE_TEXTS: [(&str, &str); 3] = [
    (
        "binary-increment",
        include_str!("../machines/binary-increment.json"),
    ),
    ("bit-flip", include_str!("../machines/bit-flip.json")),
    (
        "unary-increment",
        include_str!("../machines/unary-increment.json"),
    ),
];

/// The base template the compiled rules are overlaid on when none is given.
pub const BASE_TEMPLATE: &str = include_str!("../templates/tmtracery.json");

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available machines
    pub fn get_machine_count() -> usize {
        MACHINE_TEXTS.len()
    }

    /// Get a machine description by its index
    pub fn get_machine_by_index(index: usize) -> Result<MachineDescription, CompileError> {
        let (_, text) = MACHINE_TEXTS.get(index).ok_or_else(|| {
            CompileError::FileError(format!("Machine index {} out of range", index))
        })?;

        ProgramLoader::load_machine_from_string(text)
    }

    /// Get a machine description by its name
    pub fn get_machine_by_name(name: &str) -> Result<MachineDescription, CompileError> {
        let index = MACHINE_TEXTS
            .iter()
            .position(|(machine, _)| *machine == name)
            .ok_or_else(|| CompileError::FileError(format!("Machine '{}' not found", name)))?;

        Self::get_machine_by_index(index)
    }

    /// List all machine names
    pub fn list_machine_names() -> Vec<&'static str> {
        MACHINE_TEXTS.iter().map(|(name, _)| *name).collect()
    }

    /// Get information about a machine by its index
    pub fn get_machine_info(index: usize) -> Result<MachineInfo, CompileError> {
        let description = Self::get_machine_by_index(index)?;

        Ok(MachineInfo {
            index,
            name: MACHINE_TEXTS[index].0,
            start_state: description.start_state,
            state_count: description.states.len(),
            symbol_count: description.symbols.len(),
            transition_count: description.delta.len(),
        })
    }

    /// Get the original text of a machine by its index
    pub fn get_machine_text_by_index(index: usize) -> Result<&'static str, CompileError> {
        MACHINE_TEXTS
            .get(index)
            .map(|(_, text)| *text)
            .ok_or_else(|| {
                CompileError::FileError(format!("Machine text index {} out of range", index))
            })
    }

    /// Parse the embedded base template
    pub fn base_template() -> Result<Grammar, CompileError> {
        ProgramLoader::load_template_from_string(BASE_TEMPLATE)
    }
}

#[derive(Debug, Clone)]
pub struct MachineInfo {
    pub index: usize,
    pub name: &'static str,
    pub start_state: String,
    pub state_count: usize,
    pub symbol_count: usize,
    pub transition_count: usize,
}
