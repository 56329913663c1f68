//! This module provides the `ProgramLoader` struct, responsible for reading machine
//! descriptions, base templates, input tapes and format overrides, and for writing the
//! compiled grammar back out.

use crate::config::GrammarFormat;
use crate::grammar::Grammar;
use crate::types::{CompileError, MachineDescription};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The suffix appended to a machine path to derive the default output path.
pub const OUTPUT_SUFFIX: &str = ".tracery.json";

/// `ProgramLoader` is a utility struct for the compiler's file I/O.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a machine description from the specified `.json` file.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDescription)` if the file is read and parsed.
    /// * `Err(CompileError::FileError)` if the file cannot be read.
    /// * `Err(CompileError::ParseError)` if the content is not a machine description.
    pub fn load_machine(path: &Path) -> Result<MachineDescription, CompileError> {
        let content = read(path)?;
        Self::load_machine_from_string(&content).map_err(|e| match e {
            CompileError::ParseError(msg) => {
                CompileError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parses a machine description from JSON text.
    pub fn load_machine_from_string(content: &str) -> Result<MachineDescription, CompileError> {
        serde_json::from_str(content)
            .map_err(|e| CompileError::ParseError(format!("Invalid machine description: {}", e)))
    }

    /// Loads a base template from the specified file.
    pub fn load_template(path: &Path) -> Result<Grammar, CompileError> {
        let content = read(path)?;
        Self::load_template_from_string(&content).map_err(|e| match e {
            CompileError::ParseError(msg) => {
                CompileError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parses a base template from JSON text. Rule order is preserved.
    pub fn load_template_from_string(content: &str) -> Result<Grammar, CompileError> {
        serde_json::from_str(content)
            .map_err(|e| CompileError::ParseError(format!("Invalid grammar template: {}", e)))
    }

    /// Loads a grammar format override. Fields missing from the file keep their defaults.
    pub fn load_format(path: &Path) -> Result<GrammarFormat, CompileError> {
        let content = read(path)?;
        serde_json::from_str(&content).map_err(|e| {
            CompileError::ParseError(format!(
                "Invalid grammar format in {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Loads an input tape, stripping a single trailing line ending.
    pub fn load_input(path: &Path) -> Result<String, CompileError> {
        let content = read(path)?;
        Ok(strip_line_ending(&content).to_string())
    }

    /// Writes `grammar` as tab-indented JSON, creating or truncating `path`.
    pub fn write_grammar(path: &Path, grammar: &Grammar) -> Result<(), CompileError> {
        let json = grammar.to_json_pretty()?;
        fs::write(path, json).map_err(|e| {
            CompileError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), rules = grammar.len(), "wrote grammar");
        Ok(())
    }

    /// Derives the default output path: the machine path with [`OUTPUT_SUFFIX`] appended.
    pub fn default_output_path(machine: &Path) -> PathBuf {
        let mut path = machine.as_os_str().to_owned();
        path.push(OUTPUT_SUFFIX);
        PathBuf::from(path)
    }

    /// Loads every machine description (`.json` extension) in a directory.
    ///
    /// Directories, non-`.json` files and previously compiled grammars are skipped.
    pub fn load_machines(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, MachineDescription), CompileError>> {
        if !directory.exists() {
            return vec![Err(CompileError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(CompileError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(CompileError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();
                let is_output = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(OUTPUT_SUFFIX));

                if path.is_dir() || is_output || path.extension().is_none_or(|ext| ext != "json")
                {
                    return None;
                }

                Some(Self::load_machine(&path).map(|description| (path, description)))
            })
            .collect();

        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

fn read(path: &Path) -> Result<String, CompileError> {
    fs::read_to_string(path).map_err(|e| {
        CompileError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}

fn strip_line_ending(content: &str) -> &str {
    content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(content)
}
