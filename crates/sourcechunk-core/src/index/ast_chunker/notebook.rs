//! Jupyter notebook extraction
//!
//! Non-empty cells are laid end to end, each ending in a newline, and unit
//! lines and offsets refer to that text rather than to the notebook JSON.
//! Code cells go through the Python grammar. Other cells, and code cells
//! without semantic nodes, become one unit per cell.

use super::types::{CellInfo, SemanticUnit, UnitId};
use super::{collect_units, fallback_unit, Extraction, GrammarRegistry};
use serde::Deserialize;
use tracing::{debug, warn};

/// Language tag for `.ipynb` files
pub const NOTEBOOK_LANGUAGE: &str = "ipynb";

/// Kind of the single unit kept when a notebook yields nothing else
pub const NOTEBOOK_FILE_KIND: &str = "notebook_file";

const CODE_CELL_LANGUAGE: &str = "python";

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat allows either one string or a list of lines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn into_text(self) -> String {
        match self {
            CellSource::Text(text) => text,
            CellSource::Lines(lines) => lines.concat(),
        }
    }
}

/// Running position of the next cell in the laid-out text
struct Cursor {
    line: usize,
    offset: usize,
}

pub(super) fn extract(registry: &GrammarRegistry, file_path: &str, source: &[u8]) -> Extraction {
    let notebook: Notebook = match serde_json::from_slice(source) {
        Ok(nb) => nb,
        Err(e) => {
            warn!(path = %file_path, error = %e, "Unreadable notebook, using file-level unit");
            return Extraction {
                units: vec![notebook_file_unit(file_path, source)],
                fallback: Some(format!("invalid notebook: {}", e)),
            };
        }
    };

    let mut units = Vec::new();
    let mut cursor = Cursor { line: 1, offset: 0 };

    for (index, cell) in notebook.cells.into_iter().enumerate() {
        let text = cell.source.into_text();
        if text.trim().is_empty() {
            continue;
        }
        let info = CellInfo {
            cell_index: index,
            cell_type: cell.cell_type,
        };

        let mut cell_units = if info.cell_type == "code" {
            code_cell_units(registry, file_path, &text, &info)
        } else {
            Vec::new()
        };
        if cell_units.is_empty() {
            cell_units.push(cell_unit(file_path, &text, &info));
        }

        for unit in &mut cell_units {
            unit.start_line += cursor.line - 1;
            unit.end_line += cursor.line - 1;
            unit.start_offset += cursor.offset;
            unit.end_offset += cursor.offset;
        }
        units.extend(cell_units);

        cursor.line += text.matches('\n').count();
        cursor.offset += text.len();
        if !text.ends_with('\n') {
            cursor.line += 1;
            cursor.offset += 1;
        }
    }

    if units.is_empty() {
        debug!(path = %file_path, "Notebook has no content cells, using file-level unit");
        units.push(notebook_file_unit(file_path, source));
    }

    debug!(path = %file_path, units = units.len(), "Extracted notebook units");
    Extraction {
        units,
        fallback: None,
    }
}

/// Units of one code cell, positioned relative to the cell
fn code_cell_units(
    registry: &GrammarRegistry,
    file_path: &str,
    text: &str,
    info: &CellInfo,
) -> Vec<SemanticUnit> {
    let grammar = match registry.get(CODE_CELL_LANGUAGE) {
        Some(g) => g,
        None => return Vec::new(),
    };
    let tree = match grammar.parser().parse(text.as_bytes()) {
        Ok(tree) => tree,
        Err(e) => {
            debug!(path = %file_path, cell = info.cell_index, error = %e, "Cell parse failed");
            return Vec::new();
        }
    };

    let mut units = collect_units(&tree, &grammar, file_path, text.as_bytes());
    for unit in &mut units {
        unit.name = format!("cell_{}:{}", info.cell_index + 1, unit.name);
        unit.language = NOTEBOOK_LANGUAGE.to_string();
        unit.cell = Some(info.clone());
    }
    units
}

fn cell_unit(file_path: &str, text: &str, info: &CellInfo) -> SemanticUnit {
    SemanticUnit {
        id: UnitId::new(),
        kind: format!("notebook_{}_cell", info.cell_type),
        name: format!("cell_{}", info.cell_index + 1),
        raw_text: text.to_string(),
        file_path: file_path.to_string(),
        language: NOTEBOOK_LANGUAGE.to_string(),
        start_line: 1,
        end_line: text.lines().count().max(1),
        start_offset: 0,
        end_offset: text.len(),
        is_container: false,
        parent_id: None,
        child_ids: Vec::new(),
        cell: Some(info.clone()),
    }
}

fn notebook_file_unit(file_path: &str, source: &[u8]) -> SemanticUnit {
    let mut unit = fallback_unit(file_path, NOTEBOOK_LANGUAGE, source);
    unit.kind = NOTEBOOK_FILE_KIND.to_string();
    unit
}
