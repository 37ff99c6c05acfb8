//! ASCII table formatting for the one-shot snapshot command.

use prettytable::{format, Cell, Row, Table};

use crate::core::item::{ItemColumns, ProcessItem};
use crate::utils::format::truncate;

const MAX_NAME_CHARS: usize = 32;

/// Format process items as an ASCII table, one row per process.
pub fn format_process_table(items: &[ProcessItem]) -> String {
    if items.is_empty() {
        return "No processes found.".to_string();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        ItemColumns::HEADERS.iter().map(|title| Cell::new(title)).collect(),
    ));

    for item in items {
        let cells = item.columns.cells();
        let mut row: Vec<Cell> = Vec::with_capacity(cells.len());
        for (index, value) in cells.iter().enumerate() {
            let cell = if index == 1 {
                Cell::new(&truncate(value, MAX_NAME_CHARS))
            } else if index == 0 || index == 5 {
                Cell::new(value).style_spec("r")
            } else {
                Cell::new(value)
            };
            row.push(cell);
        }
        table.add_row(Row::new(row));
    }

    table.to_string()
}
