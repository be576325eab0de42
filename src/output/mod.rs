//! Console output: result tables and status messaging.
//!
//! Search results are assembled into a [`Table`] keyed by the display
//! labels requested in the query, in request order. Rendering caps the
//! number of printed rows; exports receive the full table.

use colored::Colorize;

use crate::entities::Value;

/// Default cap on rows printed to the console.
pub const DEFAULT_MAX_ROWS: usize = 30;

/// Tabular search result: ordered column labels plus value rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Renders the table as padded columns, truncated to `max_rows`.
    #[must_use]
    pub fn render(&self, max_rows: usize) -> String {
        if self.rows.is_empty() {
            return "Empty result set".to_string();
        }

        let shown = self.rows.len().min(max_rows);
        let mut cells: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
        cells.push(self.columns.clone());
        for row in &self.rows[..shown] {
            cells.push(row.iter().map(ToString::to_string).collect());
        }

        let mut widths = vec![0usize; self.columns.len()];
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for (index, row) in cells.iter().enumerate() {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');

            if index == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                out.push_str(&rule.join("  "));
                out.push('\n');
            }
        }

        if self.rows.len() > shown {
            out.push_str(&format!("... ({} more rows)\n", self.rows.len() - shown));
        }

        out
    }
}

/// Prints a success message in green.
pub fn message(text: &str) {
    println!("{}", text.green());
}

/// Prints a warning in yellow.
pub fn alert(text: &str) {
    eprintln!("{}", text.yellow());
}

/// Prints an error in red.
pub fn error(text: &str) {
    eprintln!("{}", text.red());
}
