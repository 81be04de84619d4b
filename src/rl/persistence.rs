//! Q-table persistence
//!
//! Tables are stored as plain text, one visited state per line:
//!
//! ```text
//! <state-key> <q_up> <q_down> <q_left> <q_right>
//! ```
//!
//! Malformed lines are skipped one by one. Reading a missing file and writing
//! to an unwritable path are reported as warnings by the `*_or_*` helpers and
//! never stop a round.

use std::path::Path;

use tracing::{debug, warn};

use super::observation::StateKey;
use super::table::{ActionValues, QTable};
use crate::error::PersistenceError;

/// Parse one table line into a row; `None` for anything malformed
fn parse_line(line: &str) -> Option<(StateKey, ActionValues)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 5 {
        return None;
    }
    let key: StateKey = fields[0].parse().ok()?;
    let mut values = [0.0f32; 4];
    for (slot, field) in values.iter_mut().zip(&fields[1..]) {
        let value: f32 = field.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        *slot = value;
    }
    Some((key, values))
}

/// Parse table text; returns the table and the number of skipped lines
pub fn parse_table(text: &str) -> (QTable, usize) {
    let mut table = QTable::new();
    let mut skipped = 0;
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some((key, values)) => table.insert(key, values),
            None => {
                debug!(line = number + 1, content = line, "skipping malformed table line");
                skipped += 1;
            }
        }
    }
    (table, skipped)
}

/// Render a table in the persisted text format, rows sorted by state key
pub fn format_table(table: &QTable) -> String {
    table
        .sorted_rows()
        .iter()
        .map(|(key, v)| format!("{} {} {} {} {}\n", key, v[0], v[1], v[2], v[3]))
        .collect()
}

/// Read a table file
pub fn read_table(path: &Path) -> Result<QTable, PersistenceError> {
    let text = std::fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (table, skipped) = parse_table(&text);
    if skipped > 0 {
        warn!(?path, skipped, "ignored malformed lines in Q-table");
    }
    Ok(table)
}

/// Write a table file, creating parent directories if needed
pub fn write_table(table: &QTable, path: &Path) -> Result<(), PersistenceError> {
    let write_err = |source: std::io::Error| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, format_table(table)).map_err(write_err)
}

/// Read a table, falling back to an empty one with a warning
pub fn load_or_empty(path: &Path) -> QTable {
    match read_table(path) {
        Ok(table) => table,
        Err(err) => {
            warn!("{err}; starting with an empty Q-table");
            QTable::new()
        }
    }
}

/// Write a table, downgrading failure to a warning. Returns whether it was written.
pub fn save_or_warn(table: &QTable, path: &Path) -> bool {
    match write_table(table, path) {
        Ok(()) => true,
        Err(err) => {
            warn!("{err}; Q-table not saved");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_valid_lines() {
        let text = "1,0 0.5 -1 2.25 0\n-3,4 0 0 0 10\n";
        let (table, skipped) = parse_table(text);
        assert_eq!(skipped, 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&StateKey::new(1, 0)), Some(&[0.5, -1.0, 2.25, 0.0]));
        assert_eq!(table.get(&StateKey::new(-3, 4)), Some(&[0.0, 0.0, 0.0, 10.0]));
    }

    #[test]
    fn test_malformed_lines_are_skipped_individually() {
        let text = "\
1,0 0.5 -1 2.25 0
2,0 0.5 -1 2.25
bad 1 2 3 4
3,0 a 1 2 3
4,0 1 2 3 4 5

5,0 1 NaN 2 3
6,0 1 2 3 4
";
        let (table, skipped) = parse_table(text);
        assert_eq!(skipped, 5);
        assert_eq!(table.len(), 2);
        assert!(table.get(&StateKey::new(1, 0)).is_some());
        assert!(table.get(&StateKey::new(6, 0)).is_some());
    }

    #[test]
    fn test_format_is_sorted_and_parseable() {
        let mut table = QTable::new();
        table.insert(StateKey::new(2, -1), [0.1, 0.2, 0.3, 0.4]);
        table.insert(StateKey::new(-2, 1), [1.0, 2.0, 3.0, 4.0]);

        let text = format_table(&table);
        assert_eq!(text, "-2,1 1 2 3 4\n2,-1 0.1 0.2 0.3 0.4\n");

        let (parsed, skipped) = parse_table(&text);
        assert_eq!(skipped, 0);
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("q.txt");

        let mut table = QTable::new();
        table.insert(StateKey::new(0, 1), [3.5, 0.0, -2.0, 1.0 / 3.0]);
        write_table(&table, &path).unwrap();

        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.txt");

        assert!(matches!(read_table(&path), Err(PersistenceError::Read { .. })));
        assert!(load_or_empty(&path).is_empty());
    }

    #[test]
    fn test_unwritable_path_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be overwritten by a file
        let path = dir.path().to_path_buf();

        let mut table = QTable::new();
        table.row_mut(StateKey::new(1, 1));
        assert!(!save_or_warn(&table, &path));
    }
}
