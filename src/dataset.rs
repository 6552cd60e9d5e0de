use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TallyError};

pub const DELIMITER: u8 = b';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<String>,
}

/// A semicolon-delimited ledger export held column by column, cells as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| TallyError::Load(format!("{}: {e}", path.display())))?;
        let dataset = Self::from_reader(std::io::BufReader::new(file))
            .map_err(|e| match e {
                TallyError::Load(msg) => TallyError::Load(format!("{}: {msg}", path.display())),
                other => other,
            })?;
        debug!(
            "Loaded {} ({} rows, {} columns)",
            path.display(),
            dataset.rows,
            dataset.columns.len()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = rdr
            .headers()
            .map_err(|e| TallyError::Load(e.to_string()))?
            .clone();
        if header.is_empty() || header.iter().all(|h| h.trim().is_empty()) {
            return Err(TallyError::Load("no header row".to_string()));
        }

        let mut columns = header_names(header.iter())
            .into_iter()
            .map(|name| Column {
                name,
                cells: Vec::new(),
            })
            .collect::<Vec<_>>();

        let mut rows = 0usize;
        for result in rdr.records() {
            let record = result.map_err(|e| TallyError::Load(e.to_string()))?;
            if record.len() > columns.len() {
                return Err(TallyError::Load(format!(
                    "line {}: expected {} fields, saw {}",
                    record.position().map_or(0, |p| p.line()),
                    columns.len(),
                    record.len()
                )));
            }
            for (i, col) in columns.iter_mut().enumerate() {
                col.cells.push(record.get(i).unwrap_or("").to_string());
            }
            rows += 1;
        }

        Ok(Self { columns, rows })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look a column up by exact name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TallyError::Column(name.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }
}

/// Blank header cells become `Unnamed: <index>` and repeated names get a
/// `.1`, `.2`, ... suffix so every column stays addressable by name.
fn header_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = raw
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim_start_matches('\u{feff}');
            if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        seen.insert(candidate.clone());
        names.push(candidate);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(content: &str) -> Result<Dataset> {
        Dataset::from_reader(content.as_bytes())
    }

    #[test]
    fn test_load_columns_in_order() {
        let ds = load_str("Dato;Tekst;Beløb\n01/01/2025;Kasse;100,50\n").unwrap();
        assert_eq!(ds.column_names(), vec!["Dato", "Tekst", "Beløb"]);
        assert_eq!(ds.row_count(), 1);
        assert_eq!(ds.column("Beløb").unwrap().cells, vec!["100,50"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, "Dato;Beløb\n01/01/2025;10\n02/01/2025;20\n").unwrap();
        let ds = Dataset::load(&path).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column("Dato").unwrap().cells, vec!["01/01/2025", "02/01/2025"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, TallyError::Load(_)));
    }

    #[test]
    fn test_load_empty_file_has_no_header() {
        let err = load_str("").unwrap_err();
        assert!(matches!(err, TallyError::Load(_)));
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let bytes: &[u8] = b"Dato;Bel\xf8b\n01/01/2025;10\n";
        let err = Dataset::from_reader(bytes).unwrap_err();
        assert!(matches!(err, TallyError::Load(_)));
    }

    #[test]
    fn test_load_rejects_extra_fields() {
        let err = load_str("Dato;Beløb\n01/01/2025;10;oops\n").unwrap_err();
        assert!(err.to_string().contains("expected 2 fields, saw 3"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let ds = load_str("Dato;Tekst;Beløb\n01/01/2025;Kasse\n").unwrap();
        assert_eq!(ds.column("Beløb").unwrap().cells, vec![""]);
    }

    #[test]
    fn test_header_names_blank_and_duplicates() {
        let ds = load_str("Dato;Beløb;Beløb;\n01/01/2025;1;2;\n").unwrap();
        assert_eq!(ds.column_names(), vec!["Dato", "Beløb", "Beløb.1", "Unnamed: 3"]);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let ds = load_str("\u{feff}Dato;Beløb\n01/01/2025;10\n").unwrap();
        assert_eq!(ds.column_names()[0], "Dato");
    }

    #[test]
    fn test_unknown_column() {
        let ds = load_str("Dato;Beløb\n").unwrap();
        let err = ds.column("Amount").unwrap_err();
        assert!(matches!(err, TallyError::Column(ref name) if name == "Amount"));
    }
}
