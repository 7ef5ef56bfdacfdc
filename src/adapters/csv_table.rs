use crate::domain::model::Table;
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Parses comma-separated text with a header row into a [`Table`].
///
/// Short rows are allowed and read as empty trailing cells, as spreadsheet
/// exports often drop them.
pub fn parse_table(data: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(EtlError::MalformedInput {
            message: "the input contains no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!("Parsed {} rows with {} columns", rows.len(), headers.len());
    Ok(Table::new(headers, rows))
}

/// Reads the whole file, closing it before parsing starts.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EtlError::SourceNotFound {
            path: path.display().to_string(),
        },
        _ => EtlError::IoError(e),
    })?;
    parse_table(&data)
}

fn malformed(e: csv::Error) -> EtlError {
    EtlError::MalformedInput {
        message: format!("could not parse the input as CSV ({})", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_table() {
        let data = b"Name,Lineitem quantity,Lineitem sku\n#1,2,SKU-A\n#2,1,\n";
        let table = parse_table(data).unwrap();
        assert_eq!(table.headers, vec!["Name", "Lineitem quantity", "Lineitem sku"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1], vec!["#2", "1", ""]);
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let data = "\u{feff}Name,Lineitem sku\n#1,A\n".as_bytes();
        let table = parse_table(data).unwrap();
        assert!(table.has_column("Name"));
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let data = b"Name,Lineitem name\n#1,\"Mug, large\"\n";
        let table = parse_table(data).unwrap();
        assert_eq!(table.rows[0][1], "Mug, large");
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = parse_table(b"").unwrap_err();
        assert!(matches!(err, EtlError::MalformedInput { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let data = b"Name,Lineitem sku\n#1,\xff\xfe\n";
        let err = parse_table(data).unwrap_err();
        assert!(matches!(err, EtlError::MalformedInput { .. }));
    }

    #[test]
    fn test_read_table_missing_file() {
        let err = read_table("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, EtlError::SourceNotFound { .. }));
    }

    #[test]
    fn test_read_table_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Name,Lineitem sku\n#1,A\n").unwrap();
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.row_count(), 1);
    }
}
