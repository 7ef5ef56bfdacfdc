use crate::domain::model::Table;
use crate::utils::error::{EtlError, Result};

/// Checks that every required column is present before any row is read.
/// Returns the table untouched, or the first missing column.
pub fn validate_columns<'a>(table: &'a Table, required: &[&str]) -> Result<&'a Table> {
    if let Some(missing) = required.iter().find(|column| !table.has_column(column)) {
        return Err(EtlError::MissingColumn {
            column: missing.to_string(),
        });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_columns_present() {
        let table = Table::new(
            vec!["Name".into(), "Lineitem quantity".into(), "Lineitem sku".into()],
            vec![],
        );
        let validated =
            validate_columns(&table, &["Name", "Lineitem quantity", "Lineitem sku"]).unwrap();
        assert_eq!(validated, &table);
    }

    #[test]
    fn test_reports_first_missing_column() {
        let table = Table::new(vec!["Name".into(), "Lineitem quantity".into()], vec![]);
        let err = validate_columns(
            &table,
            &["Name", "Lineitem sku", "Lineitem quantity", "Fulfilled at"],
        )
        .unwrap_err();
        match err {
            EtlError::MissingColumn { column } => assert_eq!(column, "Lineitem sku"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
