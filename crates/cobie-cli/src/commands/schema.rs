//! `cobie schema` command implementation
//!
//! Lists the registered sheet kinds, or the columns of one of them.

use crate::error::{CliError, Result};
use cobie_federate::{Reference, SheetKind, SheetSchema};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

pub fn run(sheet: Option<&str>) -> Result<()> {
    match sheet {
        None => list_sheets(),
        Some(name) => {
            let kind = SheetKind::from_name(name)
                .ok_or_else(|| CliError::UnknownSheet(name.to_string()))?;
            show_sheet(kind.schema());
        }
    }
    Ok(())
}

fn list_sheets() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Sheet", "Columns", "Key", "Merge policy"]);

    for kind in SheetKind::ALL {
        let schema = kind.schema();
        let key = schema
            .key_column()
            .map(|index| schema.columns[index].name)
            .unwrap_or("-");
        table.add_row(vec![
            kind.name().to_string(),
            schema.column_count().to_string(),
            key.to_string(),
            policy(&schema).to_string(),
        ]);
    }
    println!("{}", table);
}

fn show_sheet(schema: SheetSchema) {
    println!(
        "{} ({})",
        schema.name().cyan().bold(),
        policy(&schema)
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Column", "Type", "Key", "Required", "References", "Fingerprint"]);

    for column in schema.columns {
        let references = match column.reference {
            Reference::None => String::new(),
            Reference::Sheet(kind) => kind.name().to_string(),
            Reference::RowOf(sheet_column) => format!("row of sheet in {}", sheet_column),
        };
        table.add_row(vec![
            column.name.to_string(),
            format!("{:?}", column.column_type),
            yes(column.primary),
            yes(column.required),
            references,
            yes(column.significant),
        ]);
    }
    println!("{}", table);
}

fn policy(schema: &SheetSchema) -> &'static str {
    if schema.dedup_exempt {
        "no dedup"
    } else if schema.single_copy_only {
        "first source only"
    } else {
        "dedup"
    }
}

fn yes(flag: bool) -> String {
    let text = if flag { "yes" } else { "" };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_names() {
        assert_eq!(policy(&SheetKind::Coordinate.schema()), "no dedup");
        assert_eq!(policy(&SheetKind::PickLists.schema()), "first source only");
        assert_eq!(policy(&SheetKind::Floor.schema()), "dedup");
    }

    #[test]
    fn test_unknown_sheet() {
        assert!(matches!(run(Some("Widgets")), Err(CliError::UnknownSheet(_))));
        assert!(run(Some("floor")).is_ok());
    }
}
