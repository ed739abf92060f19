//! Text rendering of table schemas and sample rows for the SQL toolkit.

use crate::types::ColumnInfo;

/// Sample values longer than this are cut so one wide column can't flood the prompt.
const MAX_SAMPLE_VALUE_CHARS: usize = 100;

/// Primary key constraint: name and ordered columns.
pub(crate) struct PrimaryKey {
    pub name: String,
    pub columns: Vec<String>,
}

pub(crate) fn render_create_table(
    table: &str,
    columns: &[ColumnInfo],
    primary_key: Option<&PrimaryKey>,
) -> String {
    let mut lines: Vec<String> = columns
        .iter()
        .map(|c| {
            let null = if c.nullable { "" } else { " NOT NULL" };
            format!("\t{} {}{}", c.name, render_type(c), null)
        })
        .collect();
    if let Some(pk) = primary_key.filter(|pk| !pk.columns.is_empty()) {
        lines.push(format!("\tCONSTRAINT {} PRIMARY KEY ({})", pk.name, pk.columns.join(", ")));
    }
    format!("CREATE TABLE {table} (\n{}\n)", lines.join(", \n"))
}

pub(crate) fn render_sample_rows(
    table: &str,
    columns: &[ColumnInfo],
    rows: &[serde_json::Value],
) -> String {
    let header = columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join("\t");
    let body = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| render_value(row.get(&c.name)))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>();

    let mut out = format!("/*\n{} rows from {table} table:\n{header}", rows.len());
    for line in body {
        out.push('\n');
        out.push_str(&line);
    }
    out.push_str("\n*/");
    out
}

fn render_type(column: &ColumnInfo) -> String {
    let base = match column.data_type.as_str() {
        "character varying" => "VARCHAR".to_owned(),
        "character" => "CHAR".to_owned(),
        other => other.to_uppercase(),
    };
    match column.max_length {
        Some(len) if matches!(base.as_str(), "VARCHAR" | "CHAR") => format!("{base}({len})"),
        _ => base,
    }
}

fn render_value(value: Option<&serde_json::Value>) -> String {
    let text = match value {
        None | Some(serde_json::Value::Null) => "NULL".to_owned(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if text.chars().count() > MAX_SAMPLE_VALUE_CHARS {
        text.chars().take(MAX_SAMPLE_VALUE_CHARS).collect()
    } else {
        text
    }
}
