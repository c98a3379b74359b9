//! Plain-text rendering for terminal output

use crate::resultset::ResultSet;
use crate::schema::TableSchema;

const NULL_CELL: &str = "NULL";

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    let fill = w.saturating_sub(width(s));
    format!("{}{}", s, " ".repeat(fill))
}

/// Render a grid with a header rule:
///
/// ```text
/// id | nome
/// ---+------
/// 1  | Ana
/// ```
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(width(cell));
        }
    }

    let line = |cells: &[String]| {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| pad(cells.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_owned()
    };

    let mut out = String::new();
    out.push_str(&line(headers));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Render query results; NULL cells print as `NULL`.
pub fn render_table(rows: &ResultSet) -> String {
    let cells: Vec<Vec<String>> = rows
        .rows
        .iter()
        .map(|r| {
            r.iter()
                .map(|c| c.clone().unwrap_or_else(|| NULL_CELL.to_owned()))
                .collect()
        })
        .collect();
    render_grid(&rows.columns, &cells)
}

/// Column table followed by the primary and foreign keys.
pub fn render_schema(schema: &TableSchema) -> String {
    let headers: Vec<String> = ["Column", "Type", "Nullable", "Max length"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = schema
        .columns
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.data_type.clone(),
                if c.is_nullable { "YES" } else { "NO" }.to_owned(),
                c.character_maximum_length
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let mut out = render_grid(&headers, &rows);
    out.push('\n');

    if schema.has_primary_key() {
        out.push_str(&format!("Primary key: {}\n", schema.primary_key.join(", ")));
    } else {
        out.push_str("No primary key defined.\n");
    }

    if schema.foreign_keys.is_empty() {
        out.push_str("No foreign keys.\n");
    } else {
        out.push_str("Foreign keys:\n");
        for fk in &schema.foreign_keys {
            out.push_str(&format!(
                "  - {} → {}({})\n",
                fk.column, fk.referenced_table, fk.referenced_column
            ));
        }
    }
    out
}
