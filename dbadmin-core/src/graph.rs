//! Foreign-key relationship diagram as Graphviz DOT

use crate::schema::ForeignKey;

/// Escape a string for use inside a DOT double-quoted id.
fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render `(source table, foreign key)` pairs as a directed graph.
///
/// Each edge reads `"table" -> "referenced" [label="col → ref_col"]`,
/// in input order.
pub fn relationship_graph<'a, I>(edges: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a ForeignKey)>,
{
    let mut out = String::from("digraph {\n");
    for (table, fk) in edges {
        out.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{} → {}\"]\n",
            dot_escape(table),
            dot_escape(&fk.referenced_table),
            dot_escape(&fk.column),
            dot_escape(&fk.referenced_column),
        ));
    }
    out.push_str("}\n");
    out
}
