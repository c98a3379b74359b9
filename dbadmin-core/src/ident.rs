//! PostgreSQL identifier quoting
//!
//! Table and column names come from the live catalog and may carry upper
//! case, accents or spaces, so every identifier in generated SQL is quoted.

/// Quote an identifier, doubling embedded double quotes.
///
/// ```
/// use dbadmin_core::ident::quote_ident;
///
/// assert_eq!(quote_ident("Laboratório"), r#""Laboratório""#);
/// assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Schema-qualified, quoted table reference.
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Comma-joined list of quoted identifiers.
pub fn quote_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_name() {
        assert_eq!(quote_ident("users"), "\"users\"");
    }

    #[test]
    fn keeps_case_and_accents() {
        assert_eq!(quote_ident("nTombamento"), "\"nTombamento\"");
        assert_eq!(quote_ident("prédio"), "\"prédio\"");
    }

    #[test]
    fn qualified_name() {
        assert_eq!(qualified("public", "Docente"), "\"public\".\"Docente\"");
    }

    #[test]
    fn list_joins_in_order() {
        assert_eq!(quote_list(["b", "a"]), "\"b\", \"a\"");
        assert_eq!(quote_list(Vec::<&str>::new()), "");
    }
}
