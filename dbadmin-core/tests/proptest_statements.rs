use dbadmin_core::ident::quote_ident;
use dbadmin_core::statement::{build_insert, build_update, TableRef};
use dbadmin_core::ColumnInfo;
use proptest::prelude::*;

fn column(name: &str) -> ColumnInfo {
    ColumnInfo {
        name: name.to_owned(),
        data_type: "text".into(),
        is_nullable: true,
        udt_name: "text".into(),
        character_maximum_length: None,
        column_default: None,
        ordinal_position: 0,
    }
}

// Distinct column names with case, accents and spaces, but no commas,
// parentheses or quotes so the generated list can be split back apart
fn arb_columns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-zA-Zéçã_][a-zA-Z0-9éçã_ ]{0,12}", 1..12)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Numbers of every `$n` placeholder, in textual order
fn placeholders(sql: &str) -> Vec<usize> {
    let mut out = Vec::new();
    for (i, _) in sql.match_indices('$') {
        let digits: String = sql[i + 1..].chars().take_while(|d| d.is_ascii_digit()).collect();
        if !digits.is_empty() {
            out.push(digits.parse().unwrap());
        }
    }
    out
}

fn unquote(q: &str) -> String {
    q[1..q.len() - 1].replace("\"\"", "\"")
}

proptest! {
    /// Property: quoting round-trips any identifier
    #[test]
    fn prop_quote_ident_round_trips(name in ".*") {
        let quoted = quote_ident(&name);
        prop_assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        prop_assert_eq!(unquote(&quoted), name);
    }

    /// Property: INSERT lists every column once, quoted, in the given order,
    /// with placeholders 1..n
    #[test]
    fn prop_insert_references_each_column_once(names in arb_columns()) {
        let cols: Vec<ColumnInfo> = names.iter().map(|n| column(n)).collect();
        let refs: Vec<&ColumnInfo> = cols.iter().collect();
        let stmt = build_insert(TableRef::new("t"), &refs);

        let start = stmt.sql.find(" (").unwrap() + 2;
        let end = stmt.sql.find(") VALUES").unwrap();
        let listed: Vec<String> = stmt.sql[start..end]
            .split(", ")
            .map(unquote)
            .collect();

        prop_assert_eq!(&listed, &names);
        prop_assert_eq!(&stmt.bind_columns, &names);
        prop_assert_eq!(placeholders(&stmt.sql), (1..=names.len()).collect::<Vec<_>>());
    }

    /// Property: UPDATE binds non-key columns in declared order, then keys,
    /// each exactly once
    #[test]
    fn prop_update_binding_order(names in arb_columns(), key_count in 1usize..4) {
        prop_assume!(names.len() > key_count);
        let cols: Vec<ColumnInfo> = names.iter().map(|n| column(n)).collect();
        let refs: Vec<&ColumnInfo> = cols.iter().collect();
        let keys: Vec<&ColumnInfo> = refs[..key_count].to_vec();

        let stmt = build_update(TableRef::new("t"), &refs, &keys).unwrap();

        let mut expected: Vec<String> = names[key_count..].to_vec();
        expected.extend(names[..key_count].iter().cloned());
        prop_assert_eq!(&stmt.bind_columns, &expected);
        prop_assert_eq!(placeholders(&stmt.sql), (1..=names.len()).collect::<Vec<_>>());

        for name in &names {
            let needle = format!("{} = $", quote_ident(name));
            prop_assert_eq!(stmt.sql.matches(&needle).count(), 1);
        }
    }
}
