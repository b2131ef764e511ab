//! Locale text lookup around the flattened level columns.
//!
//! Each `L{level}` column is matched against the hierarchy text table
//! (filtered to the hierarchy instance and one language key) and projected as
//! `T{level}`. Because inapplicable levels carry the blank sentinel rather
//! than NULL, their lookup simply fails to match and `T{level}` comes back
//! NULL without any NULL-comparison ambiguity in the join condition.

use crate::utils::sql::quote_literal;

/// Projection list for the resolved text columns: `T1.T AS T1, ...`.
pub(crate) fn build_text_select(max_depth: u32) -> String {
    (1..max_depth)
        .map(|level| format!("T{}.T AS T{}", level, level))
        .collect::<Vec<_>>()
        .join(",\n\t")
}

/// One LEFT JOIN per level against the language-filtered text table.
/// `text_table` must already be a quoted, schema-qualified reference.
pub(crate) fn build_text_joins(
    text_table: &str,
    hieid: &str,
    language: &str,
    max_depth: u32,
) -> String {
    let hieid = quote_literal(hieid);
    let language = quote_literal(language);
    let mut joins = String::new();
    for level in 1..max_depth {
        joins.push_str(&format!(
            "\n\tLEFT JOIN (SELECT NODENAME, TXTLG AS T FROM {} WHERE HIEID = {} AND LANGU = {}) T{} ON T{}.NODENAME = h.L{}",
            text_table, hieid, language, level, level, level
        ));
    }
    joins
}

/// The final NODETEXT expression. A pre-existing NODE_TEXT value wins; when it
/// is NULL the row's own depth (two-digit, zero-padded) picks the resolved
/// text of the level just above it, and depths with no matching arm (the root,
/// or anything past the probed maximum) resolve to NULL.
pub(crate) fn build_node_text_case(max_depth: u32) -> String {
    let mut case = String::from("CASE WHEN NODE_TEXT IS NULL THEN CASE\n");
    for depth in 2..=max_depth {
        case.push_str(&format!(
            "\t\tWHEN TLEVEL = '{:02}' THEN T{}\n",
            depth,
            depth - 1
        ));
    }
    case.push_str("\t\tELSE NULL END\n\tELSE NODE_TEXT END AS NODETEXT");
    case
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_select_lists_one_column_per_level() {
        assert_eq!(build_text_select(3), "T1.T AS T1,\n\tT2.T AS T2");
    }

    #[test]
    fn text_joins_filter_language_and_hierarchy() {
        let joins = build_text_joins("\"BW\".\"RSTHIERNODE\"", "H-42", "E", 3);
        let lines: Vec<&str> = joins.trim().lines().map(str::trim).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "LEFT JOIN (SELECT NODENAME, TXTLG AS T FROM \"BW\".\"RSTHIERNODE\" WHERE HIEID = 'H-42' AND LANGU = 'E') T1 ON T1.NODENAME = h.L1"
        );
        assert!(lines[1].contains("T2 ON T2.NODENAME = h.L2"));
    }

    #[test]
    fn text_join_literals_are_escaped() {
        let joins = build_text_joins("\"BW\".\"RSTHIERNODE\"", "it's", "E", 2);
        assert!(joins.contains("HIEID = 'it''s'"));
    }

    #[test]
    fn node_text_switches_on_padded_depth() {
        let case = build_node_text_case(3);
        assert_eq!(
            case,
            "CASE WHEN NODE_TEXT IS NULL THEN CASE\n\
             \t\tWHEN TLEVEL = '02' THEN T1\n\
             \t\tWHEN TLEVEL = '03' THEN T2\n\
             \t\tELSE NULL END\n\
             \tELSE NODE_TEXT END AS NODETEXT"
        );
    }

    #[test]
    fn node_text_padding_stops_at_two_digits() {
        let case = build_node_text_case(11);
        assert!(case.contains("WHEN TLEVEL = '09' THEN T8"));
        assert!(case.contains("WHEN TLEVEL = '10' THEN T9"));
        assert!(case.contains("WHEN TLEVEL = '11' THEN T10"));
    }

    #[test]
    fn existing_node_text_wins_over_fallback() {
        let case = build_node_text_case(4);
        assert!(case.starts_with("CASE WHEN NODE_TEXT IS NULL THEN"));
        assert!(case.ends_with("ELSE NODE_TEXT END AS NODETEXT"));
    }
}
