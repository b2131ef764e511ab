//! Self-join chain recovering the ancestor path of every hierarchy row.
//!
//! For a hierarchy of maximum depth M the base row set (alias `F`) is joined
//! against the source table M-1 times. Alias `H{M-1}` attaches the parent of
//! the base row, `H{M-2}` the grandparent, down to `H1` holding the ancestor
//! furthest from `F`. Each join walks one PARENTID hop from the previous
//! alias, scoped to the same hierarchy instance. LEFT OUTER semantics keep
//! rows whose ancestor chain ends before the deepest level.

/// Emit the join chain for `max_depth` levels. `source_table` must already be
/// a quoted, schema-qualified reference. Requires `max_depth >= 2`, which the
/// generator enforces at construction.
pub(crate) fn build_join_chain(source_table: &str, max_depth: u32) -> String {
    let mut joins = String::new();
    for level in (1..max_depth).rev() {
        let previous = if level == max_depth - 1 {
            "F".to_string()
        } else {
            format!("H{}", level + 1)
        };
        joins.push_str(&format!(
            "\tLEFT OUTER JOIN {} H{} ON H{}.NODEID = {}.PARENTID AND H{}.HIEID = F.HIEID\n",
            source_table, level, level, previous, level
        ));
    }
    joins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_three_walks_parent_then_grandparent() {
        let joins = build_join_chain("\"BW\".\"HIER\"", 3);
        let lines: Vec<&str> = joins.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].trim(),
            "LEFT OUTER JOIN \"BW\".\"HIER\" H2 ON H2.NODEID = F.PARENTID AND H2.HIEID = F.HIEID"
        );
        assert_eq!(
            lines[1].trim(),
            "LEFT OUTER JOIN \"BW\".\"HIER\" H1 ON H1.NODEID = H2.PARENTID AND H1.HIEID = F.HIEID"
        );
    }

    #[test]
    fn depth_two_joins_once_off_the_base_rows() {
        let joins = build_join_chain("\"BW\".\"HIER\"", 2);
        let lines: Vec<&str> = joins.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("H1 ON H1.NODEID = F.PARENTID"));
    }

    #[test]
    fn aliases_descend_from_parent_to_root() {
        let joins = build_join_chain("\"BW\".\"HIER\"", 5);
        let lines: Vec<&str> = joins.lines().collect();
        assert_eq!(lines.len(), 4);
        // First join hangs off F, every later join off the previous alias.
        assert!(lines[0].contains("H4 ON H4.NODEID = F.PARENTID"));
        assert!(lines[1].contains("H3 ON H3.NODEID = H4.PARENTID"));
        assert!(lines[2].contains("H2 ON H2.NODEID = H3.PARENTID"));
        assert!(lines[3].contains("H1 ON H1.NODEID = H2.PARENTID"));
    }
}
