//! CASE ladders projecting one ancestor-name column per hierarchy level.
//!
//! Column `Lc` holds, for every base row deep enough to have an ancestor at
//! level c, that ancestor's NODENAME. The ladder switches on the base row's
//! own depth: a row at depth d finds its level-c ancestor in join alias
//! `H{M-d+c}` (the chain is numbered from the far end, so the right alias
//! shifts with the row's depth). Rows at depth c or shallower fall through to
//! a single-space sentinel. The sentinel is deliberately not NULL and not
//! empty: it marks "level does not apply to this row" and keeps the text
//! lookup join from matching, which in turn leaves `T{c}` NULL downstream.

/// One generated output column: name (`L1`, `L2`, ...) and the CASE
/// expression resolving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelColumn {
    pub name: String,
    pub expression: String,
}

/// Build the ordered column list `L1..L{max_depth - 1}`.
pub(crate) fn build_level_columns(max_depth: u32) -> Vec<LevelColumn> {
    let mut columns = Vec::new();
    for col_level in 1..max_depth {
        let mut expression = String::from("(CASE F.TLEVEL\n");
        for depth in (col_level + 1..=max_depth).rev() {
            let alias = max_depth - depth + col_level;
            expression.push_str(&format!("\t\tWHEN {} THEN H{}.NODENAME\n", depth, alias));
        }
        expression.push_str("\tELSE ' ' END)");
        columns.push(LevelColumn {
            name: format!("L{}", col_level),
            expression,
        });
    }
    columns
}
