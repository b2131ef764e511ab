//! Scaffolds for the three generated statements: drop, main flatten query and
//! the text-resolution wrapper. Named placeholders are filled by the builders;
//! every value substituted in has already been through the quoting helpers.

pub(crate) const DROP_TABLE: &str = "DROP TABLE {generated_table}";

pub(crate) const MAIN_FLATTEN: &str = "\
SELECT F.*,
\t{level_columns}
FROM {source_table} F
{join_chain}WHERE F.HIEID = {hieid}";

pub(crate) const CREATE_AS_SELECT: &str = "\
CREATE TABLE {generated_table}
ENGINE = MergeTree ORDER BY NODEID AS
SELECT *, {node_text}
FROM (
\tSELECT h.*,
\t{text_columns}
\tFROM (
{main_query}
\t) h{text_joins}
)";

/// Replace each `{name}` placeholder with its value.
pub(crate) fn fill(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in substitutions {
        rendered = rendered.replace(&format!("{{{}}}", name), value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_named_placeholders() {
        let out = fill("DROP TABLE {generated_table}", &[("generated_table", "\"S\".\"T\"")]);
        assert_eq!(out, "DROP TABLE \"S\".\"T\"");
    }

    #[test]
    fn repeated_placeholders_all_filled() {
        let out = fill("{a} {b} {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x y x");
    }
}
