//! SQL generation for flattened hierarchy tables.
//!
//! A hierarchy of maximum depth M flattens into a table with M-1 level
//! columns. The pieces are assembled here: the self-join chain recovering
//! every row's ancestor path, the CASE ladders projecting one ancestor name
//! per level, and the text-resolution wrapper that turns node names into
//! language-dependent labels.

mod errors;
mod join_chain;
mod level_columns;
mod templates;
mod text_resolution;

pub use errors::FlattenQueryGeneratorError;
pub use level_columns::LevelColumn;

use crate::hierarchy_catalog::HierarchyEntry;
use crate::utils::sql::{qualified, quote_literal};

use join_chain::build_join_chain;
use level_columns::build_level_columns;
use text_resolution::{build_node_text_case, build_text_joins, build_text_select};

/// Count query for one depth probe. Probing runs before a generator can be
/// constructed (the generator needs the probed depth), so this stands alone.
pub fn depth_probe_query(
    entry: &HierarchyEntry,
    depth: u32,
) -> Result<String, FlattenQueryGeneratorError> {
    Ok(format!(
        "SELECT count(*) FROM {} WHERE HIEID = {} AND TLEVEL = {}",
        qualified(&entry.schema_name, &entry.table_name)?,
        quote_literal(&entry.hieid),
        depth
    ))
}

/// Generates the main flatten query and the statements around it for one
/// hierarchy instance at a fixed, already-probed maximum depth.
pub struct FlattenQueryGenerator {
    hieid: String,
    /// Quoted, schema-qualified hierarchy source table.
    source_table: String,
    /// Quoted, schema-qualified hierarchy text table.
    text_table: String,
    language: String,
    max_depth: u32,
}

impl FlattenQueryGenerator {
    /// Validates identifiers up front so the query builders are infallible.
    /// A max depth below 2 cannot produce a single level column and is
    /// rejected here rather than emitting a malformed projection.
    pub fn new(
        entry: &HierarchyEntry,
        text_table: &str,
        language: &str,
        max_depth: u32,
    ) -> Result<Self, FlattenQueryGeneratorError> {
        if max_depth < 2 {
            return Err(FlattenQueryGeneratorError::DepthTooShallow(max_depth));
        }
        Ok(Self {
            hieid: entry.hieid.clone(),
            source_table: qualified(&entry.schema_name, &entry.table_name)?,
            text_table: qualified(&entry.schema_name, text_table)?,
            language: language.to_string(),
            max_depth,
        })
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Ordered level columns `L1..L{max_depth - 1}`.
    pub fn level_columns(&self) -> Vec<LevelColumn> {
        build_level_columns(self.max_depth)
    }

    /// The descending LEFT OUTER self-join chain.
    pub fn join_chain(&self) -> String {
        build_join_chain(&self.source_table, self.max_depth)
    }

    /// The main flatten query: base rows plus one resolved ancestor-name
    /// column per level.
    pub fn main_query(&self) -> String {
        let level_columns = self
            .level_columns()
            .iter()
            .map(|column| format!("{} AS {}", column.expression, column.name))
            .collect::<Vec<_>>()
            .join(",\n\t");
        templates::fill(
            templates::MAIN_FLATTEN,
            &[
                ("level_columns", level_columns.as_str()),
                ("source_table", self.source_table.as_str()),
                ("join_chain", self.join_chain().as_str()),
                ("hieid", quote_literal(&self.hieid).as_str()),
            ],
        )
    }

    /// The full CREATE TABLE AS SELECT, wrapping the main query with the text
    /// lookups and the final NODETEXT column.
    pub fn create_table_query(
        &self,
        generated_schema: &str,
        generated_table: &str,
    ) -> Result<String, FlattenQueryGeneratorError> {
        let generated = qualified(generated_schema, generated_table)?;
        Ok(templates::fill(
            templates::CREATE_AS_SELECT,
            &[
                ("generated_table", generated.as_str()),
                ("node_text", build_node_text_case(self.max_depth).as_str()),
                ("text_columns", build_text_select(self.max_depth).as_str()),
                ("main_query", self.main_query().as_str()),
                (
                    "text_joins",
                    build_text_joins(&self.text_table, &self.hieid, &self.language, self.max_depth)
                        .as_str(),
                ),
            ],
        ))
    }

    pub fn drop_table_query(
        &self,
        generated_schema: &str,
        generated_table: &str,
    ) -> Result<String, FlattenQueryGeneratorError> {
        Ok(templates::fill(
            templates::DROP_TABLE,
            &[("generated_table", qualified(generated_schema, generated_table)?.as_str())],
        ))
    }
}
