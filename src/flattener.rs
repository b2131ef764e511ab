//! Orchestration of one flattening run: probe the hierarchy depth, drop the
//! previous generated table, build the generation query and execute it.
//!
//! Every run is a full refresh. There is no incremental state: either the
//! CREATE TABLE AS SELECT completes and the generated table is fully rebuilt,
//! or the run fails with the old table already dropped and the caller re-runs.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::FlattenConfig;
use crate::executor::{execute_with_retry, ExecutorError, SqlExecutor};
use crate::flatten_query_generator::{
    depth_probe_query, FlattenQueryGenerator, FlattenQueryGeneratorError,
};
use crate::hierarchy_catalog::{generated_table_name, HierarchyEntry};
use crate::utils::sql::{qualified, single_line, SqlIdentError};

#[derive(Debug, Error)]
pub enum FlattenerError {
    #[error("hierarchy '{0}' has no rows at depth 1 (empty hierarchy)")]
    EmptyHierarchy(String),
    #[error(transparent)]
    QueryGenerator(#[from] FlattenQueryGeneratorError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("invalid identifier: {0}")]
    Ident(#[from] SqlIdentError),
    #[error("failed to write query side file: {0}")]
    SideFile(#[from] std::io::Error),
}

/// Rebuilds the flattened table for one named hierarchy.
pub struct HierarchyFlattener<'a> {
    hierarchy: String,
    entry: HierarchyEntry,
    generated_schema: String,
    generated_table: String,
    text_table: String,
    language: String,
    side_file_dir: PathBuf,
    executor: &'a dyn SqlExecutor,
}

impl<'a> HierarchyFlattener<'a> {
    pub fn new(
        hierarchy: &str,
        entry: HierarchyEntry,
        config: &FlattenConfig,
        executor: &'a dyn SqlExecutor,
    ) -> Self {
        Self {
            hierarchy: hierarchy.to_string(),
            generated_table: generated_table_name(hierarchy),
            generated_schema: config.generated_schema.clone(),
            text_table: config.text_table.clone(),
            language: config.language.clone(),
            side_file_dir: PathBuf::from("."),
            entry,
            executor,
        }
    }

    /// Directory the resolved-query side file is written to. Defaults to the
    /// working directory.
    pub fn with_side_file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.side_file_dir = dir.into();
        self
    }

    pub fn generated_table(&self) -> &str {
        &self.generated_table
    }

    /// Find the deepest level of the hierarchy by counting rows per depth,
    /// starting at 1 and stopping at the first empty depth. Returns 0 when
    /// depth 1 is already empty. A gap in the depth sequence ends the probe
    /// early; depths past the gap are not visited.
    pub async fn probe_max_depth(&self) -> Result<u32, FlattenerError> {
        let mut max_depth = 0;
        loop {
            let query = depth_probe_query(&self.entry, max_depth + 1)?;
            let rows = self.executor.fetch_count(&query).await?;
            if rows == 0 {
                break;
            }
            max_depth += 1;
        }
        log::debug!("hierarchy {} probed to depth {}", self.hierarchy, max_depth);
        Ok(max_depth)
    }

    /// Drop and recreate the generated table from the current hierarchy rows.
    pub async fn create(&self) -> Result<(), FlattenerError> {
        let max_depth = self.probe_max_depth().await?;
        if max_depth == 0 {
            return Err(FlattenerError::EmptyHierarchy(self.hierarchy.clone()));
        }

        let generator =
            FlattenQueryGenerator::new(&self.entry, &self.text_table, &self.language, max_depth)?;

        self.drop_existing(&generator).await?;

        let query = generator.create_table_query(&self.generated_schema, &self.generated_table)?;
        self.write_side_file(&query)?;

        let message = format!("Table {} has been created.", self.generated_table);
        // Only this statement gets the transient-failure retry; the probes and
        // the drop fail the run directly.
        execute_with_retry(self.executor, &single_line(&query), &message).await?;
        Ok(())
    }

    /// Read back the generated table, optionally limited to the first `limit`
    /// rows, in the requested ClickHouse output format.
    pub async fn fetch_generated(
        &self,
        limit: Option<u64>,
        format: &str,
    ) -> Result<String, FlattenerError> {
        let mut query = format!(
            "SELECT * FROM {}",
            qualified(&self.generated_schema, &self.generated_table)?
        );
        if let Some(n) = limit {
            query.push_str(&format!(" LIMIT {}", n));
        }
        Ok(self.executor.fetch_raw(&query, format).await?)
    }

    async fn drop_existing(
        &self,
        generator: &FlattenQueryGenerator,
    ) -> Result<(), FlattenerError> {
        if self
            .executor
            .table_exists(&self.generated_schema, &self.generated_table)
            .await?
        {
            let query = generator.drop_table_query(&self.generated_schema, &self.generated_table)?;
            self.executor.execute(&query).await?;
            log::info!("Old table {} has been dropped.", self.generated_table);
        } else {
            log::info!(
                "Table {} does not exist, continue to create...",
                self.generated_table
            );
        }
        Ok(())
    }

    /// Write the resolved generation query next to the run for auditing. The
    /// pretty-printed form goes to the file; execution uses the single-line
    /// form.
    fn write_side_file(&self, query: &str) -> Result<PathBuf, FlattenerError> {
        let path = self
            .side_file_dir
            .join(format!("create_{}_query.sql", self.generated_table.to_lowercase()));
        std::fs::write(&path, query)?;
        log::debug!("resolved query written to {}", path.display());
        Ok(path)
    }
}

/// Side-file path a run of `hierarchy` would write inside `dir`.
pub fn side_file_path(dir: &Path, hierarchy: &str) -> PathBuf {
    dir.join(format!(
        "create_{}_query.sql",
        generated_table_name(hierarchy).to_lowercase()
    ))
}
