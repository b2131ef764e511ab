//! Chunked bulk transfer with progress reporting.
//!
//! Large loads into and out of ClickHouse go through these helpers so a
//! multi-million-row transfer shows movement instead of a silent stall. One
//! INSERT round trip per block keeps peak memory bounded by the block size.

use std::time::Duration;

use clickhouse::{Client, Row};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{de::DeserializeOwned, Serialize};

use crate::executor::ExecutorError;
use crate::utils::format::format_compact;

fn transfer_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Insert rows in blocks of `chunk_size`, one INSERT per block, and return
/// the number of rows written.
pub async fn insert_in_chunks<T>(
    client: &Client,
    table: &str,
    rows: &[T],
    chunk_size: usize,
) -> Result<u64, ExecutorError>
where
    T: Row + Serialize,
{
    let pb = transfer_bar(rows.len() as u64, &format!("loading {}", table));
    let mut total: u64 = 0;
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut insert = client.insert(table)?;
        for row in chunk {
            insert.write(row).await?;
        }
        insert.end().await?;
        total += chunk.len() as u64;
        pb.inc(chunk.len() as u64);
        log::debug!("{} rows loaded into {}", format_compact(total as f64), table);
    }
    pb.finish_with_message(format!("loaded {} rows", format_compact(total as f64)));
    Ok(total)
}

/// Stream a query's rows into memory, ticking a progress counter while the
/// cursor drains.
pub async fn fetch_with_progress<T>(client: &Client, query: &str) -> Result<Vec<T>, ExecutorError>
where
    T: Row + DeserializeOwned,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos} rows {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut cursor = client.query(query).fetch::<T>()?;
    let mut rows = Vec::new();
    while let Some(row) = cursor.next().await? {
        rows.push(row);
        pb.inc(1);
    }
    pb.finish_with_message(format!("fetched {} rows", format_compact(rows.len() as f64)));
    Ok(rows)
}
