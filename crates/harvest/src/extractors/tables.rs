// ABOUTME: Table-mode extraction turning matched table elements into header/data rows.
// ABOUTME: Keeps each table's index among all matches even when empty tables are dropped.

use scraper::Html;

use crate::error::HarvestError;
use crate::extractors::basic::parse_base;
use crate::extractors::select::{builtin, compile, element_text};
use crate::result::{TableRecord, TableScrape};

/// Selector used when the caller does not name one.
pub const DEFAULT_TABLE_SELECTOR: &str = "table";

const ROW_SELECTOR: &str = "tr";
const CELL_SELECTOR: &str = "td, th";

/// Extract every table matching `table_selector` from `html`.
///
/// Rows without any `td`/`th` cell are skipped. The first remaining row is the
/// header, the rest are data rows. Tables left with no rows are omitted, but
/// `table_index` still counts them. Returns a NoTables error when the
/// selector matches nothing.
pub fn extract_tables(
    html: &str,
    url: &str,
    table_selector: &str,
) -> Result<TableScrape, HarvestError> {
    parse_base(url, "ExtractTables")?;
    let table_sel = compile(table_selector, url, "ExtractTables")?;
    let row_sel = builtin(ROW_SELECTOR)?;
    let cell_sel = builtin(CELL_SELECTOR)?;

    let doc = Html::parse_document(html);
    let matched: Vec<_> = doc.select(&table_sel).collect();
    if matched.is_empty() {
        return Err(HarvestError::no_tables(url, "ExtractTables"));
    }

    let mut tables = Vec::new();
    for (table_index, table) in matched.iter().enumerate() {
        let mut rows: Vec<Vec<String>> = table
            .select(&row_sel)
            .map(|tr| tr.select(&cell_sel).map(|td| element_text(&td)).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            continue;
        }

        let total_rows = rows.len();
        let data = rows.split_off(1);
        let headers = rows.pop().unwrap_or_default();
        tables.push(TableRecord {
            table_index,
            headers,
            data,
            total_rows,
        });
    }

    Ok(TableScrape {
        url: url.to_string(),
        scraped_at: super::capture_timestamp(),
        tables,
    })
}
