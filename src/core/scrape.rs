use crate::core::{Pipeline, ScrapeOptions, ScrapeResult, ScrapedTable, Storage};
use crate::domain::model::FormulaRow;
use crate::utils::error::{Result, ToolError};
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub const FORMULA_COLUMN: &str = "Chemical formula";
pub const SYNONYMS_COLUMN: &str = "Synonyms";

/// Fetches an HTML page, pulls the `(Chemical formula, Synonyms)` columns
/// out of every table that has them, and writes the rows as unheaded CSV.
pub struct FormulaPipeline<S: Storage, O: ScrapeOptions> {
    storage: S,
    options: O,
    client: Client,
}

impl<S: Storage, O: ScrapeOptions> FormulaPipeline<S, O> {
    pub fn new(storage: S, options: O) -> Self {
        Self {
            storage,
            options,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent(concat!("dsa-tools/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

static FOOTNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Concatenated text content of a cell, with whitespace runs collapsed to
/// single spaces. Text nodes are joined without separators so markup-split
/// content like `CH<sub>4</sub>` stays `CH4`.
fn cell_text(cell: ElementRef) -> String {
    let text: String = cell.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Header comparison ignores bracketed footnote markers like `[1]` or `[a]`.
fn normalize_header(header: &str) -> String {
    let stripped = FOOTNOTE_RE.replace_all(header, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| normalize_header(h) == name)
}

/// Every `<table>` in the document, as a header row plus data rows of text.
pub fn parse_tables(html: &str) -> Vec<ScrapedTable> {
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    let document = Html::parse_document(html);
    let mut tables = Vec::new();

    for table in document.select(&table_sel) {
        let mut rows = table.select(&row_sel);
        let Some(header_row) = rows.next() else {
            continue;
        };
        let headers: Vec<String> = header_row.select(&cell_sel).map(cell_text).collect();
        let data: Vec<Vec<String>> = rows
            .map(|row| row.select(&cell_sel).map(cell_text).collect())
            .collect();
        tables.push(ScrapedTable {
            headers,
            rows: data,
        });
    }

    tables
}

#[async_trait::async_trait]
impl<S: Storage, O: ScrapeOptions> Pipeline for FormulaPipeline<S, O> {
    async fn extract(&self) -> Result<Vec<ScrapedTable>> {
        tracing::debug!("Fetching page: {}", self.options.page_url());
        let response = self.client.get(self.options.page_url()).send().await?;

        let status = response.status();
        tracing::debug!("Page response status: {}", status);
        if !status.is_success() {
            return Err(ToolError::ScrapeError {
                message: format!("HTTP {} fetching {}", status, self.options.page_url()),
            });
        }

        let html = response.text().await?;
        let tables = parse_tables(&html);
        tracing::debug!("Parsed {} tables from page", tables.len());

        Ok(tables)
    }

    async fn transform(&self, tables: Vec<ScrapedTable>) -> Result<ScrapeResult> {
        let tables_seen = tables.len();
        let mut tables_matched = 0;
        let mut rows = Vec::new();

        for (index, table) in tables.into_iter().enumerate() {
            let formula_col = find_column(&table.headers, FORMULA_COLUMN);
            let synonyms_col = find_column(&table.headers, SYNONYMS_COLUMN);

            // Tables without the expected columns are skipped, not fatal
            let (Some(fi), Some(si)) = (formula_col, synonyms_col) else {
                tracing::debug!(
                    "Skipping table {} (headers: {:?})",
                    index,
                    table.headers
                );
                continue;
            };

            tables_matched += 1;
            for row in &table.rows {
                if row.len() <= fi || row.len() <= si {
                    tracing::debug!("Skipping short row in table {}: {:?}", index, row);
                    continue;
                }
                rows.push(FormulaRow {
                    formula: row[fi].clone(),
                    synonyms: row[si].clone(),
                });
            }
        }

        if tables_matched == 0 {
            tracing::warn!(
                "No tables with '{}'/'{}' columns found on the page",
                FORMULA_COLUMN,
                SYNONYMS_COLUMN
            );
        }

        Ok(ScrapeResult {
            rows,
            tables_seen,
            tables_matched,
        })
    }

    async fn load(&self, result: ScrapeResult) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &result.rows {
            writer.write_record([row.formula.as_str(), row.synonyms.as_str()])?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| ToolError::ScrapeError {
                message: format!("CSV buffer error: {}", e),
            })?;

        tracing::debug!("Writing {} CSV rows to storage", result.rows.len());
        self.storage
            .write_file(self.options.output_file(), &data)
            .await?;

        Ok(format!(
            "{}/{}",
            self.options.output_path(),
            self.options.output_file()
        ))
    }
}
