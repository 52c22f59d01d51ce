//! String tables built from serializable models

use super::{ExportError, ExportResult};
use crate::shop::Product;
use crate::types::JsonValue;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Sheet name used when a name sanitizes to nothing
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Longest sheet name spreadsheet tools accept
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Table holding products that belong to no category
pub const NO_CATEGORY: &str = "No Category";

const INVALID_SHEET_CHARS: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];

/// Replace characters spreadsheets reject and cap the length
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}

/// Sanitized name not yet in `used`, suffixed ` (2)`, ` (3)`... on clashes.
///
/// Names compare case-insensitively; the chosen name is added to `used`.
pub fn unique_sheet_name(name: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(name);
    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({n})");
        let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
        candidate = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

/// A named sheet of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with a sanitized name
    pub fn new(name: &str) -> Self {
        Self {
            name: sanitize_sheet_name(name),
            ..Default::default()
        }
    }

    /// Build a table from serializable models, one row each
    pub fn from_models<M: Serialize>(name: &str, models: &[M]) -> ExportResult<Self> {
        let values = models
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ExportError::Json)?;
        Ok(Self::from_values(name, &values))
    }

    /// Build a table from JSON values, one row each.
    ///
    /// Columns appear in first-seen order across all rows.
    pub fn from_values(name: &str, values: &[JsonValue]) -> Self {
        let mut table = Self::new(name);
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut flat_rows = Vec::with_capacity(values.len());

        for value in values {
            let mut cells = Vec::new();
            flatten("", value, &mut cells);
            for (key, _) in &cells {
                if !index.contains_key(key) {
                    index.insert(key.clone(), table.headers.len());
                    table.headers.push(key.clone());
                }
            }
            flat_rows.push(cells);
        }

        table.rows = flat_rows
            .into_iter()
            .map(|cells| {
                let mut row = vec![String::new(); table.headers.len()];
                for (key, cell) in cells {
                    if let Some(&column) = index.get(&key) {
                        row[column] = cell;
                    }
                }
                row
            })
            .collect();
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, by header name
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let column = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().map(|row| row[column].as_str()).collect())
    }
}

fn flatten(prefix: &str, value: &JsonValue, out: &mut Vec<(String, String)>) {
    match value {
        JsonValue::Object(map) => {
            for (key, nested) in map {
                let column = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&column, nested, out);
            }
        }
        other => {
            let column = if prefix.is_empty() { "value" } else { prefix };
            out.push((column.to_string(), cell_text(other)));
        }
    }
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}

/// Split products into one table per category.
///
/// A product with several categories appears in each of them. Categories
/// keep first-seen order; uncategorized products go last under
/// [`NO_CATEGORY`].
pub fn group_products_by_category(products: &[Product]) -> ExportResult<Vec<Table>> {
    let mut groups: Vec<(i64, String, Vec<&Product>)> = Vec::new();
    let mut uncategorized = Vec::new();

    for product in products {
        if product.categories.is_empty() {
            uncategorized.push(product);
            continue;
        }
        for category in &product.categories {
            match groups.iter_mut().find(|(id, _, _)| *id == category.id) {
                Some((_, _, members)) => members.push(product),
                None => groups.push((category.id, category.name.clone(), vec![product])),
            }
        }
    }

    let mut used = HashSet::new();
    let mut tables = groups
        .into_iter()
        .map(|(_, name, members)| Table::from_models(&unique_sheet_name(&name, &mut used), &members))
        .collect::<ExportResult<Vec<_>>>()?;
    if !uncategorized.is_empty() {
        let name = unique_sheet_name(NO_CATEGORY, &mut used);
        tables.push(Table::from_models(&name, &uncategorized)?);
    }
    Ok(tables)
}
