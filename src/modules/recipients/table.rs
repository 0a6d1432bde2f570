// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::raise_error;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use csv::{ReaderBuilder, Trim};
use std::io::Cursor;

/// Header row plus cells; a missing cell is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    /// Parses a CSV document whose first record is the header.
    pub fn from_csv(data: &[u8]) -> CampaignResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(data);

        let columns = reader
            .headers()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to read recipients file header: {e}"),
                    ErrorCode::InvalidParameter
                )
            })?
            .iter()
            .map(String::from)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                raise_error!(
                    format!("Failed to read recipients file row {}: {e}", index + 2),
                    ErrorCode::InvalidParameter
                )
            })?;
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                .collect();
            row.resize(columns.len().max(row.len()), None);
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }

    /// Reads the first worksheet of an XLSX workbook; its first row is the header.
    pub fn from_xlsx(data: &[u8]) -> CampaignResult<Self> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data)).map_err(|e| {
            raise_error!(
                format!("Failed to open recipients workbook: {e}"),
                ErrorCode::InvalidParameter
            )
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                raise_error!(
                    "Recipients workbook has no worksheet".into(),
                    ErrorCode::InvalidParameter
                )
            })?
            .map_err(|e| {
                raise_error!(
                    format!("Failed to read recipients worksheet: {e}"),
                    ErrorCode::InvalidParameter
                )
            })?;

        let mut rows = range.rows().map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => None,
                    other => Some(other.to_string().trim().to_string()).filter(|v| !v.is_empty()),
                })
                .collect::<Vec<_>>()
        });
        let columns = rows
            .next()
            .map(|header| header.into_iter().map(Option::unwrap_or_default).collect())
            .unwrap_or_default();
        Ok(Self {
            columns,
            rows: rows.filter(|row| row.iter().any(Option::is_some)).collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Index of the first column whose lower-cased header contains any needle.
    pub fn find_column(&self, needles: &[&str]) -> Option<usize> {
        self.columns.iter().position(|name| {
            let name = name.to_lowercase();
            needles.iter().any(|needle| name.contains(needle))
        })
    }
}
