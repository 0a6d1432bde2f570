// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::{base64_decode, raise_error, validate_email};
use ahash::AHashSet;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use table::Table;

pub mod table;

const EMAIL_COLUMN: &[&str] = &["email"];
const NAME_COLUMN: &[&str] = &["name", "first", "full"];

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct Recipient {
    pub email: String,
    /// Display name; empty when unknown.
    #[oai(default)]
    #[serde(default)]
    pub name: String,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// An uploaded spreadsheet.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct RecipientFile {
    /// Used to pick the parser: `.csv` or `.xlsx`.
    pub file_name: String,
    /// Base64 encoded file content.
    pub content: String,
}

impl RecipientFile {
    pub fn table(&self) -> CampaignResult<Table> {
        let data = base64_decode!(self.content.trim()).map_err(|e| {
            raise_error!(
                format!("Recipients file '{}' is not valid base64: {e}", self.file_name),
                ErrorCode::InvalidParameter
            )
        })?;
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" => Table::from_xlsx(&data),
            "csv" | "txt" => Table::from_csv(&data),
            _ => Err(raise_error!(
                format!(
                    "Unsupported recipients file '{}', upload a .csv or .xlsx file",
                    self.file_name
                ),
                ErrorCode::InvalidParameter
            )),
        }
    }
}

/// Where a request's recipients come from. The first populated source wins:
/// an explicit list, then an uploaded file, then a CSV document, then pasted
/// addresses.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct RecipientInput {
    /// Recipients already resolved, for example echoed back from a preview.
    pub list: Option<Vec<Recipient>>,
    pub file: Option<RecipientFile>,
    /// CSV document with a header row.
    pub csv: Option<String>,
    /// Pasted addresses, one per line.
    pub emails: Option<String>,
    /// Display name applied to every pasted address.
    pub name: Option<String>,
}

impl RecipientInput {
    pub fn resolve(&self) -> CampaignResult<Vec<Recipient>> {
        let recipients = if let Some(list) = self.list.as_ref().filter(|l| !l.is_empty()) {
            list.iter()
                .filter(|r| !r.email.trim().is_empty())
                .map(|r| Recipient::new(r.email.trim(), r.name.trim()))
                .collect()
        } else if let Some(file) = self.file.as_ref().filter(|f| !f.content.trim().is_empty()) {
            extract_recipients(&file.table()?)
        } else if let Some(csv) = self.csv.as_ref().filter(|c| !c.trim().is_empty()) {
            extract_recipients(&Table::from_csv(csv.as_bytes())?)
        } else if let Some(emails) = self.emails.as_ref() {
            parse_pasted(emails, self.name.as_deref().unwrap_or_default())
        } else {
            Vec::new()
        };

        if recipients.is_empty() {
            return Err(raise_error!(
                "Please provide recipients via upload or list".into(),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(recipients)
    }
}

/// Emails from the first column mentioning "email" (or the first column),
/// trimmed, non-empty and de-duplicated in first-seen order.
pub fn extract_emails(table: &Table) -> Vec<String> {
    if table.is_empty() {
        return Vec::new();
    }
    let column = table.find_column(EMAIL_COLUMN).unwrap_or(0);
    let mut seen = AHashSet::new();
    (0..table.rows.len())
        .filter_map(|row| table.cell(row, column))
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .filter(|email| seen.insert(email.to_string()))
        .map(String::from)
        .collect()
}

/// Pairs each extracted email with a name taken from the first row that
/// mentions it in any cell.
pub fn extract_recipients(table: &Table) -> Vec<Recipient> {
    let emails = extract_emails(table);
    let Some(name_column) = table.find_column(NAME_COLUMN) else {
        return emails
            .into_iter()
            .map(|email| Recipient::new(email, ""))
            .collect();
    };

    emails
        .into_iter()
        .map(|email| {
            let needle = email.to_lowercase();
            let name = table
                .rows
                .iter()
                .position(|row| {
                    row.iter()
                        .flatten()
                        .any(|cell| cell.to_lowercase().contains(&needle))
                })
                .and_then(|row| table.cell(row, name_column))
                .map(|name| name.trim().to_string())
                .unwrap_or_default();
            Recipient::new(email, name)
        })
        .collect()
}

/// One address per non-blank line, all sharing `name`. Repeats are kept.
pub fn parse_pasted(text: &str, name: &str) -> Vec<Recipient> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|email| Recipient::new(email, name.trim()))
        .collect()
}

/// Splits off recipients whose address fails syntax validation, returning a
/// warning for each one dropped.
pub fn split_invalid(recipients: Vec<Recipient>) -> (Vec<Recipient>, Vec<String>) {
    let mut warnings = Vec::new();
    let valid = recipients
        .into_iter()
        .filter(|r| match validate_email!(&r.email) {
            Ok(()) => true,
            Err(_) => {
                warnings.push(format!("Skipping invalid email address: {}", r.email));
                false
            }
        })
        .collect();
    (valid, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|c| (!c.is_empty()).then(|| c.to_string()))
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn duplicates_collapse_to_one_named_recipient() {
        let t = table(
            &["Full Name", "Email Address"],
            &[&["Asha Rao", "asha@x.com"], &["Asha Rao", "asha@x.com"]],
        );
        assert_eq!(
            extract_recipients(&t),
            vec![Recipient::new("asha@x.com", "Asha Rao")]
        );
    }

    #[test]
    fn falls_back_to_first_column() {
        let t = table(&["contact", "city"], &[&[" a@x.com ", "Pune"], &["", "Goa"], &["b@x.com", ""]]);
        assert_eq!(extract_emails(&t), vec!["a@x.com", "b@x.com"]);
        assert_eq!(extract_recipients(&t)[0].name, "");
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let t = table(&["email"], &[&["A@x.com"], &["a@x.com"], &["A@x.com"]]);
        assert_eq!(extract_emails(&t), vec!["A@x.com", "a@x.com"]);
    }

    #[test]
    fn first_matching_row_wins() {
        let t = table(
            &["Name", "Email", "Notes"],
            &[
                &["Ravi", "ravi@x.com", ""],
                &["Someone", "other@x.com", "cc ravi@x.com"],
            ],
        );
        let recipients = extract_recipients(&t);
        assert_eq!(recipients[0].name, "Ravi");
        assert_eq!(recipients[1].name, "Someone");
    }

    #[test]
    fn pasted_addresses_keep_repeats() {
        let r = parse_pasted("a@x.com\n\n  b@x.com \na@x.com", "Team");
        assert_eq!(r.len(), 3);
        assert!(r.iter().all(|r| r.name == "Team"));
        assert_eq!(r[1].email, "b@x.com");
    }

    #[test]
    fn invalid_addresses_become_warnings() {
        let (valid, warnings) = split_invalid(vec![
            Recipient::new("ok@x.com", ""),
            Recipient::new("nope", ""),
        ]);
        assert_eq!(valid.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("nope"));
    }

    #[test]
    fn input_prefers_list_then_csv_then_pasted() {
        let input = RecipientInput {
            list: None,
            file: None,
            csv: Some("Email,Name\nz@x.com,Zara\n".into()),
            emails: Some("p@x.com".into()),
            name: None,
        };
        assert_eq!(input.resolve().unwrap(), vec![Recipient::new("z@x.com", "Zara")]);

        let empty = RecipientInput::default();
        assert!(empty.resolve().is_err());
    }

    fn encoded(data: &[u8]) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine};
        STANDARD.encode(data)
    }

    #[test]
    fn uploaded_workbook_is_read_by_extension() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Name").unwrap();
        sheet.write_string(0, 1, "Email").unwrap();
        sheet.write_string(1, 0, "Meera").unwrap();
        sheet.write_string(1, 1, "meera@x.com").unwrap();
        let input = RecipientInput {
            file: Some(RecipientFile {
                file_name: "Teachers.XLSX".into(),
                content: encoded(&workbook.save_to_buffer().unwrap()),
            }),
            emails: Some("p@x.com".into()),
            ..Default::default()
        };
        assert_eq!(input.resolve().unwrap(), vec![Recipient::new("meera@x.com", "Meera")]);
    }

    #[test]
    fn uploaded_csv_and_unknown_extensions() {
        let csv = RecipientFile {
            file_name: "list.csv".into(),
            content: encoded(b"Email,Name\nz@x.com,Zara\n"),
        };
        assert_eq!(
            extract_recipients(&csv.table().unwrap()),
            vec![Recipient::new("z@x.com", "Zara")]
        );

        let pdf = RecipientFile {
            file_name: "list.pdf".into(),
            content: encoded(b"%PDF"),
        };
        assert_eq!(pdf.table().unwrap_err().code(), ErrorCode::InvalidParameter);

        let garbled = RecipientFile {
            file_name: "list.csv".into(),
            content: "***".into(),
        };
        assert!(garbled.table().is_err());
    }
}
