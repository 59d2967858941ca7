//! CSV Import service
//!
//! Imports transactions from CSV files: column detection from headers,
//! lenient date and amount parsing, a preview step with duplicate detection
//! by import id, then a batch write of the new rows.

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Money, Transaction, TransactionType};
use crate::storage::Storage;

use super::account::AccountService;

/// Formats tried after the configured one; ISO first, then US
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%d.%m.%Y",
];

/// Column mapping configuration for CSV import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub amount_column: usize,
    pub description_column: Option<usize>,
    /// When absent the type comes from the amount's sign
    pub type_column: Option<usize>,
    pub category_column: Option<usize>,
    /// Tried before the built-in formats
    pub date_format: String,
    pub has_header: bool,
    pub delimiter: u8,
}

impl Default for ColumnMapping {
    /// date, description, amount
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: 2,
            description_column: Some(1),
            type_column: None,
            category_column: None,
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            delimiter: b',',
        }
    }
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Detect the mapping from a header row
    ///
    /// Falls back to the default layout for any column it cannot find. A
    /// first row that already parses as data means there is no header.
    pub fn detect(headers: &StringRecord) -> Self {
        let mut mapping = Self::default();

        if headers.get(0).map(|f| parse_date(f, "").is_ok()).unwrap_or(false) {
            mapping.has_header = false;
            return mapping;
        }

        let mut description = None;
        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            if h.contains("date") {
                mapping.date_column = idx;
            } else if h.contains("amount") || h == "value" || h == "sum" {
                mapping.amount_column = idx;
            } else if h == "type" || h.contains("kind") || h.contains("transaction type") {
                mapping.type_column = Some(idx);
            } else if h.contains("category") {
                mapping.category_column = Some(idx);
            } else if description.is_none()
                && (h.contains("description")
                    || h.contains("memo")
                    || h.contains("payee")
                    || h.contains("merchant")
                    || h.contains("name"))
            {
                description = Some(idx);
            }
        }
        mapping.description_column = description;

        mapping
    }
}

/// A parsed row from the CSV before import
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    pub date: NaiveDate,
    /// Signed, as found in the file
    pub amount: Money,
    pub kind: TransactionType,
    pub description: String,
    /// Raw category cell, if any
    pub category: Option<String>,
    /// 1-based data row number
    pub row_number: usize,
    /// Fingerprint for duplicate detection; repeats within a file are
    /// numbered so each occurrence gets its own id
    pub import_id: String,
}

impl ParsedTransaction {
    /// Fingerprint of date, amount and description
    pub fn generate_import_id(date: NaiveDate, amount: Money, description: &str) -> String {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        date.hash(&mut hasher);
        amount.cents().hash(&mut hasher);
        description.trim().to_lowercase().hash(&mut hasher);
        format!("imp-{:016x}", hasher.finish())
    }
}

/// A row that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row_number: usize,
    pub message: String,
}

/// Status of a row in the import preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    New,
    Duplicate,
    Error(String),
}

/// Preview entry for import review
#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    pub row_number: usize,
    pub transaction: Option<ParsedTransaction>,
    /// Resolved category value; `None` when blank or unknown
    pub category: Option<String>,
    pub status: ImportStatus,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
    /// Rows whose category cell named no known category
    pub unknown_categories: usize,
    pub imported_ids: Vec<String>,
    pub error_messages: Vec<(usize, String)>,
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse a CSV file, detecting the mapping unless one is given
    pub fn parse_file(
        &self,
        path: &Path,
        mapping: Option<ColumnMapping>,
    ) -> PlannerResult<(ColumnMapping, Vec<Result<ParsedTransaction, RowError>>)> {
        let file = std::fs::File::open(path).map_err(|e| {
            PlannerError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.parse_reader(file, mapping)
    }

    /// Parse CSV data from any reader
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        mapping: Option<ColumnMapping>,
    ) -> PlannerResult<(ColumnMapping, Vec<Result<ParsedTransaction, RowError>>)> {
        let delimiter = mapping.as_ref().map(|m| m.delimiter).unwrap_or(b',');
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut records = reader.records();
        let first = match records.next() {
            Some(record) => record?,
            None => return Ok((mapping.unwrap_or_default(), Vec::new())),
        };

        let mapping = mapping.unwrap_or_else(|| ColumnMapping::detect(&first));
        tracing::debug!(?mapping, "using CSV column mapping");

        let mut results = Vec::new();
        let mut row_number = 0;

        if !mapping.has_header {
            row_number += 1;
            results.push(parse_record(&first, row_number, &mapping));
        }

        for record in records {
            row_number += 1;
            match record {
                Ok(record) => {
                    if record.iter().all(|field| field.trim().is_empty()) {
                        continue;
                    }
                    results.push(parse_record(&record, row_number, &mapping));
                }
                Err(e) => results.push(Err(RowError {
                    row_number,
                    message: format!("Error reading CSV record: {}", e),
                })),
            }
        }

        number_repeated_rows(&mut results);

        Ok((mapping, results))
    }

    /// Mark every parsed row New, Duplicate or Error
    ///
    /// Duplicates are rows whose import id is already stored. Identical rows
    /// in one file carry distinct ids, so they are all imported.
    pub fn generate_preview(
        &self,
        parsed: &[Result<ParsedTransaction, RowError>],
    ) -> PlannerResult<Vec<ImportPreviewEntry>> {
        let stored: HashSet<String> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter_map(|t| t.import_id)
            .collect();

        let mut preview = Vec::with_capacity(parsed.len());
        for result in parsed {
            let entry = match result {
                Ok(txn) => {
                    let status = if stored.contains(&txn.import_id) {
                        ImportStatus::Duplicate
                    } else {
                        ImportStatus::New
                    };
                    let category = match txn.category.as_deref() {
                        Some(raw) => self.resolve_category(raw)?,
                        None => None,
                    };
                    ImportPreviewEntry {
                        row_number: txn.row_number,
                        transaction: Some(txn.clone()),
                        category,
                        status,
                    }
                }
                Err(e) => ImportPreviewEntry {
                    row_number: e.row_number,
                    transaction: None,
                    category: None,
                    status: ImportStatus::Error(e.message.clone()),
                },
            };
            preview.push(entry);
        }

        Ok(preview)
    }

    /// Write the New rows of a preview
    ///
    /// `default_category` applies to rows without a resolvable category.
    /// `account` is a name or id and must name a stored account.
    pub fn import_from_preview(
        &self,
        preview: &[ImportPreviewEntry],
        default_category: Option<&str>,
        account: Option<&str>,
    ) -> PlannerResult<ImportResult> {
        let account_id = match account {
            Some(identifier) => Some(AccountService::new(self.storage).require(identifier)?.id),
            None => None,
        };
        let default_category = match default_category {
            Some(identifier) => Some(
                self.resolve_category(identifier)?
                    .ok_or_else(|| PlannerError::category_not_found(identifier))?,
            ),
            None => None,
        };

        let mut result = ImportResult::default();

        for entry in preview {
            match (&entry.status, &entry.transaction) {
                (ImportStatus::New, Some(parsed)) => {
                    if parsed.category.is_some() && entry.category.is_none() {
                        result.unknown_categories += 1;
                    }

                    let mut txn = Transaction::new(parsed.kind, parsed.amount, parsed.date)
                        .with_description(parsed.description.clone());
                    txn.category = entry.category.clone().or_else(|| default_category.clone());
                    txn.import_id = Some(parsed.import_id.clone());
                    txn.account_id = account_id;

                    result.imported_ids.push(txn.id.to_string());
                    self.storage.transactions.upsert(txn)?;
                    result.imported += 1;
                }
                (ImportStatus::Duplicate, _) => result.duplicates_skipped += 1,
                (ImportStatus::Error(message), _) => {
                    result.errors += 1;
                    result.error_messages.push((entry.row_number, message.clone()));
                }
                (ImportStatus::New, None) => {}
            }
        }

        self.storage.transactions.save()?;

        tracing::info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors,
            "CSV import finished"
        );
        Ok(result)
    }

    fn resolve_category(&self, raw: &str) -> PlannerResult<Option<String>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Some(category) = self.storage.categories.get(raw)? {
            return Ok(Some(category.value));
        }
        Ok(self.storage.categories.get_by_label(raw)?.map(|c| c.value))
    }
}

/// Suffix the second and later occurrences of an import id with `-N`
///
/// The first occurrence keeps the plain fingerprint, so a file re-imported
/// after rows were appended only brings in the new ones.
fn number_repeated_rows(results: &mut [Result<ParsedTransaction, RowError>]) {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    for row in results.iter_mut().flatten() {
        let count = occurrences.entry(row.import_id.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            row.import_id = format!("{}-{}", row.import_id, count);
        }
    }
}

fn parse_record(
    record: &StringRecord,
    row_number: usize,
    mapping: &ColumnMapping,
) -> Result<ParsedTransaction, RowError> {
    let fail = |message: String| RowError {
        row_number,
        message,
    };

    let date_str = record
        .get(mapping.date_column)
        .ok_or_else(|| fail("Missing date column".into()))?;
    let date = parse_date(date_str, &mapping.date_format).map_err(fail)?;

    let amount_str = record
        .get(mapping.amount_column)
        .ok_or_else(|| fail("Missing amount column".into()))?;
    let amount = parse_amount(amount_str).map_err(fail)?;

    let kind = match mapping
        .type_column
        .and_then(|col| record.get(col))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(raw) => raw.parse::<TransactionType>().map_err(fail)?,
        None => TransactionType::from_sign(amount),
    };

    let description = mapping
        .description_column
        .and_then(|col| record.get(col))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let category = mapping
        .category_column
        .and_then(|col| record.get(col))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    Ok(ParsedTransaction {
        import_id: ParsedTransaction::generate_import_id(date, amount, &description),
        date,
        amount,
        kind,
        description,
        category,
        row_number,
    })
}

/// Parse a date trying `primary` first, then ISO, then US and the rest
///
/// ISO timestamps such as `2024-01-15T10:00:00` are read by their date part.
pub fn parse_date(s: &str, primary: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    if !primary.is_empty() {
        if let Ok(date) = NaiveDate::parse_from_str(s, primary) {
            return Ok(date);
        }
    }

    if let Some(date) = s
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    {
        return Ok(date);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

/// Parse an amount, ignoring currency symbols, commas and whitespace
///
/// `(12.50)` is read as negative.
pub fn parse_amount(s: &str) -> Result<Money, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',') && !c.is_whitespace())
        .collect();

    let (negative, value) = match cleaned.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };

    if value.is_empty() {
        return Err(format!("Missing amount in '{}'", s.trim()));
    }

    Money::parse(value)
        .map(|m| if negative { -m.abs() } else { m })
        .map_err(|e| format!("Could not parse amount '{}': {}", s.trim(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::{AccountType, Category};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        storage.categories.upsert(Category::new("Food")).unwrap();
        storage.categories.upsert(Category::new("Salary")).unwrap();
        (temp_dir, storage)
    }

    fn parse(
        service: &ImportService<'_>,
        data: &str,
    ) -> (ColumnMapping, Vec<Result<ParsedTransaction, RowError>>) {
        service.parse_reader(data.as_bytes(), None).unwrap()
    }

    #[test]
    fn test_parse_simple_csv_infers_type_from_sign() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let (_, results) = parse(
            &service,
            "Date,Description,Amount\n2025-01-15,Test Store,-50.00\n2025-01-16,Paycheck,100.00",
        );
        assert_eq!(results.len(), 2);

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(first.amount.cents(), -5000);
        assert_eq!(first.kind, TransactionType::Expense);
        assert_eq!(first.description, "Test Store");
        assert_eq!(first.row_number, 1);

        assert_eq!(results[1].as_ref().unwrap().kind, TransactionType::Income);
    }

    #[test]
    fn test_detect_mapping() {
        let record = StringRecord::from(vec!["Category", "Amount", "Type", "Posted Date", "Memo"]);
        let mapping = ColumnMapping::detect(&record);

        assert!(mapping.has_header);
        assert_eq!(mapping.date_column, 3);
        assert_eq!(mapping.amount_column, 1);
        assert_eq!(mapping.type_column, Some(2));
        assert_eq!(mapping.category_column, Some(0));
        assert_eq!(mapping.description_column, Some(4));
    }

    #[test]
    fn test_headerless_file_keeps_first_row() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let (mapping, results) = parse(&service, "2025-01-15,Coffee,-4.50\n2025-01-16,Lunch,-12");
        assert!(!mapping.has_header);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().amount.cents(), -450);
    }

    #[test]
    fn test_explicit_type_and_category_columns() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let (_, results) = parse(
            &service,
            "date,amount,type,category,description\n03/02/2024,200,savings,,Transfer to pot",
        );
        let row = results[0].as_ref().unwrap();
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(row.kind, TransactionType::Savings);
        assert!(row.category.is_none());
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("$1,250.00").unwrap().cents(), 125_000);
        assert_eq!(parse_amount("(50.00)").unwrap().cents(), -5000);
        assert_eq!(parse_amount(" € 12.5 ").unwrap().cents(), 1250);
        assert_eq!(parse_amount("-£3").unwrap().cents(), -300);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_date_prefers_iso_then_us() {
        assert_eq!(
            parse_date("2024-02-03", "").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
        // Ambiguous day/month reads as US
        assert_eq!(
            parse_date("02/03/2024", "").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
        assert_eq!(
            parse_date("25/12/2024", "").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
        );
        assert!(parse_date("yesterday", "").is_err());
    }

    #[test]
    fn test_parse_date_reads_iso_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15T10:00:00", "").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15T10:00:00Z", "%m/%d/%Y").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 23:59", "").unwrap(), expected);
        assert!(parse_date("2024-13-15T10:00:00", "").is_err());
    }

    #[test]
    fn test_timestamp_rows_import() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let (_, parsed) = parse(
            &service,
            "Date,Description,Amount
2024-01-15T10:00:00,Coffee,-4",
        );
        let row = parsed[0].as_ref().unwrap();
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_bad_rows_become_errors() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let (_, results) = parse(
            &service,
            "Date,Description,Amount\nnot-a-date,X,1\n2025-01-01,Y,oops\n2025-01-02,Z,3",
        );
        let preview = service.generate_preview(&results).unwrap();

        assert!(matches!(preview[0].status, ImportStatus::Error(_)));
        assert_eq!(preview[0].row_number, 1);
        assert!(matches!(preview[1].status, ImportStatus::Error(_)));
        assert_eq!(preview[2].status, ImportStatus::New);
    }

    #[test]
    fn test_duplicate_detection_across_imports() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let data = "Date,Description,Amount\n2025-01-15,Test Store,-50.00";
        let (_, parsed) = parse(&service, data);

        let preview1 = service.generate_preview(&parsed).unwrap();
        assert_eq!(preview1[0].status, ImportStatus::New);
        service.import_from_preview(&preview1, None, None).unwrap();

        let preview2 = service.generate_preview(&parsed).unwrap();
        assert_eq!(preview2[0].status, ImportStatus::Duplicate);
    }

    #[test]
    fn test_identical_rows_in_one_file_are_all_imported() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let data = "Date,Description,Amount\n\
                    2025-01-15,Coffee,-4\n\
                    2025-01-15,Coffee,-4\n\
                    2025-01-15,Refund,0";
        let (_, parsed) = parse(&service, data);
        let preview = service.generate_preview(&parsed).unwrap();
        assert!(preview.iter().all(|e| e.status == ImportStatus::New));

        let result = service.import_from_preview(&preview, None, None).unwrap();
        assert_eq!(result.imported, 3);
        assert_eq!(result.duplicates_skipped, 0);

        let all = storage.transactions.get_all().unwrap();
        assert_eq!(all.iter().filter(|t| t.description == "Coffee").count(), 2);
        let refund = all.iter().find(|t| t.description == "Refund").unwrap();
        assert_eq!(refund.kind, TransactionType::Transfer);

        // Same file again: every row is already stored
        let (_, parsed) = parse(&service, data);
        let preview = service.generate_preview(&parsed).unwrap();
        assert!(preview.iter().all(|e| e.status == ImportStatus::Duplicate));

        // An appended third coffee is the only new row
        let (_, parsed) = parse(&service, &format!("{}\n2025-01-15,Coffee,-4", data));
        let preview = service.generate_preview(&parsed).unwrap();
        let new: Vec<_> = preview
            .iter()
            .filter(|e| e.status == ImportStatus::New)
            .collect();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].row_number, 4);
    }

    #[test]
    fn test_import_resolves_categories() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let (_, parsed) = parse(
            &service,
            "Date,Description,Amount,Category\n\
             2025-01-15,Store,-50.00,Food\n\
             2025-01-16,Pay,900,salary\n\
             2025-01-17,Mystery,-1,Unknown\n\
             2025-01-18,Plain,-2,",
        );
        let account = AccountService::new(&storage)
            .create("Checking", AccountType::Checking, Money::zero(), None)
            .unwrap();
        let preview = service.generate_preview(&parsed).unwrap();
        let result = service
            .import_from_preview(&preview, Some("food"), Some("checking"))
            .unwrap();

        assert_eq!(result.imported, 4);
        assert_eq!(result.unknown_categories, 1);
        assert_eq!(result.imported_ids.len(), 4);

        let all = storage.transactions.get_all().unwrap();
        let by_desc = |d: &str| all.iter().find(|t| t.description == d).unwrap();
        assert_eq!(by_desc("Store").category.as_deref(), Some("food"));
        assert_eq!(by_desc("Pay").category.as_deref(), Some("salary"));
        // Unknown and blank fall back to the default
        assert_eq!(by_desc("Mystery").category.as_deref(), Some("food"));
        assert_eq!(by_desc("Plain").category.as_deref(), Some("food"));
        assert_eq!(by_desc("Plain").account_id, Some(account.id));
        assert!(by_desc("Store").import_id.is_some());
    }

    #[test]
    fn test_unknown_default_category_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        assert!(service
            .import_from_preview(&[], Some("ghost"), None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_unknown_account_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let (_, parsed) = parse(&service, "Date,Description,Amount\n2025-01-15,Coffee,-4");
        let preview = service.generate_preview(&parsed).unwrap();
        let err = service
            .import_from_preview(&preview, None, Some("Brokerage"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }
}
