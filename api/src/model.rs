use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ApiError, ApiResult};

pub const CODE_COLUMN: &str = "CETCode";
pub const COLLEGE_COLUMN: &str = "College";
pub const LOCATION_COLUMN: &str = "Location";
pub const BRANCH_COLUMN: &str = "Branch";

const FIXED_COLUMNS: [&str; 4] = [CODE_COLUMN, COLLEGE_COLUMN, LOCATION_COLUMN, BRANCH_COLUMN];

// Tokens read as "no value", matching the usual dataframe CSV readers.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    NA_TOKENS.iter().any(|token| *token == cell)
}

/// Parses a cutoff cell. Fractions truncate; anything non-numeric is 0.
pub fn normalize_cutoff(cell: Option<&str>) -> i64 {
    let Some(raw) = cell.map(str::trim) else {
        return 0;
    };
    if is_missing(raw) {
        return 0;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollegeRecord {
    pub code: String,
    pub college: String,
    pub location: String,
    pub branch: String,
    /// Raw cutoff cells, aligned with `CollegeTable::categories`.
    pub cutoffs: Vec<Option<String>>,
}

impl CollegeRecord {
    pub fn cutoff(&self, category_index: usize) -> i64 {
        normalize_cutoff(self.cutoffs.get(category_index).and_then(|c| c.as_deref()))
    }
}

/// Parsed college table. Rows keep file order.
#[derive(Clone, Debug, Default)]
pub struct CollegeTable {
    categories: Vec<String>,
    records: Vec<CollegeRecord>,
}

impl CollegeTable {
    pub fn from_csv(path: &Path) -> ApiResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ApiError::DataUnavailable(path.display().to_string()));
            }
            Err(e) => {
                return Err(ApiError::Internal(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        Self::from_csv_str(&content)
    }

    pub fn from_csv_str(content: &str) -> ApiResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ApiError::Internal(format!("malformed college table: {e}")))?
            .clone();
        let width = headers.len();

        let mut fixed = [0usize; 4];
        for (slot, name) in fixed.iter_mut().zip(FIXED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ApiError::Internal(format!("college table has no {name} column")))?;
        }

        let category_columns: Vec<usize> = (0..width)
            .filter(|idx| !fixed.contains(idx))
            .collect();
        let categories = category_columns
            .iter()
            .map(|&idx| headers[idx].to_string())
            .collect();

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(|e| ApiError::Internal(format!("malformed college table: {e}")))?;
            if row.len() > width {
                return Err(ApiError::Internal(format!(
                    "malformed college table: row {} has {} fields, expected {width}",
                    line + 2,
                    row.len()
                )));
            }

            let field = |idx: usize| row.get(idx).filter(|v| !is_missing(v)).map(str::to_string);
            let (Some(code), Some(college), Some(location), Some(branch)) = (
                field(fixed[0]),
                field(fixed[1]),
                field(fixed[2]),
                field(fixed[3]),
            ) else {
                continue;
            };

            let cutoffs = category_columns
                .iter()
                .map(|&idx| row.get(idx).map(str::to_string))
                .collect();

            records.push(CollegeRecord {
                code,
                college,
                location,
                branch,
                cutoffs,
            });
        }

        Ok(Self {
            categories,
            records,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn records(&self) -> &[CollegeRecord] {
        &self.records
    }

    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
CETCode,College,Location,Branch,GM,2AG,SCG
E001,\"RV College of Engineering, Bengaluru\",Bengaluru,CS,1200,3400,9000
E002,BMS College,Bengaluru,AI,850.7,NA,
E003,,Mysuru,CS,500,600,700
E004,PES University,NaN,EC,100,200,300
E005,SJCE,Mysuru,ME,abc,12,13
";

    #[test]
    fn categories_are_the_non_fixed_headers() {
        let table = CollegeTable::from_csv_str(TABLE).unwrap();
        assert_eq!(table.categories(), ["GM", "2AG", "SCG"]);
        assert_eq!(table.category_index("2AG"), Some(1));
        assert_eq!(table.category_index("Branch"), None);
        assert_eq!(table.category_index("gm"), None);
    }

    #[test]
    fn rows_missing_fixed_fields_are_dropped() {
        let table = CollegeTable::from_csv_str(TABLE).unwrap();
        let codes: Vec<_> = table.records().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["E001", "E002", "E005"]);
        assert_eq!(
            table.records()[0].college,
            "RV College of Engineering, Bengaluru"
        );
    }

    #[test]
    fn cutoffs_normalize() {
        let table = CollegeTable::from_csv_str(TABLE).unwrap();
        let rv = &table.records()[0];
        let bms = &table.records()[1];
        let sjce = &table.records()[2];
        assert_eq!(rv.cutoff(0), 1200);
        assert_eq!(bms.cutoff(0), 850);
        assert_eq!(bms.cutoff(1), 0);
        assert_eq!(bms.cutoff(2), 0);
        assert_eq!(sjce.cutoff(0), 0);
        assert_eq!(sjce.cutoff(7), 0);
    }

    #[test]
    fn normalize_cutoff_edge_cases() {
        assert_eq!(normalize_cutoff(None), 0);
        assert_eq!(normalize_cutoff(Some(" 42 ")), 42);
        assert_eq!(normalize_cutoff(Some("1e3")), 1000);
        assert_eq!(normalize_cutoff(Some("inf")), 0);
        assert_eq!(normalize_cutoff(Some("1,234")), 0);
        assert_eq!(normalize_cutoff(Some("null")), 0);
    }

    #[test]
    fn short_rows_read_as_missing_cells() {
        let table = CollegeTable::from_csv_str("CETCode,College,Location,Branch,GM\nE9,X,Y,CS\n")
            .unwrap();
        assert_eq!(table.records().len(), 1);
        assert_eq!(table.records()[0].cutoff(0), 0);
    }

    #[test]
    fn long_rows_are_malformed() {
        let err = CollegeTable::from_csv_str("CETCode,College,Location,Branch,GM\nE9,X,Y,CS,1,2\n")
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn missing_fixed_column_is_an_internal_error() {
        let err = CollegeTable::from_csv_str("CETCode,College,Branch,GM\nE1,X,CS,10\n").unwrap_err();
        assert!(err.to_string().contains("Location"));
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = CollegeTable::from_csv(&dir.path().join("kcet_colleges.csv")).unwrap_err();
        assert!(matches!(err, ApiError::DataUnavailable(_)));
    }
}
