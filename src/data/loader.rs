//! FluNet Loader Module
//! Loads the WHO FluNet weekly export and derives the cleaned yearly table using Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// Default location of the FluNet weekly export.
pub const DEFAULT_DATA_PATH: &str = "VIW_FNT.csv";

/// Raw column names from the FluNet weekly export schema.
pub const RAW_REGION: &str = "WHOREGION";
pub const RAW_PLACE: &str = "COUNTRY_AREA_TERRITORY";
pub const RAW_YEAR: &str = "ISO_YEAR";
pub const RAW_CASES: &str = "INF_A";

/// Display column names used by the cleaned table and everything downstream.
pub const COL_REGION: &str = "WHO Region";
pub const COL_PLACE: &str = "Country/Area/Territory";
pub const COL_YEAR: &str = "Year";
pub const COL_CASES: &str = "Influenza A Cases";

/// Reporting year excluded from the cleaned table; its data is still incomplete.
pub const INCOMPLETE_YEAR: i32 = 2025;

/// The six WHO region codes and their display names.
pub const REGION_NAMES: [(&str, &str); 6] = [
    ("AFR", "Africa"),
    ("AMR", "Americas"),
    ("SEAR", "South-East Asia"),
    ("EUR", "Europe"),
    ("EMR", "Eastern Mediterranean"),
    ("WPR", "Western Pacific Region"),
];

/// Map a WHO region code to its display name.
/// Codes outside the known set return `None` and surface as missing values.
pub fn region_display_name(code: &str) -> Option<&'static str> {
    REGION_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Loads the FluNet CSV and holds the cleaned table for the session.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load the FluNet export and derive the cleaned yearly table.
    ///
    /// Weekly counts are summed per (region, place, year), the incomplete
    /// reporting year is dropped, columns are renamed to display names and
    /// region codes are mapped to region names.
    pub fn load_and_clean(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(PathBuf::from(file_path));

        match Self::read_and_clean(file_path) {
            Ok(df) => {
                self.df = Some(df);
                self.df.as_ref().ok_or(LoaderError::NoData)
            }
            Err(e) => {
                // A failed reload must not leave the previous table serveable.
                self.df = None;
                Err(e)
            }
        }
    }

    fn read_and_clean(file_path: &str) -> Result<DataFrame, LoaderError> {
        let mut df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .select([col(RAW_REGION), col(RAW_PLACE), col(RAW_YEAR), col(RAW_CASES)])
            .group_by([col(RAW_REGION), col(RAW_PLACE), col(RAW_YEAR)])
            .agg([col(RAW_CASES).sum()])
            .filter(col(RAW_YEAR).neq(lit(INCOMPLETE_YEAR)))
            .collect()?;

        df.rename(RAW_REGION, COL_REGION.into())?;
        df.rename(RAW_PLACE, COL_PLACE.into())?;
        df.rename(RAW_YEAR, COL_YEAR.into())?;
        df.rename(RAW_CASES, COL_CASES.into())?;

        // Region codes become display names; unknown codes become null.
        let mapped: StringChunked = df
            .column(COL_REGION)?
            .str()?
            .into_iter()
            .map(|code| code.and_then(region_display_name))
            .collect();
        df.replace(COL_REGION, mapped.into_series().with_name(COL_REGION.into()))?;

        Ok(df.sort([COL_REGION, COL_PLACE, COL_YEAR], Default::default())?)
    }

    /// Get sorted unique non-null values from a cleaned-table column.
    pub fn get_unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.column(column)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut values: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                values.sort();
                values
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the cleaned table.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the cleaned table.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
WHOREGION,COUNTRY_AREA_TERRITORY,ISO_YEAR,ISO_WEEK,INF_A,INF_B
AFR,Nigeria,2023,1,5,2
AFR,Nigeria,2023,2,3,0
AMR,Brazil,2023,1,10,4
EUR,France,2025,1,7,1
XXX,Atlantis,2023,1,2,0
";

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("flunet_{}_{}.csv", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn case_count(df: &DataFrame, place: &str) -> i64 {
        let places = df.column(COL_PLACE).unwrap().str().unwrap();
        let cases = df.column(COL_CASES).unwrap().i64().unwrap();
        for i in 0..df.height() {
            if places.get(i) == Some(place) {
                return cases.get(i).unwrap();
            }
        }
        panic!("no row for place {place}");
    }

    #[test]
    fn maps_all_six_region_codes() {
        assert_eq!(region_display_name("AFR"), Some("Africa"));
        assert_eq!(region_display_name("AMR"), Some("Americas"));
        assert_eq!(region_display_name("SEAR"), Some("South-East Asia"));
        assert_eq!(region_display_name("EUR"), Some("Europe"));
        assert_eq!(region_display_name("EMR"), Some("Eastern Mediterranean"));
        assert_eq!(region_display_name("WPR"), Some("Western Pacific Region"));
        assert_eq!(region_display_name("XXX"), None);
    }

    #[test]
    fn sums_weeks_and_drops_incomplete_year() {
        let path = write_fixture("clean", FIXTURE);
        let mut loader = DataLoader::new();
        let df = loader
            .load_and_clean(path.to_str().unwrap())
            .unwrap()
            .clone();
        std::fs::remove_file(&path).ok();

        // Nigeria weeks 1+2 collapse into one yearly row; the 2025 row is gone.
        assert_eq!(df.height(), 3);
        assert_eq!(case_count(&df, "Nigeria"), 8);
        assert_eq!(case_count(&df, "Brazil"), 10);

        let years = df.column(COL_YEAR).unwrap().i64().unwrap();
        assert!((0..df.height()).all(|i| years.get(i) != Some(INCOMPLETE_YEAR as i64)));
    }

    #[test]
    fn unknown_region_code_passes_through_as_null() {
        let path = write_fixture("unknown", FIXTURE);
        let mut loader = DataLoader::new();
        let df = loader
            .load_and_clean(path.to_str().unwrap())
            .unwrap()
            .clone();
        std::fs::remove_file(&path).ok();

        let regions = df.column(COL_REGION).unwrap().str().unwrap();
        let places = df.column(COL_PLACE).unwrap().str().unwrap();
        let atlantis = (0..df.height())
            .find(|&i| places.get(i) == Some("Atlantis"))
            .unwrap();
        assert_eq!(regions.get(atlantis), None);

        // Filter options come from the cleaned table and skip the null.
        assert_eq!(
            loader.get_unique_values(COL_REGION),
            vec!["Africa".to_string(), "Americas".to_string()]
        );
    }

    #[test]
    fn load_is_idempotent() {
        let path = write_fixture("idem", FIXTURE);
        let mut loader = DataLoader::new();
        let first = loader
            .load_and_clean(path.to_str().unwrap())
            .unwrap()
            .clone();
        let second = loader
            .load_and_clean(path.to_str().unwrap())
            .unwrap()
            .clone();
        std::fs::remove_file(&path).ok();

        assert!(first.equals_missing(&second));
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let mut loader = DataLoader::new();
        assert!(loader.load_and_clean("/nonexistent/VIW_FNT.csv").is_err());
    }

    #[test]
    fn failed_reload_drops_the_previous_table() {
        let path = write_fixture("reload", FIXTURE);
        let mut loader = DataLoader::new();
        loader.load_and_clean(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(loader.get_row_count() > 0);

        assert!(loader.load_and_clean("/nonexistent/VIW_FNT.csv").is_err());

        // The old file's data must not be served under the new path.
        assert!(loader.get_dataframe().is_none());
        assert_eq!(loader.get_row_count(), 0);
    }
}
