//! Aggregator Module
//! Groups the cleaned table by the selected view dimension and reshapes it for display.

use polars::prelude::*;
use thiserror::Error;

use super::loader::{COL_CASES, COL_PLACE, COL_REGION, COL_YEAR};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// View dimension selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDimension {
    ByRegion,
    ByPlace,
    Total,
}

impl Default for ViewDimension {
    fn default() -> Self {
        ViewDimension::ByRegion
    }
}

impl ViewDimension {
    pub const ALL: [ViewDimension; 3] = [
        ViewDimension::ByRegion,
        ViewDimension::ByPlace,
        ViewDimension::Total,
    ];

    /// Cleaned-table column this dimension groups on, `None` for `Total`.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            ViewDimension::ByRegion => Some(COL_REGION),
            ViewDimension::ByPlace => Some(COL_PLACE),
            ViewDimension::Total => None,
        }
    }

    /// Label shown in the view selector.
    pub fn label(&self) -> &'static str {
        match self {
            ViewDimension::ByRegion => COL_REGION,
            ViewDimension::ByPlace => COL_PLACE,
            ViewDimension::Total => "Total",
        }
    }
}

/// Wide-form table: one row per dimension value, one column per year.
/// Combinations absent from the data hold 0.
#[derive(Debug, Clone, Default)]
pub struct PivotedTable {
    pub index_name: String,
    pub row_labels: Vec<String>,
    pub years: Vec<i32>,
    pub rows: Vec<Vec<i64>>,
}

/// Groups and reshapes the cleaned table for the current view.
pub struct Aggregator;

impl Aggregator {
    /// Group the cleaned table by the chosen dimension and year, then pivot.
    ///
    /// Returns the long-form grouped table (chart input) and the wide-form
    /// pivoted table (table display). A non-empty `filter` restricts the rows
    /// considered; an empty filter means no restriction.
    pub fn aggregate(
        cleaned: &DataFrame,
        dimension: ViewDimension,
        filter: &[String],
    ) -> Result<(DataFrame, PivotedTable), AggregateError> {
        let df = match dimension.column() {
            Some(dim_col) if !filter.is_empty() => {
                Self::filter_by_values(cleaned, dim_col, filter)?
            }
            _ => cleaned.clone(),
        };

        let grouped = match dimension.column() {
            Some(dim_col) => df
                .lazy()
                .group_by([col(dim_col), col(COL_YEAR)])
                .agg([col(COL_CASES).sum()])
                .sort([dim_col, COL_YEAR], Default::default())
                .collect()?,
            None => df
                .lazy()
                .group_by([col(COL_YEAR)])
                .agg([col(COL_CASES).sum()])
                .sort([COL_YEAR], Default::default())
                .collect()?,
        };

        let pivoted = Self::pivot(&grouped, dimension)?;
        Ok((grouped, pivoted))
    }

    /// Keep only rows whose `column` value is in `values`.
    /// Null cells (unmapped region codes) never match.
    fn filter_by_values(
        df: &DataFrame,
        column: &str,
        values: &[String],
    ) -> Result<DataFrame, AggregateError> {
        let cells = df.column(column)?.str()?;
        let mask: BooleanChunked = cells
            .into_iter()
            .map(|cell| {
                cell.map(|s| values.iter().any(|v| v == s))
                    .unwrap_or(false)
            })
            .collect();
        Ok(df.filter(&mask)?)
    }

    /// Reshape the grouped table into wide form, one column per year.
    fn pivot(grouped: &DataFrame, dimension: ViewDimension) -> Result<PivotedTable, AggregateError> {
        if grouped.height() == 0 {
            return Ok(PivotedTable::default());
        }

        let years_col = grouped.column(COL_YEAR)?.cast(&DataType::Int32)?;
        let years_ca = years_col.i32()?;
        // Values are integral already; the float detour truncates any
        // fractional artifact from intermediate summation.
        let cases_col = grouped.column(COL_CASES)?.cast(&DataType::Float64)?;
        let cases_ca = cases_col.f64()?;

        let mut years: Vec<i32> = years_ca.into_iter().flatten().collect();
        years.sort_unstable();
        years.dedup();

        match dimension.column() {
            None => {
                let mut row = vec![0i64; years.len()];
                for i in 0..grouped.height() {
                    if let (Some(year), Some(cases)) = (years_ca.get(i), cases_ca.get(i)) {
                        if let Some(j) = years.iter().position(|&y| y == year) {
                            row[j] = cases as i64;
                        }
                    }
                }
                Ok(PivotedTable {
                    index_name: String::new(),
                    row_labels: vec![COL_CASES.to_string()],
                    years,
                    rows: vec![row],
                })
            }
            Some(dim_col) => {
                let labels_ca = grouped.column(dim_col)?.str()?;
                let mut row_labels: Vec<String> = labels_ca
                    .into_iter()
                    .flatten()
                    .map(str::to_string)
                    .collect();
                row_labels.sort();
                row_labels.dedup();

                let mut rows = vec![vec![0i64; years.len()]; row_labels.len()];
                for i in 0..grouped.height() {
                    let (Some(label), Some(year), Some(cases)) =
                        (labels_ca.get(i), years_ca.get(i), cases_ca.get(i))
                    else {
                        continue;
                    };
                    let Some(r) = row_labels.iter().position(|l| l == label) else {
                        continue;
                    };
                    if let Some(c) = years.iter().position(|&y| y == year) {
                        rows[r][c] = cases as i64;
                    }
                }

                Ok(PivotedTable {
                    index_name: dim_col.to_string(),
                    row_labels,
                    years,
                    rows,
                })
            }
        }
    }
}
