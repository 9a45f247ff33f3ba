//! Ordered key index over a flattened surface.
//!
//! The index maps each [`SurfaceKey`] to its position in the flat quote
//! array it was built from, so lookups are `O(log n)` whatever order the
//! quotes arrived in. Iterating the index yields keys in surface order,
//! which is what the tabular view is rebuilt from.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use strata_core::Period;

use crate::error::{SurfaceError, SurfaceResult};
use crate::key::SurfaceKey;

/// Sorted map from surface key to flat index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceIndex {
    entries: BTreeMap<SurfaceKey, usize>,
}

impl SurfaceIndex {
    /// Indexes keys by their position in `keys`.
    ///
    /// Repeated keys are rejected rather than overwritten.
    pub fn build<I>(keys: I) -> SurfaceResult<Self>
    where
        I: IntoIterator<Item = SurfaceKey>,
    {
        let mut entries = BTreeMap::new();
        for (position, key) in keys.into_iter().enumerate() {
            if let Some(first) = entries.insert(key, position) {
                return Err(SurfaceError::duplicate_key(format!(
                    "{key} (positions {first} and {position})"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Flat index of `key`.
    pub fn index_of(&self, key: &SurfaceKey) -> Option<usize> {
        self.entries.get(key).copied()
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys with their flat indices, in surface order.
    pub fn iter(&self) -> impl Iterator<Item = (&SurfaceKey, usize)> {
        self.entries.iter().map(|(k, i)| (k, *i))
    }

    /// Whether any key carries a tenor.
    pub fn has_tenor(&self) -> bool {
        self.entries.keys().any(|k| k.tenor.is_some())
    }

    /// Distinct strikes, ascending.
    pub fn strikes(&self) -> Vec<Decimal> {
        let mut strikes: Vec<Decimal> = self.entries.keys().map(|k| k.strike).collect();
        strikes.sort();
        strikes.dedup();
        strikes
    }

    /// Distinct tenors in ascending interval order; `None` for a surface
    /// without a tenor dimension.
    pub fn tenors(&self) -> Vec<Option<Period>> {
        let mut tenors: Vec<Option<Period>> = Vec::new();
        for key in self.entries.keys() {
            let seen = tenors.iter().any(|t| match (t, &key.tenor) {
                (None, None) => true,
                (Some(a), Some(b)) => a.cmp_interval(b).is_eq(),
                _ => false,
            });
            if !seen {
                tenors.push(key.tenor);
            }
        }
        tenors.sort_by(|a, b| match (a, b) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(a), Some(b)) => a.cmp_interval(b),
        });
        tenors
    }

    /// Tabular view: one row per (expiry, tenor), one column per strike.
    ///
    /// `values` is the flat quote array the index was built over. Rows are
    /// cut wherever the (expiry, tenor) part of consecutive keys changes.
    pub fn table(&self, values: &[f64]) -> SurfaceResult<SurfaceTable> {
        if values.len() != self.len() {
            return Err(SurfaceError::invalid_data(format!(
                "index covers {} quotes but {} values were supplied",
                self.len(),
                values.len()
            )));
        }

        let strikes = self.strikes();
        let mut rows: Vec<SurfaceRow> = Vec::new();
        let mut previous: Option<&SurfaceKey> = None;
        for (key, position) in self.iter() {
            let new_row = previous.map_or(true, |p| p.cmp_row(key).is_ne());
            if new_row {
                rows.push(SurfaceRow {
                    expiry: key.expiry,
                    tenor: key.tenor,
                    values: vec![None; strikes.len()],
                });
            }
            let column = strikes.binary_search(&key.strike).map_err(|_| {
                SurfaceError::key_not_found(key)
            })?;
            if let Some(row) = rows.last_mut() {
                row.values[column] = Some(values[position]);
            }
            previous = Some(key);
        }

        Ok(SurfaceTable {
            has_tenor: self.has_tenor(),
            strikes,
            rows,
        })
    }
}

/// One row of a [`SurfaceTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRow {
    /// Row expiry.
    pub expiry: Period,
    /// Row tenor, if the surface has a tenor dimension.
    pub tenor: Option<Period>,
    /// One entry per strike column; `None` where no quote exists.
    pub values: Vec<Option<f64>>,
}

/// Tabular snapshot of a surface for display and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTable {
    /// Whether rows carry a tenor column.
    pub has_tenor: bool,
    /// Strike column headers, ascending.
    pub strikes: Vec<Decimal>,
    /// Rows in expiry, tenor order.
    pub rows: Vec<SurfaceRow>,
}

impl SurfaceTable {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, including the expiry and tenor label columns.
    pub fn column_count(&self) -> usize {
        self.label_columns() + self.strikes.len()
    }

    fn label_columns(&self) -> usize {
        if self.has_tenor {
            2
        } else {
            1
        }
    }

    /// Renders the table as text cells, header row first.
    ///
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use strata_surfaces::{SurfaceIndex, SurfaceKey};
    ///
    /// let keys = [
    ///     SurfaceKey::parse("1Y", None, dec!(90)).unwrap(),
    ///     SurfaceKey::parse("1Y", None, dec!(110)).unwrap(),
    ///     SurfaceKey::parse("6M", None, dec!(90)).unwrap(),
    /// ];
    /// let index = SurfaceIndex::build(keys).unwrap();
    /// let grid = index.table(&[0.21, 0.19, 0.24]).unwrap().to_grid();
    /// assert_eq!(grid[0], vec!["Expiry", "90", "110"]);
    /// assert_eq!(grid[1], vec!["6M", "0.24", ""]);
    /// assert_eq!(grid[2], vec!["1Y", "0.21", "0.19"]);
    /// ```
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);

        let mut header = vec!["Expiry".to_string()];
        if self.has_tenor {
            header.push("Tenor".to_string());
        }
        header.extend(self.strikes.iter().map(ToString::to_string));
        grid.push(header);

        for row in &self.rows {
            let mut cells = vec![row.expiry.to_string()];
            if self.has_tenor {
                cells.push(row.tenor.map(|t| t.to_string()).unwrap_or_default());
            }
            cells.extend(
                row.values
                    .iter()
                    .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
            );
            grid.push(cells);
        }
        grid
    }
}
