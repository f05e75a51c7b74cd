//! One-pass descriptive statistics over a column or a scoped subset of it.

use crate::element::Numeric;
use crate::error::{Error, Result};
use crate::row_set::RowSet;

/// Every aggregate of a selection, in double precision.
///
/// `variance` is the population variance `Σv²/n − mean²` and `rmse` its square
/// root (the population standard deviation). `skewness` is NaN when the
/// selection has zero spread. A NaN cell makes every aggregate but `count`
/// NaN, `min` and `max` included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub variance: f64,
    pub rms: f64,
    pub rmse: f64,
    pub skewness: f64,
}

#[derive(Debug)]
struct Accumulator {
    count: usize,
    sum: f64,
    sum_sq: f64,
    sum_cube: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            sum_cube: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, v: f64) {
        self.count += 1;
        self.sum += v;
        self.sum_sq += v * v;
        self.sum_cube += v * v * v;
        // NaN sticks, as it does in the sums.
        if v < self.min || v.is_nan() {
            self.min = v;
        }
        if v > self.max || v.is_nan() {
            self.max = v;
        }
    }

    fn finish(self, column: &str) -> Result<Summary> {
        if self.count == 0 {
            return Err(Error::EmptySelection(column.to_string()));
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        let mean_sq = self.sum_sq / n;
        let variance = mean_sq - mean * mean;
        // Rounding can push a zero variance slightly negative.
        let rmse = if variance < 0.0 { 0.0 } else { variance.sqrt() };
        let skewness = if rmse == 0.0 {
            f64::NAN
        } else {
            (self.sum_cube / n - 3.0 * mean * variance - mean * mean * mean) / (rmse * rmse * rmse)
        };
        Ok(Summary {
            count: self.count,
            sum: self.sum,
            min: self.min,
            max: self.max,
            mean,
            variance,
            rms: mean_sq.sqrt(),
            rmse,
            skewness,
        })
    }
}

/// Summarizes `values`, restricted to `scope` when one is given.
///
/// # Errors
/// [Error::EmptySelection] when no row is selected, [Error::IndexOutOfRange]
/// when the scope names a row the column does not have.
pub(crate) fn summarize<T: Numeric>(
    column: &str,
    values: &[T],
    scope: Option<&RowSet>,
) -> Result<Summary> {
    let mut acc = Accumulator::new();
    match scope {
        None => values.iter().for_each(|v| acc.push(v.to_f64())),
        Some(rows) => {
            for row in rows {
                let v = values.get(row).ok_or(Error::IndexOutOfRange {
                    index: row,
                    len: values.len(),
                })?;
                acc.push(v.to_f64());
            }
        }
    }
    acc.finish(column)
}
