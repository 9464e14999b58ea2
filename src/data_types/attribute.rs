//! Attribute vectors: the 1D row/column annotations of the dataset matrix.
//!
//! An attribute is immutable once built. Numeric attributes store `f32`
//! with `NaN` as the missing marker; categorical attributes store indexed
//! string codes where code 0 means missing, mirroring the wire format the
//! dataset server delivers.

use std::collections::HashMap;
use std::hash::Hash;

use eyre::{ensure, Result};

/// One distinct value and its occurrence count, in first-seen order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unique<T> {
    pub value: T,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttrData {
    /// Numeric values, `NaN` marks a missing entry.
    Float(Vec<f32>),
    /// Indexed categories: `codes[i] == 0` is missing, any other code `c`
    /// names `labels[c as usize - 1]`.
    Categorical { codes: Vec<u32>, labels: Vec<String> },
}

/// A named attribute vector plus the metadata painters need: the dynamic
/// range over finite values and, for categorical data, the distinct codes
/// with counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub data: AttrData,
    /// Minimum over finite values, `None` when the vector has none.
    pub min: Option<f32>,
    /// Maximum over finite values, `None` when the vector has none.
    pub max: Option<f32>,
    /// Distinct codes with counts for categorical data, empty for floats.
    pub uniques: Vec<Unique<u32>>,
}

impl Attribute {
    pub fn from_floats(name: impl Into<String>, values: Vec<f32>) -> Self {
        let (min, max) = match finite_min_max(&values) {
            Some((lo, hi)) => (Some(lo), Some(hi)),
            None => (None, None),
        };
        Self {
            name: name.into(),
            data: AttrData::Float(values),
            min,
            max,
            uniques: Vec::new(),
        }
    }

    /// Builds an indexed categorical attribute from raw string values.
    /// Labels are assigned codes in first-seen order; empty strings become
    /// the missing code 0.
    pub fn from_strings<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        let mut labels: Vec<String> = Vec::new();
        let mut index: HashMap<String, u32> = HashMap::new();
        let mut codes = Vec::with_capacity(values.len());
        for v in values {
            let v = v.as_ref();
            if v.is_empty() {
                codes.push(0);
                continue;
            }
            let code = match index.get(v) {
                Some(&c) => c,
                None => {
                    labels.push(v.to_string());
                    let c = labels.len() as u32;
                    index.insert(v.to_string(), c);
                    c
                }
            };
            codes.push(code);
        }
        let uniques = count_elements(&codes)
            .into_iter()
            .filter(|u| u.value != 0)
            .collect::<Vec<_>>();
        let (min, max) = if uniques.is_empty() {
            (None, None)
        } else {
            (Some(1.0), Some(labels.len() as f32))
        };
        Self {
            name: name.into(),
            data: AttrData::Categorical { codes, labels },
            min,
            max,
            uniques,
        }
    }

    /// Builds a categorical attribute from pre-indexed codes.
    pub fn from_codes(
        name: impl Into<String>,
        codes: Vec<u32>,
        labels: Vec<String>,
    ) -> Result<Self> {
        let max_code = codes.iter().copied().max().unwrap_or(0);
        ensure!(
            max_code as usize <= labels.len(),
            "code {} has no label (only {} labels)",
            max_code,
            labels.len()
        );
        let uniques = count_elements(&codes)
            .into_iter()
            .filter(|u| u.value != 0)
            .collect::<Vec<_>>();
        let (min, max) = if uniques.is_empty() {
            (None, None)
        } else {
            // categories plot on a [1, label count] scale
            (Some(1.0), Some(labels.len() as f32))
        };
        Ok(Self {
            name: name.into(),
            data: AttrData::Categorical { codes, labels },
            min,
            max,
            uniques,
        })
    }

    pub fn len(&self) -> usize {
        match &self.data {
            AttrData::Float(v) => v.len(),
            AttrData::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no entry carries a value at all.
    pub fn all_missing(&self) -> bool {
        self.min.is_none()
    }

    /// Numeric view of entry `i`: the float itself, or the category code.
    pub fn float_at(&self, i: usize) -> Option<f32> {
        match &self.data {
            AttrData::Float(v) => v.get(i).copied(),
            AttrData::Categorical { codes, .. } => codes.get(i).map(|&c| c as f32),
        }
    }

    /// Label of the category stored at entry `i`, `None` for missing or
    /// numeric data.
    pub fn label_at(&self, i: usize) -> Option<&str> {
        match &self.data {
            AttrData::Categorical { codes, labels } => match codes.get(i) {
                Some(&c) if c > 0 => labels.get(c as usize - 1).map(|s| s.as_str()),
                _ => None,
            },
            AttrData::Float(_) => None,
        }
    }

    pub fn label_for_code(&self, code: u32) -> Option<&str> {
        match &self.data {
            AttrData::Categorical { labels, .. } if code > 0 => {
                labels.get(code as usize - 1).map(|s| s.as_str())
            }
            _ => None,
        }
    }

    /// Display text of entry `i` for the text painter. Missing entries
    /// yield `None` and are skipped by callers.
    pub fn display_at(&self, i: usize) -> Option<String> {
        match &self.data {
            AttrData::Float(v) => {
                let x = *v.get(i)?;
                x.is_finite().then(|| format_value(x))
            }
            AttrData::Categorical { .. } => self.label_at(i).map(|s| s.to_string()),
        }
    }
}

/// Short numeric formatting used in labels, three significant digits like
/// the viewer always displayed.
pub fn format_value(x: f32) -> String {
    if x == x.trunc() && x.abs() < 1.0e7 {
        format!("{}", x as i64)
    } else {
        format!("{:.3}", x)
    }
}

/// Min and max over the finite entries of `values`.
pub fn finite_min_max(values: &[f32]) -> Option<(f32, f32)> {
    let mut it = values.iter().copied().filter(|v| v.is_finite());
    let first = it.next()?;
    let (mut min, mut max) = (first, first);
    for v in it {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    Some((min, max))
}

/// All distinct values with occurrence counts, in first-seen order.
pub fn count_elements<T: Eq + Hash + Clone>(values: &[T]) -> Vec<Unique<T>> {
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counted: Vec<Unique<T>> = Vec::new();
    for v in values {
        match index.get(v) {
            Some(&i) => counted[i].count += 1,
            None => {
                index.insert(v.clone(), counted.len());
                counted.push(Unique {
                    value: v.clone(),
                    count: 1,
                });
            }
        }
    }
    counted
}

/// The `n` distinct values with the highest occurrence counts, descending.
/// Ties keep first-seen order (the sort is stable over a first-seen-ordered
/// count list).
pub fn n_most_frequent<T: Eq + Hash + Clone>(values: impl Iterator<Item = T>, n: usize) -> Vec<T> {
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counted: Vec<(T, usize)> = Vec::new();
    for v in values {
        match index.get(&v) {
            Some(&i) => counted[i].1 += 1,
            None => {
                index.insert(v.clone(), counted.len());
                counted.push((v, 1));
            }
        }
    }
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted.into_iter().take(n).map(|(v, _)| v).collect()
}

/// The single most common value, ties resolved to the first seen.
pub fn most_frequent<T: Eq + Hash + Clone>(values: impl Iterator<Item = T>) -> Option<T> {
    n_most_frequent(values, 1).into_iter().next()
}
