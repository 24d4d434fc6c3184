//! Tree comparison
//!
//! Classifies the union of two trees' keys into four disjoint, sorted
//! categories. The result depends only on the two key sets and digests.

use crate::tree::Tree;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Classification of one relative path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Identical,
    Different,
    OnlyInLeft,
    OnlyInRight,
}

/// Four disjoint path sets partitioning both trees' keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub identical: Vec<String>,
    pub different: Vec<String>,
    pub only_in_left: Vec<String>,
    pub only_in_right: Vec<String>,
}

impl ComparisonResult {
    /// True when both trees hold the same keys with the same digests
    pub fn is_match(&self) -> bool {
        self.different.is_empty() && self.only_in_left.is_empty() && self.only_in_right.is_empty()
    }

    /// Number of distinct paths across both trees
    pub fn total(&self) -> usize {
        self.identical.len()
            + self.different.len()
            + self.only_in_left.len()
            + self.only_in_right.len()
    }

    /// Paths of one category
    pub fn paths(&self, category: Category) -> &[String] {
        match category {
            Category::Identical => &self.identical,
            Category::Different => &self.different,
            Category::OnlyInLeft => &self.only_in_left,
            Category::OnlyInRight => &self.only_in_right,
        }
    }

    /// Category a path landed in, if it exists on either side
    pub fn category_of(&self, path: &str) -> Option<Category> {
        [
            Category::Identical,
            Category::Different,
            Category::OnlyInLeft,
            Category::OnlyInRight,
        ]
        .into_iter()
        .find(|c| self.paths(*c).binary_search_by(|p| p.as_str().cmp(path)).is_ok())
    }
}

/// Compare two trees
///
/// Both trees iterate in key order, so a single merge pass classifies every
/// path and leaves each category sorted.
pub fn compare(left: &Tree, right: &Tree) -> ComparisonResult {
    let mut result = ComparisonResult::default();
    let mut left_iter = left.entries().peekable();
    let mut right_iter = right.entries().peekable();

    loop {
        match (left_iter.peek(), right_iter.peek()) {
            (Some(l), Some(r)) => match l.relative_path.cmp(&r.relative_path) {
                Ordering::Less => {
                    result.only_in_left.push(l.relative_path.clone());
                    left_iter.next();
                }
                Ordering::Greater => {
                    result.only_in_right.push(r.relative_path.clone());
                    right_iter.next();
                }
                Ordering::Equal => {
                    if l.digest == r.digest {
                        result.identical.push(l.relative_path.clone());
                    } else {
                        result.different.push(l.relative_path.clone());
                    }
                    left_iter.next();
                    right_iter.next();
                }
            },
            (Some(l), None) => {
                result.only_in_left.push(l.relative_path.clone());
                left_iter.next();
            }
            (None, Some(r)) => {
                result.only_in_right.push(r.relative_path.clone());
                right_iter.next();
            }
            (None, None) => break,
        }
    }

    result
}

/// Summary counts of a comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonStats {
    pub total: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub missing_from_right: usize,
    pub missing_from_left: usize,
    /// Directories holding files in the left tree and none in the right
    pub dirs_missing_from_right: usize,
    /// Directories holding files in the right tree and none in the left
    pub dirs_missing_from_left: usize,
}

impl ComparisonStats {
    pub fn new(left: &Tree, right: &Tree, result: &ComparisonResult) -> Self {
        let left_dirs = left.directories();
        let right_dirs = right.directories();

        Self {
            total: result.total(),
            matches: result.identical.len(),
            mismatches: result.different.len(),
            missing_from_right: result.only_in_left.len(),
            missing_from_left: result.only_in_right.len(),
            dirs_missing_from_right: difference_count(&left_dirs, &right_dirs),
            dirs_missing_from_left: difference_count(&right_dirs, &left_dirs),
        }
    }

    pub fn missing(&self) -> usize {
        self.missing_from_left + self.missing_from_right
    }

    /// Share of `count` in the total, 0.0 for an empty comparison
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }
}

fn difference_count(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> usize {
    a.difference(b).count()
}
