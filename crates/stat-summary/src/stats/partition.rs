//! Splitting a response column into groups keyed by a grouping column.

use super::coercion::coerce;
use crate::dataset::Dataset;
use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Group name used when the grouping cell is absent.
pub const MISSING_GROUP: &str = "NA";

/// Finite response values sharing one grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub values: Vec<f64>,
}

impl Group {
    fn new(name: String) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    /// Number of finite values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Groups in first-seen key order, with a name lookup.
///
/// A group whose key appeared only on rows without a usable response value
/// is kept with an empty series, so the group count reflects every observed
/// category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Partition {
    groups: Vec<Group>,
    #[serde(skip)]
    lookup: HashMap<String, usize>,
}

impl Partition {
    /// Build a partition from `(key, response)` pairs.
    ///
    /// A `None` key goes to the [`MISSING_GROUP`] group. Non-finite responses
    /// still register their key but add no value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Option<String>, f64)>,
    {
        let mut partition = Self::default();
        for (key, value) in pairs {
            partition.push(key.unwrap_or_else(|| MISSING_GROUP.to_string()), value);
        }
        partition
    }

    fn push(&mut self, key: String, value: f64) {
        let index = match self.lookup.get(&key) {
            Some(&index) => index,
            None => {
                let index = self.groups.len();
                self.lookup.insert(key.clone(), index);
                self.groups.push(Group::new(key));
                index
            }
        };
        if value.is_finite() {
            self.groups[index].values.push(value);
        }
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Look a group up by name.
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.lookup.get(name).map(|&index| &self.groups[index])
    }

    /// Group names in first-seen order.
    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Number of groups (`k`).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of finite values across all groups (`N`).
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Every finite value, group by group.
    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.groups.iter().flat_map(|g| g.values.iter().copied())
    }
}

/// Partition `response` by the text of `group` for every row.
///
/// Fails only when either column is not declared in the dataset.
pub fn partition(dataset: &Dataset, response: &str, group: &str) -> Result<Partition> {
    let response_index = dataset.require_column(response)?;
    let group_index = dataset.require_column(group)?;

    Ok(Partition::from_pairs(dataset.rows().iter().map(|row| {
        (
            row.get(group_index).map(str::to_string),
            coerce(row.get(response_index)),
        )
    })))
}

/// A response/grouping column pair chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnovaSelection {
    pub response: String,
    pub group: String,
}

impl AnovaSelection {
    pub fn new(response: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            group: group.into(),
        }
    }

    /// Check that both columns exist and are distinct.
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        dataset.require_column(&self.response)?;
        dataset.require_column(&self.group)?;
        if self.response == self.group {
            return Err(StatsError::InvalidSelection(format!(
                "'{}' cannot be both the response and the grouping column",
                self.response
            )));
        }
        Ok(())
    }

    /// Validate, then partition the dataset.
    pub fn partition(&self, dataset: &Dataset) -> Result<Partition> {
        self.validate(dataset)?;
        partition(dataset, &self.response, &self.group)
    }
}
