//! Course selection and the course fee aggregator
//!
//! Selecting courses on the enrollment form adjusts the total fees
//! incrementally: toggling a course on adds its price, toggling it off
//! subtracts it (never below zero). Because the total is adjusted rather than
//! recomputed, a hand-edited total survives later course toggles.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{CourseId, Currency, Money};

use crate::error::FeeError;

/// Separator used when the selection is stored in a single backend field
pub const TITLE_SEPARATOR: &str = ", ";

/// A course as offered for selection on the enrollment form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCourse {
    pub id: CourseId,
    pub title: String,
    pub price: Money,
}

impl SelectedCourse {
    pub fn new(id: CourseId, title: impl Into<String>, price: Money) -> Result<Self, FeeError> {
        if price.is_negative() {
            return Err(FeeError::NegativeAmount(price.amount()));
        }
        Ok(Self {
            id,
            title: title.into().trim().to_string(),
            price,
        })
    }
}

/// Ordered set of selected course titles
///
/// Titles keep the order in which they were selected and appear at most
/// once. The backend stores the selection as one comma-joined string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CourseSelection {
    titles: Vec<String>,
}

impl CourseSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-joined title list, dropping blanks and repeats
    pub fn parse(joined: &str) -> Self {
        let mut selection = Self::new();
        for title in joined.split(',') {
            selection.insert(title);
        }
        selection
    }

    /// Adds a title at the end; returns false if blank or already present
    pub fn insert(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() || self.contains(title) {
            return false;
        }
        self.titles.push(title.to_string());
        true
    }

    /// Removes a title; returns false if it was not selected
    pub fn remove(&mut self, title: &str) -> bool {
        let title = title.trim();
        let before = self.titles.len();
        self.titles.retain(|t| t != title);
        self.titles.len() != before
    }

    pub fn contains(&self, title: &str) -> bool {
        let title = title.trim();
        self.titles.iter().any(|t| t == title)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Canonical comma-joined form, e.g. `"Python, Data Science"`
    pub fn joined(&self) -> String {
        self.titles.join(TITLE_SEPARATOR)
    }
}

impl fmt::Display for CourseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<String> for CourseSelection {
    fn from(joined: String) -> Self {
        CourseSelection::parse(&joined)
    }
}

impl From<CourseSelection> for String {
    fn from(selection: CourseSelection) -> Self {
        selection.joined()
    }
}

impl<'a> FromIterator<&'a str> for CourseSelection {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut selection = CourseSelection::new();
        for title in iter {
            selection.insert(title);
        }
        selection
    }
}

/// Whether a toggle added or removed the course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleChange {
    Added,
    Removed,
}

/// Outcome of toggling one course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseToggle {
    pub selection: CourseSelection,
    pub total_fees: Money,
    pub change: ToggleChange,
}

/// Keeps total fees in step with the course selection
pub struct CourseFeeAggregator;

impl CourseFeeAggregator {
    /// Toggles a course in or out of the selection and adjusts the total
    ///
    /// # Arguments
    ///
    /// * `selection` - Current selection (not modified)
    /// * `total` - Current total fees, possibly hand-edited
    /// * `course` - The course that was clicked
    ///
    /// # Returns
    ///
    /// The new selection and total. Removing a course subtracts its price
    /// clamped at zero; adding a course adds its price once.
    pub fn toggle(
        selection: &CourseSelection,
        total: &Money,
        course: &SelectedCourse,
    ) -> Result<CourseToggle, FeeError> {
        let mut next = selection.clone();

        if next.remove(&course.title) {
            Ok(CourseToggle {
                selection: next,
                total_fees: total.saturating_sub(&course.price)?,
                change: ToggleChange::Removed,
            })
        } else {
            next.insert(&course.title);
            Ok(CourseToggle {
                selection: next,
                total_fees: total.checked_add(&course.price)?,
                change: ToggleChange::Added,
            })
        }
    }

    /// Sums course prices from scratch, for a form opened with courses pre-selected
    pub fn sum_prices<'a, I>(courses: I, currency: Currency) -> Result<Money, FeeError>
    where
        I: IntoIterator<Item = &'a SelectedCourse>,
    {
        Ok(Money::sum(courses.into_iter().map(|c| &c.price), currency)?)
    }

    /// Looks up the catalogue entries for the titles in a selection, in selection order
    pub fn resolve<'a>(
        selection: &CourseSelection,
        catalogue: &'a [SelectedCourse],
    ) -> Vec<&'a SelectedCourse> {
        selection
            .titles()
            .iter()
            .filter_map(|title| catalogue.iter().find(|c| &c.title == title))
            .collect()
    }
}
