//! Filter criteria and display cutoff

use super::{Attribute, Facet, extract::parse_bound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default number of records shown before "show more"
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Inclusive numeric range; a missing bound is unbounded on that side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl Range {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    /// Build from raw form input (blank = unbounded)
    pub fn parse(min: &str, max: &str) -> Self {
        Self {
            min: parse_bound(min),
            max: parse_bound(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Everything that narrows the visible subset of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub ranges: BTreeMap<Attribute, Range>,
    /// Selected brands; empty means no constraint
    pub brands: BTreeSet<String>,
    /// Selected facet values; a missing key means "All"
    pub facets: BTreeMap<Facet, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_range(mut self, attribute: Attribute, range: Range) -> Self {
        self.set_range(attribute, range);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    pub fn with_facet(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.set_facet(facet, Some(value.into()));
        self
    }

    /// Unbounded ranges are dropped so they never count as active
    pub fn set_range(&mut self, attribute: Attribute, range: Range) {
        if range.is_unbounded() {
            self.ranges.remove(&attribute);
        } else {
            self.ranges.insert(attribute, range);
        }
    }

    /// `None` (or "All") clears the facet
    pub fn set_facet(&mut self, facet: Facet, value: Option<String>) {
        match value {
            Some(v) if !v.trim().is_empty() && !v.eq_ignore_ascii_case("all") => {
                self.facets.insert(facet, v);
            }
            _ => {
                self.facets.remove(&facet);
            }
        }
    }

    /// Search needle as matched against records (raw text, lowercased)
    pub fn needle(&self) -> String {
        self.search_text.to_lowercase()
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_text.is_empty()
            || !self.ranges.is_empty()
            || !self.brands.is_empty()
            || !self.facets.is_empty()
    }
}

/// How much of the visible subset is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCutoff {
    /// First K records
    Collapsed(usize),
    /// Everything ("show all")
    Unbounded,
}

impl Default for DisplayCutoff {
    fn default() -> Self {
        DisplayCutoff::Collapsed(DEFAULT_PAGE_SIZE)
    }
}

impl DisplayCutoff {
    /// Number of records to render out of `visible`
    pub fn bound(&self, visible: usize) -> usize {
        match self {
            DisplayCutoff::Collapsed(k) => visible.min(*k),
            DisplayCutoff::Unbounded => visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_inclusive() {
        let range = Range::new(Some(Decimal::from(100)), Some(Decimal::from(200)));
        assert!(range.contains(Decimal::from(100)));
        assert!(range.contains(Decimal::from(200)));
        assert!(!range.contains(Decimal::from(99)));
        assert!(!range.contains(Decimal::from(201)));
    }

    #[test]
    fn test_range_open_ends() {
        let min_only = Range::parse("50000", "");
        assert!(min_only.contains(Decimal::from(1_000_000)));
        assert!(!min_only.contains(Decimal::from(49_999)));

        let max_only = Range::parse(" ", "₹1,00,000");
        assert!(max_only.contains(Decimal::ZERO));
        assert!(!max_only.contains(Decimal::from(100_001)));

        assert!(Range::parse("", "").is_unbounded());
    }

    #[test]
    fn test_unbounded_range_is_not_active() {
        let mut criteria = FilterCriteria::new();
        criteria.set_range(Attribute::Price, Range::default());
        assert!(!criteria.has_active_filters());

        criteria.set_range(Attribute::Price, Range::parse("1", ""));
        assert!(criteria.has_active_filters());
    }

    #[test]
    fn test_facet_all_clears() {
        let mut criteria = FilterCriteria::new().with_facet(Facet::TyreType, "Tubeless");
        assert!(criteria.has_active_filters());
        criteria.set_facet(Facet::TyreType, Some("All".to_string()));
        assert!(criteria.facets.is_empty());
    }

    #[test]
    fn test_search_text_is_matched_raw() {
        assert!(!FilterCriteria::new().with_search("").has_active_filters());
        let criteria = FilterCriteria::new().with_search(" R15 ");
        assert!(criteria.has_active_filters());
        assert_eq!(criteria.needle(), " r15 ");
    }

    #[test]
    fn test_cutoff_bound() {
        assert_eq!(DisplayCutoff::default().bound(10), 8);
        assert_eq!(DisplayCutoff::default().bound(3), 3);
        assert_eq!(DisplayCutoff::Unbounded.bound(10), 10);
    }
}
