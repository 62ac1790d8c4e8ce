//! Filter engine
//!
//! A pure function of (records, criteria) to the visible subset in store
//! order, plus the display cutoff that slices it. [`ViewState`] holds the
//! criteria for one catalog view and resets the cutoff whenever any
//! criterion changes.

use serde::Serialize;
use shared::catalog::{
    Attribute, CatalogRecord, DEFAULT_PAGE_SIZE, DisplayCutoff, Facet, FilterCriteria, Range,
};

fn matches<R: CatalogRecord>(record: &R, criteria: &FilterCriteria, needle: &str) -> bool {
    if !needle.is_empty() && !record.matches_text(needle) {
        return false;
    }

    let in_ranges = criteria
        .ranges
        .iter()
        .all(|(attribute, range)| range.contains(record.numeric(*attribute)));
    if !in_ranges {
        return false;
    }

    if !criteria.brands.is_empty() && !criteria.brands.contains(record.brand()) {
        return false;
    }

    criteria
        .facets
        .iter()
        .all(|(facet, wanted)| record.facet(*facet).is_some_and(|value| value == wanted.as_str()))
}

/// Records matching every active criterion, in store order
pub fn filter<'a, R: CatalogRecord>(records: &'a [R], criteria: &FilterCriteria) -> Vec<&'a R> {
    let needle = criteria.needle();
    records
        .iter()
        .filter(|record| matches(*record, criteria, &needle))
        .collect()
}

/// The rendered slice of a filtered catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage<'a, R> {
    pub items: Vec<&'a R>,
    /// Records matching the criteria
    pub visible_count: usize,
    /// Matching records cut off by the display bound ("N more")
    pub hidden_count: usize,
}

impl<R> CatalogPage<'_, R> {
    /// Whether a "show more" affordance applies
    pub fn has_more(&self) -> bool {
        self.hidden_count > 0
    }
}

/// Slice a filtered subset at the display cutoff
pub fn paginate<R>(visible: Vec<&R>, cutoff: DisplayCutoff) -> CatalogPage<'_, R> {
    let visible_count = visible.len();
    let shown = cutoff.bound(visible_count);
    let mut items = visible;
    items.truncate(shown);
    CatalogPage {
        items,
        visible_count,
        hidden_count: visible_count - shown,
    }
}

/// Brands present in `records`, first-seen order
pub fn available_brands<R: CatalogRecord>(records: &[R]) -> Vec<&'static str> {
    let mut brands: Vec<&'static str> = Vec::new();
    for record in records {
        let brand = record.brand();
        if !brands.contains(&brand) {
            brands.push(brand);
        }
    }
    brands
}

/// Distinct values of a facet in `records`, first-seen order
pub fn available_values<R: CatalogRecord>(records: &[R], facet: Facet) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in records.iter().filter_map(|r| r.facet(facet)) {
        if !values.iter().any(|v| v.as_str() == value) {
            values.push(value.into_owned());
        }
    }
    values
}

/// Criteria and cutoff for one catalog view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    criteria: FilterCriteria,
    cutoff: DisplayCutoff,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            criteria: FilterCriteria::default(),
            cutoff: DisplayCutoff::Collapsed(page_size),
            page_size,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn cutoff(&self) -> DisplayCutoff {
        self.cutoff
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn criteria_changed(&mut self) {
        self.cutoff = DisplayCutoff::Collapsed(self.page_size);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.criteria_changed();
    }

    pub fn set_range(&mut self, attribute: Attribute, range: Range) {
        self.criteria.set_range(attribute, range);
        self.criteria_changed();
    }

    /// Set a range from raw min/max input
    pub fn set_range_input(&mut self, attribute: Attribute, min: &str, max: &str) {
        self.set_range(attribute, Range::parse(min, max));
    }

    /// Add or remove a brand from the selection
    pub fn toggle_brand(&mut self, brand: &str) {
        if !self.criteria.brands.remove(brand) {
            self.criteria.brands.insert(brand.to_string());
        }
        self.criteria_changed();
    }

    /// `None` selects "All"
    pub fn set_facet(&mut self, facet: Facet, value: Option<String>) {
        self.criteria.set_facet(facet, value);
        self.criteria_changed();
    }

    /// Reset every criterion including the search text
    pub fn clear(&mut self) {
        self.criteria = FilterCriteria::default();
        self.criteria_changed();
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }

    pub fn show_all(&mut self) {
        self.cutoff = DisplayCutoff::Unbounded;
    }

    pub fn collapse(&mut self) {
        self.cutoff = DisplayCutoff::Collapsed(self.page_size);
    }

    pub fn toggle_show_all(&mut self) {
        match self.cutoff {
            DisplayCutoff::Unbounded => self.collapse(),
            DisplayCutoff::Collapsed(_) => self.show_all(),
        }
    }

    /// Filter and slice a snapshot
    pub fn page<'a, R: CatalogRecord>(&self, records: &'a [R]) -> CatalogPage<'a, R> {
        paginate(filter(records, &self.criteria), self.cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared::models::{Tyre, Vehicle};

    fn bike(id: usize, name: &str, price: &str, engine: &str) -> Vehicle {
        serde_json::from_value(json!({
            "_id": id.to_string(),
            "name": name,
            "finalPrice": price,
            "specs": { "engine": engine }
        }))
        .unwrap()
    }

    fn showroom() -> Vec<Vehicle> {
        vec![
            bike(1, "Yamaha R15 V4", "₹1,82,000", "155 cc"),
            bike(2, "Honda Shine", "₹79,800", "124 cc"),
            bike(3, "Bajaj Pulsar NS200", "₹1,42,000", "199.5 cc"),
            bike(4, "Royal Enfield Classic 350", "₹1,93,000", "349 cc"),
            bike(5, "TVS Apache RTR 160", "₹1,20,000", "159.7 cc"),
            bike(6, "Hero Splendor Plus", "₹75,000", "97.2 cc"),
            bike(7, "KTM Duke 390", "₹3,10,000", "373 cc"),
            bike(8, "Suzuki Access 125", "₹80,700", "124 cc"),
            bike(9, "Kawasaki Ninja 300", "N/A", "296 cc"),
            bike(10, "Ather 450X", "", ""),
        ]
    }

    fn ids<R: CatalogRecord>(records: &[&R]) -> Vec<String> {
        records.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_empty_criteria_returns_everything_in_order() {
        let records = showroom();
        let visible = filter(&records, &FilterCriteria::default());
        assert_eq!(ids(&visible), (1..=10).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = showroom();
        let criteria = FilterCriteria::new().with_search("APACHE");
        assert_eq!(ids(&filter(&records, &criteria)), vec!["5"]);

        // 原样匹配，不裁剪空白
        let criteria = FilterCriteria::new().with_search(" Apache RTR");
        assert_eq!(ids(&filter(&records, &criteria)), vec!["5"]);
        let criteria = FilterCriteria::new().with_search("  apache");
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn test_tyre_search_spans_brand_and_model() {
        let tyres: Vec<Tyre> = serde_json::from_value(json!([
            { "_id": "a", "brand": "MRF", "model": "ZVTV", "size": "185/65R15" },
            { "_id": "b", "brand": "CEAT", "model": "SecuraDrive", "size": "205/55R16" }
        ]))
        .unwrap();

        let full_name = tyres[0].display_name().into_owned();
        assert_eq!(full_name, "MRF ZVTV");
        let criteria = FilterCriteria::new().with_search(full_name);
        assert_eq!(ids(&filter(&tyres, &criteria)), vec!["a"]);

        let criteria = FilterCriteria::new().with_search("ceat secura");
        assert_eq!(ids(&filter(&tyres, &criteria)), vec!["b"]);
    }

    #[test]
    fn test_price_range_inclusive_with_unparsable_as_zero() {
        let records = showroom();
        let criteria = FilterCriteria::new().with_range(Attribute::Price, Range::parse("", "80,700"));
        // N/A and blank prices extract to 0 and fall inside an open lower bound
        assert_eq!(ids(&filter(&records, &criteria)), vec!["2", "6", "8", "9", "10"]);

        let criteria =
            FilterCriteria::new().with_range(Attribute::Price, Range::parse("79800", "142000"));
        assert_eq!(ids(&filter(&records, &criteria)), vec!["2", "3", "5", "8"]);
    }

    #[test]
    fn test_engine_range_uses_decimals() {
        let records = showroom();
        let criteria = FilterCriteria::new().with_range(
            Attribute::Engine,
            Range::new(Some(Decimal::new(1595, 1)), Some(Decimal::from(200))),
        );
        assert_eq!(ids(&filter(&records, &criteria)), vec!["3", "5"]);
    }

    #[test]
    fn test_brand_selection() {
        let records = showroom();
        let criteria = FilterCriteria::new().with_brand("Honda").with_brand("Other");
        assert_eq!(ids(&filter(&records, &criteria)), vec!["2", "10"]);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let records = showroom();
        let criteria = FilterCriteria::new()
            .with_search("1")
            .with_range(Attribute::Engine, Range::parse("150", ""))
            .with_brand("Yamaha");
        assert_eq!(ids(&filter(&records, &criteria)), vec!["1"]);
    }

    #[test]
    fn test_filter_is_idempotent_subset() {
        let records = showroom();
        let criteria = FilterCriteria::new().with_range(Attribute::Price, Range::parse("1,00,000", ""));
        let once: Vec<Vehicle> = filter(&records, &criteria).into_iter().cloned().collect();
        let twice: Vec<Vehicle> = filter(&once, &criteria).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert!(once.iter().all(|r| records.contains(r)));
    }

    #[test]
    fn test_tyre_facets_and_size_search() {
        let tyres: Vec<Tyre> = serde_json::from_value(json!([
            { "_id": "a", "brand": "MRF", "model": "Nylogrip", "size": "90/90-17", "type": "Tube Type" },
            { "_id": "b", "brand": "CEAT", "model": "Milaze", "size": "195/65R15", "type": "Tubeless" },
            { "_id": "c", "brand": "Apollo", "model": "Apterra", "size": "265/65R17", "type": "Tubeless" },
            { "_id": "d", "brand": "Michelin", "model": "Pilot", "size": "", "type": "" }
        ]))
        .unwrap();

        let car = FilterCriteria::new().with_facet(Facet::VehicleClass, "Car");
        assert_eq!(ids(&filter(&tyres, &car)), vec!["b"]);

        let other = FilterCriteria::new().with_facet(Facet::VehicleClass, "Other");
        assert_eq!(ids(&filter(&tyres, &other)), vec!["c", "d"]);

        let tubeless = FilterCriteria::new().with_facet(Facet::TyreType, "Tubeless");
        assert_eq!(ids(&filter(&tyres, &tubeless)), vec!["b", "c"]);

        let by_size = FilterCriteria::new().with_search("R15");
        assert_eq!(ids(&filter(&tyres, &by_size)), vec!["b"]);

        assert_eq!(available_values(&tyres, Facet::TyreType), vec!["Tube Type", "Tubeless"]);
        assert_eq!(available_brands(&tyres), vec!["MRF", "CEAT", "Apollo", "Michelin"]);
    }

    #[test]
    fn test_pagination_collapsed_and_show_all() {
        let records = showroom();
        let mut view = ViewState::default();

        let page = view.page(&records);
        assert_eq!(page.items.len(), 8);
        assert_eq!(page.hidden_count, 2);
        assert!(page.has_more());

        view.show_all();
        let page = view.page(&records);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.hidden_count, 0);

        view.toggle_show_all();
        assert_eq!(view.page(&records).items.len(), 8);
    }

    #[test]
    fn test_any_criterion_change_resets_cutoff() {
        let records = showroom();
        let mut view = ViewState::default();

        view.show_all();
        view.set_search("a");
        assert_eq!(view.cutoff(), DisplayCutoff::Collapsed(8));
        let expected = filter(&records, view.criteria()).len().min(8);
        assert_eq!(view.page(&records).items.len(), expected);

        view.show_all();
        view.toggle_brand("Honda");
        assert_eq!(view.cutoff(), DisplayCutoff::Collapsed(8));

        view.show_all();
        view.set_range_input(Attribute::Price, "1", "");
        assert_eq!(view.cutoff(), DisplayCutoff::Collapsed(8));

        view.show_all();
        view.set_facet(Facet::TyreType, None);
        assert_eq!(view.cutoff(), DisplayCutoff::Collapsed(8));

        view.show_all();
        view.clear();
        assert_eq!(view.cutoff(), DisplayCutoff::Collapsed(8));
        assert!(!view.has_active_filters());
    }

    #[test]
    fn test_show_all_with_short_result_renders_everything() {
        let records = showroom();
        let mut view = ViewState::default();
        view.show_all();
        // shrink the underlying set without touching criteria
        let short = &records[..3];
        let page = view.page(short);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.hidden_count, 0);
    }

    #[test]
    fn test_toggle_brand_twice_removes_it() {
        let mut view = ViewState::default();
        view.toggle_brand("KTM");
        assert!(view.has_active_filters());
        view.toggle_brand("KTM");
        assert!(!view.has_active_filters());
    }
}
