use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Dimension, DimensionKind, EntityProfile, FieldValue, Record, Threshold};

/// Stock level below which a medicine is flagged for reorder.
pub const LOW_STOCK_THRESHOLD: u32 = 20;

/// A pharmacy inventory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    /// Inventory code.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Therapeutic category.
    pub category: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Unit price.
    pub price: f64,
    /// Units on hand.
    pub stock: u32,
    /// Expiry date of the current batch.
    pub expiry_date: NaiveDate,
}

impl Medicine {
    /// Search by name, code, category and manufacturer; filter by category,
    /// manufacturer, price, stock flags and expiry.
    pub fn profile() -> EntityProfile {
        EntityProfile::new("medicines")
            .searchable(["name", "id", "category", "manufacturer"])
            .with_dimension(Dimension::on("category", DimensionKind::OneOf))
            .with_dimension(Dimension::on("manufacturer", DimensionKind::Exact))
            .with_dimension(Dimension::on("price", DimensionKind::NumberRange))
            .with_dimension(Dimension::threshold(
                "lowStock",
                "stock",
                Threshold::Below(f64::from(LOW_STOCK_THRESHOLD)),
            ))
            .with_dimension(Dimension::threshold(
                "inStock",
                "stock",
                Threshold::AtLeast(1.0),
            ))
            .with_dimension(Dimension::new("expiry", "expiryDate", DimensionKind::DateRange))
    }

    /// True when at least one unit is on hand.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// True when stock is under [`LOW_STOCK_THRESHOLD`], including when it
    /// has run out.
    pub fn low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// True when the batch has expired on `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }
}

impl Record for Medicine {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "name" => Some(FieldValue::text(&self.name)),
            "category" => Some(FieldValue::text(&self.category)),
            "manufacturer" => Some(FieldValue::text(&self.manufacturer)),
            "price" => Some(FieldValue::Number(self.price)),
            "stock" => Some(FieldValue::Number(f64::from(self.stock))),
            "expiryDate" => Some(FieldValue::Date(self.expiry_date)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{PredicateBuilder, filter_records};
    use crate::types::{FilterCriteria, FilterValue, JsonRecord};

    fn medicine(id: &str, price: f64, stock: u32) -> Medicine {
        Medicine {
            id: id.to_string(),
            name: "Amoxicillin 500mg".to_string(),
            category: "Antibiotic".to_string(),
            manufacturer: "Sandoz".to_string(),
            price,
            stock,
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        }
    }

    #[test]
    fn test_stock_flags() {
        assert!(medicine("m1", 4.5, 0).low_stock());
        assert!(!medicine("m1", 4.5, 0).in_stock());
        assert!(medicine("m2", 4.5, 19).low_stock());
        assert!(!medicine("m3", 4.5, 20).low_stock());
    }

    #[test]
    fn test_flag_and_price_filters() {
        let records = vec![
            medicine("m1", 4.5, 0),
            medicine("m2", 12.0, 5),
            medicine("m3", 8.0, 250),
        ];
        let profile = Medicine::profile();

        let criteria = FilterCriteria::new()
            .with("lowStock", FilterValue::Flag(true))
            .with("inStock", FilterValue::Flag(true));
        let predicate = PredicateBuilder::new(&profile).build(&criteria, "");
        let ids: Vec<&str> = filter_records(&records, &predicate).into_iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["m2"]);

        let criteria = FilterCriteria::parse_assignments(&profile, ["price=..8"]);
        let predicate = PredicateBuilder::new(&profile).build(&criteria, "");
        let ids: Vec<&str> = filter_records(&records, &predicate).into_iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["m1", "m3"]);
    }

    #[test]
    fn test_stock_flags_agree_for_json_records() {
        let typed = vec![
            medicine("m1", 4.5, 0),
            medicine("m2", 12.0, 5),
            medicine("m3", 8.0, 250),
        ];
        let untyped: Vec<JsonRecord> = typed
            .iter()
            .map(|m| JsonRecord::new(serde_json::to_value(m).unwrap()).unwrap())
            .collect();
        let profile = Medicine::profile();

        for assignments in [
            ["lowStock=true", "inStock=yes"],
            ["lowStock=false", "inStock=yes"],
            ["lowStock=true", "inStock=no"],
        ] {
            let criteria = FilterCriteria::parse_assignments(&profile, assignments);
            let predicate = PredicateBuilder::new(&profile).build(&criteria, "");
            let typed_ids: Vec<&str> =
                filter_records(&typed, &predicate).into_iter().map(|m| m.id()).collect();
            let untyped_ids: Vec<&str> =
                filter_records(&untyped, &predicate).into_iter().map(|m| m.id()).collect();
            assert_eq!(typed_ids, untyped_ids, "{assignments:?}");
            assert_eq!(typed_ids.len(), 1, "{assignments:?}");
        }
    }

    #[test]
    fn test_search_matches_manufacturer() {
        let profile = Medicine::profile();
        let predicate = PredicateBuilder::new(&profile).build(&FilterCriteria::new(), "sandoz");
        assert!(predicate.matches(&medicine("m1", 4.5, 3)));
    }
}
