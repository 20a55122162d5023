//! Normalized destination records and the flattening of a [`RawDataset`] into them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dataset::RawDataset;
use crate::dataset::types::RawPlace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Category {
    City,
    Temple,
    Beach,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::City => "City",
            Category::Temple => "Temple",
            Category::Beach => "Beach",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown category '{0}': expected City, Temple, or Beach")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "city" => Ok(Category::City),
            "temple" => Ok(Category::Temple),
            "beach" => Ok(Category::Beach),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// One city, temple, or beach with uniform fields.
///
/// `parent_name` holds the owning country for cities and is empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationRecord {
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub category: Category,
    pub parent_name: String,
}

impl DestinationRecord {
    fn from_place(place: &RawPlace, category: Category, parent_name: &str) -> Self {
        Self {
            name: place.name.clone(),
            image_url: place.image_url.clone(),
            description: place.description.clone(),
            category,
            parent_name: parent_name.to_string(),
        }
    }
}

/// Flatten the dataset: every city (country by country, in source order),
/// then temples, then beaches. No deduplication, no field validation.
pub fn normalize(raw: &RawDataset) -> Vec<DestinationRecord> {
    let cities = raw.countries.iter().flat_map(|country| {
        country
            .cities
            .iter()
            .map(|city| DestinationRecord::from_place(city, Category::City, &country.name))
    });
    let temples = raw
        .temples
        .iter()
        .map(|temple| DestinationRecord::from_place(temple, Category::Temple, ""));
    let beaches = raw
        .beaches
        .iter()
        .map(|beach| DestinationRecord::from_place(beach, Category::Beach, ""));

    cities.chain(temples).chain(beaches).collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_or_omitted_lists_yield_no_records() {
        for doc in [
            json!({}),
            json!({"countries": [], "temples": [], "beaches": []}),
            json!({"countries": [{"name": "Japan", "cities": []}]}),
            json!({"temples": null}),
        ] {
            assert!(normalize(&RawDataset::from_value(doc.clone())).is_empty(), "{doc}");
        }
    }

    #[test]
    fn record_count_matches_leaf_count() {
        let raw = fixtures::sample_raw();
        let cities: usize = raw.countries.iter().map(|c| c.cities.len()).sum();
        let records = normalize(&raw);
        assert_eq!(records.len(), cities + raw.temples.len() + raw.beaches.len());
        assert_eq!(records.len(), 7);
    }

    #[test]
    fn cities_carry_country_name_and_others_do_not() {
        let records = normalize(&fixtures::sample_raw());
        for record in &records {
            match record.category {
                Category::City => assert!(!record.parent_name.is_empty(), "{record:?}"),
                Category::Temple | Category::Beach => assert_eq!(record.parent_name, ""),
            }
        }
        assert_eq!(records[0].parent_name, "Australia");
        assert_eq!(records[2].parent_name, "Italy");
    }

    #[test]
    fn preserves_source_order_cities_then_temples_then_beaches() {
        let records = normalize(&fixtures::sample_raw());
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Sydney, Australia",
                "Melbourne, Australia",
                "Rome",
                "Angkor Wat, Cambodia",
                "Taj Mahal, India",
                "Bora Bora, French Polynesia",
                "Copacabana Beach, Brazil",
            ]
        );
        let categories: Vec<_> = records.iter().map(|r| r.category).collect();
        assert!(categories.is_sorted(), "categories out of order: {categories:?}");
    }

    #[test]
    fn copies_fields_verbatim() {
        let raw = RawDataset::from_value(json!({
            "countries": [{"name": "Japan", "cities": [
                {"name": "Tokyo", "imageUrl": "t.jpg", "description": "Capital"}
            ]}],
            "temples": [{"name": "Temple A", "imageUrl": "a.jpg", "description": "Ancient"}],
            "beaches": []
        }));

        let records = normalize(&raw);
        assert_eq!(
            records,
            [
                DestinationRecord {
                    name: "Tokyo".into(),
                    image_url: "t.jpg".into(),
                    description: "Capital".into(),
                    category: Category::City,
                    parent_name: "Japan".into(),
                },
                DestinationRecord {
                    name: "Temple A".into(),
                    image_url: "a.jpg".into(),
                    description: "Ancient".into(),
                    category: Category::Temple,
                    parent_name: String::new(),
                },
            ]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let place = json!({"name": "Same", "imageUrl": "s.jpg", "description": "Twice"});
        let raw = RawDataset::from_value(json!({"beaches": [place.clone(), place]}));
        assert_eq!(normalize(&raw).len(), 2);
    }

    #[test]
    fn leaf_without_fields_passes_through_empty() {
        let raw = RawDataset::from_value(json!({"temples": [{}]}));
        let records = normalize(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "");
        assert_eq!(records[0].category, Category::Temple);
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let records = normalize(&fixtures::sample_raw());
        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["imageUrl"], "sydney.jpg");
        assert_eq!(value["parentName"], "Australia");
        assert_eq!(value["category"], "City");
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("beach".parse::<Category>().unwrap(), Category::Beach);
        assert_eq!(" Temple ".parse::<Category>().unwrap(), Category::Temple);
        assert_eq!("CITY".parse::<Category>().unwrap(), Category::City);
        assert!("country".parse::<Category>().is_err());
    }
}
