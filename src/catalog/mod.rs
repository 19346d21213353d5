//! Appliance catalog queried by the product-enquiry tools.

pub mod tools;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LogiqError, Result};

const SAMPLE_CATALOG: &str = include_str!("../../data/appliances.json");

/// One product offered through LogIQ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    pub brand: String,
    pub name: String,
    pub category: String,
    pub sub_category: String,
    pub price: f64,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub dimensions: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub specifications: serde_json::Map<String, serde_json::Value>,
}

/// Criteria for [`Catalog::filter`]. Unset fields match everything; text
/// comparisons ignore case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplianceFilter {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ApplianceFilter {
    fn matches(&self, appliance: &Appliance) -> bool {
        eq_opt(&self.category, &appliance.category)
            && eq_opt(&self.sub_category, &appliance.sub_category)
            && eq_opt(&self.brand, &appliance.brand)
            && self.color.as_ref().map_or(true, |c| {
                appliance.colors.iter().any(|have| have.eq_ignore_ascii_case(c.trim()))
            })
            && self.min_price.map_or(true, |min| appliance.price >= min)
            && self.max_price.map_or(true, |max| appliance.price <= max)
    }
}

fn eq_opt(wanted: &Option<String>, have: &str) -> bool {
    wanted
        .as_deref()
        .map_or(true, |w| have.eq_ignore_ascii_case(w.trim()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    appliances: Vec<Appliance>,
}

impl Catalog {
    pub fn new(appliances: Vec<Appliance>) -> Self {
        Self { appliances }
    }

    /// The catalog bundled with the crate.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LogiqError::Configuration(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Load `path` when given, otherwise the bundled sample.
    pub fn load_or_sample(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::sample(),
        }
    }

    pub fn len(&self) -> usize {
        self.appliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appliances.is_empty()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.appliances
            .iter()
            .map(|a| a.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct sub-categories of `category`, sorted. Unknown categories give
    /// an empty list.
    pub fn sub_categories(&self, category: &str) -> Vec<String> {
        self.appliances
            .iter()
            .filter(|a| a.category.eq_ignore_ascii_case(category.trim()))
            .map(|a| a.sub_category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Appliances matching `filter`, cheapest first.
    pub fn filter(&self, filter: &ApplianceFilter) -> Vec<&Appliance> {
        let mut found: Vec<&Appliance> = self
            .appliances
            .iter()
            .filter(|a| filter.matches(a))
            .collect();
        found.sort_by(|a, b| a.price.total_cmp(&b.price));
        found
    }

    /// The appliance with `id`, matched case-insensitively.
    pub fn specifications(&self, id: &str) -> Option<&Appliance> {
        self.appliances
            .iter()
            .find(|a| a.id.eq_ignore_ascii_case(id.trim()))
    }
}
