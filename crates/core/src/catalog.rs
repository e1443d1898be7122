//! Catalog value types: products, box templates and the category
//! incompatibility table.
//!
//! These are read-only inputs to every packing component. The only mutation
//! a product ever sees is the one-time rewrite of its incompatibility set by
//! the compatibility resolver.

use crate::{Error, Result};
use nalgebra::Vector3;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Product category name.
pub type Category = String;

/// A packable product.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Product {
    /// Display name (not required to be unique).
    name: String,

    /// Category used for compatibility checks.
    category: Category,

    /// Length (x extent before rotation).
    length: u64,

    /// Width (y extent before rotation).
    width: u64,

    /// Height (z extent before rotation).
    height: u64,

    /// Weight.
    weight: f64,

    /// Categories this product must never share a box with.
    incompatible_with: BTreeSet<Category>,

    /// Fragile products never share a box with non-fragile ones.
    fragile: bool,
}

impl Product {
    /// Creates a new non-fragile product with no incompatibilities.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<Category>,
        length: u64,
        width: u64,
        height: u64,
        weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            length,
            width,
            height,
            weight,
            incompatible_with: BTreeSet::new(),
            fragile: false,
        }
    }

    /// Sets the categories this product is incompatible with.
    pub fn with_incompatible<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.incompatible_with = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the fragility flag.
    pub fn with_fragile(mut self, fragile: bool) -> Self {
        self.fragile = fragile;
        self
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the category.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the length.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Returns the width.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Returns the height.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Returns the dimensions (length, width, height).
    pub fn dimensions(&self) -> Vector3<u64> {
        Vector3::new(self.length, self.width, self.height)
    }

    /// Returns the volume `length * width * height`.
    pub fn volume(&self) -> u64 {
        self.length
            .saturating_mul(self.width)
            .saturating_mul(self.height)
    }

    /// Returns the weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns true if the product is fragile.
    pub fn is_fragile(&self) -> bool {
        self.fragile
    }

    /// Returns the categories this product is incompatible with.
    pub fn incompatible_with(&self) -> &BTreeSet<Category> {
        &self.incompatible_with
    }

    /// Replaces the incompatibility set.
    pub fn set_incompatible_with(&mut self, categories: BTreeSet<Category>) {
        self.incompatible_with = categories;
    }

    /// Returns true if neither product lists the other's category as
    /// incompatible.
    pub fn is_compatible_with(&self, other: &Product) -> bool {
        !self.incompatible_with.contains(&other.category)
            && !other.incompatible_with.contains(&self.category)
    }

    /// Validates the product.
    pub fn validate(&self) -> Result<()> {
        if self.length == 0 || self.width == 0 || self.height == 0 {
            return Err(Error::InvalidProduct(format!(
                "All dimensions for '{}' must be positive",
                self.name
            )));
        }

        if !(self.weight > 0.0) || !self.weight.is_finite() {
            return Err(Error::InvalidProduct(format!(
                "Weight for '{}' must be positive",
                self.name
            )));
        }

        Ok(())
    }
}

/// A box template: static configuration from which box instances are opened.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxTemplate {
    name: String,
    length: u64,
    width: u64,
    height: u64,
    max_weight: f64,
    /// Display priority (ascending = larger/first).
    priority: u32,
}

impl BoxTemplate {
    /// Creates a new box template.
    pub fn new(
        name: impl Into<String>,
        length: u64,
        width: u64,
        height: u64,
        max_weight: f64,
        priority: u32,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            width,
            height,
            max_weight,
            priority,
        }
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the length.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Returns the width.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Returns the height.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Returns the interior dimensions (length, width, height).
    pub fn dimensions(&self) -> Vector3<u64> {
        Vector3::new(self.length, self.width, self.height)
    }

    /// Returns the interior volume.
    pub fn volume(&self) -> u64 {
        self.length
            .saturating_mul(self.width)
            .saturating_mul(self.height)
    }

    /// Returns the maximum weight.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Returns the display priority.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns true if the template admits the given volume and weight.
    pub fn admits(&self, volume: u64, weight: f64) -> bool {
        self.volume() >= volume && self.max_weight >= weight
    }

    /// Validates the template.
    ///
    /// Volume and maximum weight must both be positive.
    pub fn validate(&self) -> Result<()> {
        if self.volume() == 0 {
            return Err(Error::InvalidTemplate(format!(
                "Volume of '{}' must be positive",
                self.name
            )));
        }

        if !(self.max_weight > 0.0) || !self.max_weight.is_finite() {
            return Err(Error::InvalidTemplate(format!(
                "Maximum weight of '{}' must be positive",
                self.name
            )));
        }

        Ok(())
    }
}

/// An ordered, validated, non-empty set of box templates.
///
/// The given order is authoritative for the coarse assigner: the first
/// template that admits a product wins.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TemplateSet {
    templates: Vec<BoxTemplate>,
    /// Index of the largest template by (volume, max weight).
    largest: usize,
}

impl TemplateSet {
    /// Creates a template set, validating every template.
    pub fn new(templates: Vec<BoxTemplate>) -> Result<Self> {
        if templates.is_empty() {
            return Err(Error::EmptyCatalog(
                "At least one box template is required".into(),
            ));
        }

        for template in &templates {
            template.validate()?;
        }

        let mut largest = 0;
        for (idx, template) in templates.iter().enumerate() {
            if size_key(template) > size_key(&templates[largest]) {
                largest = idx;
            }
        }

        Ok(Self { templates, largest })
    }

    /// Returns the templates in their configured order.
    pub fn as_slice(&self) -> &[BoxTemplate] {
        &self.templates
    }

    /// Iterates over the templates in their configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, BoxTemplate> {
        self.templates.iter()
    }

    /// Returns the number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if the set holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Returns the largest template by (volume, max weight).
    pub fn largest(&self) -> &BoxTemplate {
        &self.templates[self.largest]
    }

    /// Returns the first template, in configured order, that admits the
    /// given volume and weight.
    pub fn first_admitting(&self, volume: u64, weight: f64) -> Option<&BoxTemplate> {
        self.templates.iter().find(|t| t.admits(volume, weight))
    }

    /// Returns every template except the largest, smallest first.
    pub fn smaller_ascending(&self) -> Vec<&BoxTemplate> {
        let mut smaller: Vec<&BoxTemplate> = self
            .templates
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != self.largest)
            .map(|(_, t)| t)
            .collect();
        smaller.sort_by(|a, b| {
            size_key(a)
                .partial_cmp(&size_key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        smaller
    }

    /// Returns true if the product exceeds the largest template in volume,
    /// weight, or any single unrotated dimension.
    pub fn exceeds_largest(&self, product: &Product) -> bool {
        let largest = self.largest();
        product.volume() > largest.volume()
            || product.weight() > largest.max_weight()
            || product.length() > largest.length()
            || product.width() > largest.width()
            || product.height() > largest.height()
    }
}

impl<'a> IntoIterator for &'a TemplateSet {
    type Item = &'a BoxTemplate;
    type IntoIter = std::slice::Iter<'a, BoxTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

fn size_key(template: &BoxTemplate) -> (u64, f64) {
    (template.volume(), template.max_weight())
}

/// Category → incompatible categories.
///
/// Entries are honored as given: an asymmetric table (A lists B but B does
/// not list A) still makes A and B incompatible, because every check looks
/// in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IncompatibilityTable {
    rules: BTreeMap<Category, BTreeSet<Category>>,
}

impl IncompatibilityTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, replacing any previous entry for the category.
    pub fn with_rule<I, C>(mut self, category: impl Into<Category>, incompatible: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.insert(category, incompatible);
        self
    }

    /// Inserts a rule, replacing any previous entry for the category.
    pub fn insert<I, C>(&mut self, category: impl Into<Category>, incompatible: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.rules.insert(
            category.into(),
            incompatible.into_iter().map(Into::into).collect(),
        );
    }

    /// Returns the entry for a category, if any.
    pub fn get(&self, category: &str) -> Option<&BTreeSet<Category>> {
        self.rules.get(category)
    }

    /// Returns true if neither category lists the other.
    pub fn are_compatible(&self, a: &str, b: &str) -> bool {
        let lists = |from: &str, to: &str| self.rules.get(from).is_some_and(|s| s.contains(to));
        !lists(a, b) && !lists(b, a)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<C, I> FromIterator<(C, I)> for IncompatibilityTable
where
    C: Into<Category>,
    I: IntoIterator,
    I::Item: Into<Category>,
{
    fn from_iter<T: IntoIterator<Item = (C, I)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (category, incompatible) in iter {
            table.insert(category, incompatible);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_product_volume() {
        let p = Product::new("Laptop", "Electronics", 30, 20, 2, 2.5);
        assert_eq!(p.volume(), 1200);
        assert_relative_eq!(p.weight(), 2.5);
        assert!(!p.is_fragile());
    }

    #[test]
    fn test_product_compatibility_is_symmetric() {
        let food = Product::new("Honey", "Food", 25, 10, 10, 1.2).with_incompatible(["Detergent"]);
        let soap = Product::new("Cleaner", "Detergent", 25, 15, 15, 1.7);

        assert!(!food.is_compatible_with(&soap));
        assert!(!soap.is_compatible_with(&food));

        let cheese = Product::new("Cheese", "Food", 20, 15, 3, 0.5);
        assert!(food.is_compatible_with(&cheese));
    }

    #[test]
    fn test_product_validation() {
        assert!(Product::new("ok", "A", 1, 1, 1, 0.1).validate().is_ok());
        assert!(Product::new("flat", "A", 0, 1, 1, 0.1).validate().is_err());
        assert!(Product::new("weightless", "A", 1, 1, 1, 0.0).validate().is_err());
        assert!(Product::new("nan", "A", 1, 1, 1, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_template_validation() {
        assert!(BoxTemplate::new("S", 10, 10, 10, 2.0, 1).validate().is_ok());
        assert!(BoxTemplate::new("Z", 10, 0, 10, 2.0, 1).validate().is_err());
        assert!(BoxTemplate::new("W", 10, 10, 10, 0.0, 1).validate().is_err());
        assert!(BoxTemplate::new("N", 10, 10, 10, -1.0, 1).validate().is_err());
    }

    #[test]
    fn test_template_set_rejects_empty_and_invalid() {
        assert!(matches!(
            TemplateSet::new(Vec::new()),
            Err(Error::EmptyCatalog(_))
        ));
        assert!(matches!(
            TemplateSet::new(vec![BoxTemplate::new("W", 10, 10, 10, 0.0, 1)]),
            Err(Error::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_template_set_largest_and_ordering() {
        let set = TemplateSet::new(vec![
            BoxTemplate::new("Medium", 30, 30, 30, 5.0, 3),
            BoxTemplate::new("XLarge", 70, 70, 70, 15.0, 1),
            BoxTemplate::new("Small", 20, 20, 20, 2.0, 4),
            BoxTemplate::new("Large", 50, 50, 50, 10.0, 2),
        ])
        .unwrap();

        assert_eq!(set.largest().name(), "XLarge");

        let names: Vec<&str> = set.smaller_ascending().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Small", "Medium", "Large"]);

        // Configured order wins, not the tightest fit.
        assert_eq!(set.first_admitting(100, 1.0).unwrap().name(), "Medium");
        assert!(set.first_admitting(1_000_000, 1.0).is_none());
    }

    #[test]
    fn test_exceeds_largest_per_axis() {
        let set = TemplateSet::new(vec![BoxTemplate::new("Box", 50, 40, 30, 10.0, 1)]).unwrap();

        assert!(!set.exceeds_largest(&Product::new("fits", "A", 50, 40, 30, 10.0)));
        assert!(set.exceeds_largest(&Product::new("long", "A", 51, 1, 1, 1.0)));
        assert!(set.exceeds_largest(&Product::new("heavy", "A", 1, 1, 1, 10.5)));
    }

    #[test]
    fn test_incompatibility_table_asymmetric_entries() {
        let table = IncompatibilityTable::new().with_rule("Incompatible", ["Food", "Magnet"]);

        assert!(!table.are_compatible("Incompatible", "Food"));
        assert!(!table.are_compatible("Food", "Incompatible"));
        assert!(table.are_compatible("Food", "Magnet"));
        assert!(table.are_compatible("Unknown", "Other"));
    }

    #[test]
    fn test_incompatibility_table_from_iter() {
        let table: IncompatibilityTable = vec![
            ("Food", vec!["Detergent"]),
            ("Detergent", vec!["Food"]),
            ("Glassware", vec![]),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 3);
        assert!(table.get("Glassware").unwrap().is_empty());
        assert!(table.get("Magnet").is_none());
    }
}
