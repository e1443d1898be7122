//! Box instances opened from templates by the coarse assigner.

use std::collections::BTreeSet;
use std::fmt;
use u_packing_core::{BoxTemplate, Category, Product};
use u_packing_d3::packing_utils::WEIGHT_EPSILON;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A box opened from a template, holding whole products.
///
/// Capacity always comes from the template the box was opened from. The
/// label starts as that template's name and may later be replaced by the
/// name of a smaller template that still covers the actual usage.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BoxInstance {
    template: BoxTemplate,
    label: String,
    used_volume: u64,
    used_weight: f64,
    products: Vec<Product>,
    categories: BTreeSet<Category>,
    contains_non_fragile: bool,
}

impl BoxInstance {
    /// Opens an empty box from a template.
    pub fn open(template: &BoxTemplate) -> Self {
        Self {
            template: template.clone(),
            label: template.name().to_string(),
            used_volume: 0,
            used_weight: 0.0,
            products: Vec::new(),
            categories: BTreeSet::new(),
            contains_non_fragile: false,
        }
    }

    /// Returns the template that defines the capacity.
    pub fn template(&self) -> &BoxTemplate {
        &self.template
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the products in placement order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns the categories present in the box.
    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the box holds nothing.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Returns the volume taken by the products.
    pub fn used_volume(&self) -> u64 {
        self.used_volume
    }

    /// Returns the weight of the products.
    pub fn used_weight(&self) -> f64 {
        self.used_weight
    }

    /// Returns `volume - used volume`.
    pub fn remaining_volume(&self) -> u64 {
        self.template.volume() - self.used_volume
    }

    /// Returns `max weight - used weight`, never negative.
    pub fn remaining_weight(&self) -> f64 {
        (self.template.max_weight() - self.used_weight).max(0.0)
    }

    /// Returns true if any product in the box is non-fragile.
    pub fn contains_non_fragile(&self) -> bool {
        self.contains_non_fragile
    }

    /// Returns true if any product in the box is fragile.
    pub fn contains_fragile(&self) -> bool {
        self.products.iter().any(Product::is_fragile)
    }

    /// Returns true if `product` can join the box.
    ///
    /// Rejects on insufficient volume or weight, on mixing fragile with
    /// non-fragile goods, and on any co-resident incompatibility (checked in
    /// both directions).
    pub fn can_fit(&self, product: &Product) -> bool {
        if self.remaining_volume() < product.volume()
            || self.used_weight + product.weight() > self.template.max_weight() + WEIGHT_EPSILON
        {
            return false;
        }

        if product.is_fragile() && self.contains_non_fragile {
            return false;
        }

        if !product.is_fragile() && self.contains_fragile() {
            return false;
        }

        self.products.iter().all(|p| p.is_compatible_with(product))
    }

    /// Adds `product` if [`can_fit`](Self::can_fit) allows it, otherwise
    /// hands it back.
    pub fn add_product(&mut self, product: Product) -> Result<(), Product> {
        if !self.can_fit(&product) {
            return Err(product);
        }

        self.used_volume += product.volume();
        self.used_weight += product.weight();
        self.categories.insert(product.category().clone());
        if !product.is_fragile() {
            self.contains_non_fragile = true;
        }
        self.products.push(product);

        Ok(())
    }

    /// Returns true if `template` can hold the current contents by volume
    /// and weight.
    pub fn is_covered_by(&self, template: &BoxTemplate) -> bool {
        self.used_volume <= template.volume()
            && self.used_weight <= template.max_weight() + WEIGHT_EPSILON
    }

    /// Replaces the display label. Capacity is unchanged.
    pub fn relabel(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl fmt::Display for BoxInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = if self.contains_non_fragile {
            "Not fragile"
        } else {
            "Fragile"
        };
        let categories: Vec<&str> = self.categories.iter().map(String::as_str).collect();
        let names: Vec<&str> = self.products.iter().map(Product::name).collect();

        writeln!(
            f,
            "{} : {} | Categories: {{{}}}",
            self.label,
            class,
            categories.join(", ")
        )?;
        writeln!(f, "Products: [{}]", names.join(", "))?;
        write!(
            f,
            "Free Volume: {}, Free Weight: {}",
            self.remaining_volume(),
            self.remaining_weight()
        )
    }
}
