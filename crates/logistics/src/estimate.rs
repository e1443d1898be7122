//! Advisory box-count estimation per category subset.
//!
//! Estimates are computed from volume and weight totals only and are never
//! checked geometrically.

use std::collections::BTreeMap;
use u_packing_core::{BoxTemplate, Category, Error, Product, Result, TemplateSet};
use u_packing_d3::packing_utils::WEIGHT_EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the box estimator.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EstimatorConfig {
    /// Multiplier on the relative weight gap when scoring a candidate.
    pub weight_bias: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { weight_bias: 3.0 }
    }
}

impl EstimatorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weight bias.
    pub fn with_weight_bias(mut self, bias: f64) -> Self {
        self.weight_bias = bias;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.weight_bias >= 0.0) || !self.weight_bias.is_finite() {
            return Err(Error::ConfigError(
                "Weight bias must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

/// One estimated bin.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EstimatedBin {
    /// Template the bin was assigned to.
    pub template: BoxTemplate,
    /// Items in the order they were chosen.
    pub items: Vec<Product>,
}

impl EstimatedBin {
    /// Returns the total item volume.
    pub fn volume(&self) -> u64 {
        self.items.iter().map(Product::volume).sum()
    }

    /// Returns the total item weight.
    pub fn weight(&self) -> f64 {
        self.items.iter().map(Product::weight).sum()
    }
}

/// Estimated bins for one category subset.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SubsetEstimate {
    /// Categories of the subset.
    pub categories: Vec<Category>,
    /// Estimated bins.
    pub bins: Vec<EstimatedBin>,
}

/// Estimate over all subsets.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BoxEstimate {
    /// Estimates in subset order.
    pub subsets: Vec<SubsetEstimate>,
    /// Items exceeding the largest template in volume, weight or a single
    /// dimension. They appear in no bin.
    pub oversized: Vec<Product>,
}

impl BoxEstimate {
    /// Returns the total number of estimated bins.
    pub fn total_bins(&self) -> usize {
        self.subsets.iter().map(|s| s.bins.len()).sum()
    }

    /// Returns the number of bins per template name.
    pub fn template_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for bin in self.subsets.iter().flat_map(|s| &s.bins) {
            *counts.entry(bin.template.name().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

/// Greedy volume/weight proximity estimator.
pub struct BoxEstimator<'a> {
    templates: &'a TemplateSet,
    config: EstimatorConfig,
}

impl<'a> BoxEstimator<'a> {
    /// Creates an estimator over a template set.
    pub fn new(templates: &'a TemplateSet, config: EstimatorConfig) -> Self {
        Self { templates, config }
    }

    /// Relative distance of a (volume, weight) total to a template's
    /// capacity: `|Vt - V| / Vt + bias * |Wt - W| / Wt`.
    pub fn distance(&self, volume: u64, weight: f64, template: &BoxTemplate) -> f64 {
        let target_volume = template.volume() as f64;
        let target_weight = template.max_weight();
        (target_volume - volume as f64).abs() / target_volume
            + self.config.weight_bias * (target_weight - weight).abs() / target_weight
    }

    /// Smallest distance to any template.
    fn score(&self, volume: u64, weight: f64) -> f64 {
        self.templates
            .iter()
            .map(|t| self.distance(volume, weight, t))
            .fold(f64::INFINITY, f64::min)
    }

    /// Template for a bin left open when items run out: the smallest
    /// non-largest template with headroom on both axes, else the largest.
    fn closing_template(&self, volume: u64, weight: f64) -> &'a BoxTemplate {
        self.templates
            .smaller_ascending()
            .into_iter()
            .find(|t| t.volume() > volume && t.max_weight() > weight)
            .unwrap_or_else(|| self.templates.largest())
    }

    /// Estimates bins for every subset.
    pub fn estimate(
        &self,
        by_category: &BTreeMap<Category, Vec<Product>>,
        subsets: &[Vec<Category>],
    ) -> BoxEstimate {
        let mut estimate = BoxEstimate::default();

        for subset in subsets {
            let mut items = Vec::new();
            for category in subset {
                for product in by_category.get(category).into_iter().flatten() {
                    if self.templates.exceeds_largest(product) {
                        log::warn!(
                            "'{}' exceeds the largest template and is unplaceable",
                            product.name()
                        );
                        estimate.oversized.push(product.clone());
                    } else {
                        items.push(product.clone());
                    }
                }
            }

            estimate.subsets.push(SubsetEstimate {
                categories: subset.clone(),
                bins: self.fill(items),
            });
        }

        estimate
    }

    fn fill(&self, mut remaining: Vec<Product>) -> Vec<EstimatedBin> {
        let largest = self.templates.largest();
        let mut bins = Vec::new();
        let mut current: Vec<Product> = Vec::new();
        let mut volume = 0u64;
        let mut weight = 0.0f64;

        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_score = f64::INFINITY;
            for (idx, item) in remaining.iter().enumerate() {
                let score = self.score(volume + item.volume(), weight + item.weight());
                if score < best_score {
                    best = idx;
                    best_score = score;
                }
            }

            let candidate = &remaining[best];
            let overflows = volume + candidate.volume() > largest.volume()
                || weight + candidate.weight() > largest.max_weight() + WEIGHT_EPSILON;

            if overflows && !current.is_empty() {
                log::debug!(
                    "closing estimated bin with {} items against {}",
                    current.len(),
                    largest.name()
                );
                bins.push(EstimatedBin {
                    template: largest.clone(),
                    items: std::mem::take(&mut current),
                });
                volume = 0;
                weight = 0.0;
                continue;
            }

            let item = remaining.remove(best);
            volume += item.volume();
            weight += item.weight();
            current.push(item);
        }

        if !current.is_empty() {
            let template = self.closing_template(volume, weight);
            log::debug!(
                "closing last estimated bin with {} items against {}",
                current.len(),
                template.name()
            );
            bins.push(EstimatedBin {
                template: template.clone(),
                items: current,
            });
        }

        bins
    }
}

/// Estimates bins per subset with the default configuration.
pub fn estimate_boxes(
    by_category: &BTreeMap<Category, Vec<Product>>,
    subsets: &[Vec<Category>],
    templates: &TemplateSet,
) -> BoxEstimate {
    BoxEstimator::new(templates, EstimatorConfig::default()).estimate(by_category, subsets)
}
