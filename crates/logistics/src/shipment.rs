//! End-to-end shipment planning and estimation.
//!
//! `plan_shipment` chains compatibility resolution, coarse assignment and
//! geometric packing of every box. `estimate_shipment` runs the partitioner
//! and estimator separately for fragile and non-fragile goods, since the two
//! classes never share a box.

use crate::assign::coarse_assign;
use crate::box_instance::BoxInstance;
use crate::compatibility::resolve_compatibility;
use crate::estimate::{BoxEstimate, BoxEstimator, EstimatorConfig};
use crate::partition::{
    categorize, group_by_category, partition_categories, CategoryCounts, Partition,
};
use u_packing_core::solver::{Config, Solver};
use u_packing_core::{IncompatibilityTable, Product, Result, SolveResult, TemplateSet};
use u_packing_d3::packing_utils::exceeds_weight;
use u_packing_d3::{Container3D, Item3D, Packer3D};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A coarse box together with its geometric packing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PackedBox {
    /// The box and the products assigned to it.
    pub instance: BoxInstance,
    /// Placements of those products; `item_index` refers to
    /// `instance.products()`.
    pub packing: SolveResult,
}

impl PackedBox {
    /// Returns the indices of products that fit the empty box but lost the
    /// contention for space in it.
    ///
    /// With the genetic strategy a product may land in an extra bin
    /// (`bin_index > 0`); that counts as spilled too. Products no rotation of
    /// the empty box takes are left out.
    pub fn spilled_indices(&self) -> Vec<usize> {
        let mut spilled: Vec<usize> = self
            .packing
            .placements
            .iter()
            .filter(|p| p.bin_index > 0)
            .map(|p| p.item_index)
            .chain(self.packing.unplaced.iter().copied())
            .collect();
        spilled.sort_unstable();
        spilled
    }
}

/// Result of planning a shipment.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ShipmentPlan {
    /// Boxes in template priority order.
    pub boxes: Vec<PackedBox>,
    /// Products that fit some template but found no room in their box.
    pub spilled: Vec<Product>,
    /// Products no template admits by volume and weight, or that fit no
    /// template in any rotation.
    pub unplaceable: Vec<Product>,
}

impl ShipmentPlan {
    /// Returns the number of products with a position in their box.
    pub fn placed_count(&self) -> usize {
        self.boxes
            .iter()
            .map(|b| b.packing.placements_in_bin(0).count())
            .sum()
    }
}

/// Estimate for one fragility class.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClassEstimate {
    /// Compatible category subsets.
    pub partition: Partition,
    /// Estimated bins per subset.
    pub estimate: BoxEstimate,
}

/// Estimates for fragile and non-fragile goods.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ShipmentEstimate {
    /// Fragile goods.
    pub fragile: ClassEstimate,
    /// Non-fragile goods.
    pub non_fragile: ClassEstimate,
}

impl ShipmentEstimate {
    /// Returns the estimated number of bins across both classes.
    pub fn total_bins(&self) -> usize {
        self.fragile.estimate.total_bins() + self.non_fragile.estimate.total_bins()
    }
}

/// Returns true if some rotation of `product` fits an empty box opened from
/// one of the templates.
fn fits_some_template(product: &Product, templates: &TemplateSet) -> bool {
    let item = Item3D::from(product);
    let rotations = item.rotations();
    templates.iter().any(|template| {
        let container = Container3D::from(template);
        !exceeds_weight(&item, &container) && rotations.iter().any(|r| container.fits(r))
    })
}

fn validate_products(products: &[Product]) -> Result<()> {
    for product in products {
        product.validate()?;
    }
    Ok(())
}

/// Assigns products to boxes and packs every box geometrically.
pub fn plan_shipment(
    products: &[Product],
    templates: &TemplateSet,
    table: &IncompatibilityTable,
    config: &Config,
) -> Result<ShipmentPlan> {
    validate_products(products)?;
    config.validate()?;

    let mut resolved = products.to_vec();
    resolve_compatibility(&mut resolved, table);

    let assigned = coarse_assign(&resolved, templates);
    let packer = Packer3D::new(config.clone());
    let mut plan = ShipmentPlan {
        unplaceable: assigned.unplaced,
        ..Default::default()
    };

    for instance in assigned.boxes {
        let items: Vec<Item3D> = instance.products().iter().map(Item3D::from).collect();
        let container = Container3D::from(instance.template());
        let packing = packer.solve(&items, &container)?;

        let packed = PackedBox { instance, packing };
        for index in packed.spilled_indices() {
            if let Some(product) = packed.instance.products().get(index) {
                log::warn!(
                    "'{}' found no room in {}",
                    product.name(),
                    packed.instance.label()
                );
                plan.spilled.push(product.clone());
            }
        }
        for &index in &packed.packing.unplaceable {
            let Some(product) = packed.instance.products().get(index) else {
                continue;
            };
            if fits_some_template(product, templates) {
                log::warn!(
                    "'{}' does not fit {} in any rotation",
                    product.name(),
                    packed.instance.label()
                );
                plan.spilled.push(product.clone());
            } else {
                log::warn!("'{}' fits no template in any rotation", product.name());
                plan.unplaceable.push(product.clone());
            }
        }
        plan.boxes.push(packed);
    }

    log::info!(
        "shipment plan: {} boxes, {} spilled, {} unplaceable",
        plan.boxes.len(),
        plan.spilled.len(),
        plan.unplaceable.len()
    );

    Ok(plan)
}

/// Estimates the boxes needed, per fragility class.
pub fn estimate_shipment(
    products: &[Product],
    templates: &TemplateSet,
    table: &IncompatibilityTable,
    config: &EstimatorConfig,
) -> Result<ShipmentEstimate> {
    validate_products(products)?;
    config.validate()?;

    let mut resolved = products.to_vec();
    resolve_compatibility(&mut resolved, table);

    let categorized = categorize(&resolved);
    let estimator = BoxEstimator::new(templates, config.clone());

    let estimate_class = |counts: &CategoryCounts, products: &[Product]| {
        let partition = partition_categories(counts, table);
        let estimate = estimator.estimate(&group_by_category(products), &partition.subsets);
        ClassEstimate {
            partition,
            estimate,
        }
    };

    Ok(ShipmentEstimate {
        fragile: estimate_class(&categorized.fragile_counts, &categorized.fragile),
        non_fragile: estimate_class(&categorized.non_fragile_counts, &categorized.non_fragile),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_packing_core::solver::Strategy;
    use u_packing_core::{BoxTemplate, Error};

    fn templates() -> TemplateSet {
        TemplateSet::new(vec![
            BoxTemplate::new("Large Box", 50, 50, 50, 10.0, 1),
            BoxTemplate::new("Small Box", 20, 20, 20, 2.0, 2),
        ])
        .unwrap()
    }

    #[test]
    fn test_plan_places_products_geometrically() {
        let products = vec![
            Product::new("Pasta", "Food", 20, 15, 5, 0.4),
            Product::new("Cheese", "Food", 20, 15, 3, 0.5),
        ];

        let plan = plan_shipment(
            &products,
            &templates(),
            &IncompatibilityTable::new(),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(plan.boxes.len(), 1);
        assert_eq!(plan.placed_count(), 2);
        assert!(plan.spilled.is_empty());
        assert!(plan.unplaceable.is_empty());
    }

    #[test]
    fn test_pole_longer_than_every_template_is_unplaceable() {
        // Volume fits the 10x10x10 box, but no rotation of 40x5x5 does.
        let templates =
            TemplateSet::new(vec![BoxTemplate::new("Cube", 10, 10, 10, 10.0, 1)]).unwrap();
        let products = vec![Product::new("Pole", "Hardware", 40, 5, 5, 1.0)];

        let plan = plan_shipment(
            &products,
            &templates,
            &IncompatibilityTable::new(),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(plan.boxes.len(), 1);
        assert!(plan.spilled.is_empty());
        let unplaceable: Vec<&str> = plan.unplaceable.iter().map(|p| p.name()).collect();
        assert_eq!(unplaceable, vec!["Pole"]);
        assert_eq!(plan.placed_count(), 0);
    }

    #[test]
    fn test_pole_fitting_another_template_is_spilled() {
        // The cube is admitted first by volume; only the tube takes the pole.
        let templates = TemplateSet::new(vec![
            BoxTemplate::new("Cube", 10, 10, 10, 10.0, 1),
            BoxTemplate::new("Tube", 40, 6, 6, 10.0, 2),
        ])
        .unwrap();
        let products = vec![Product::new("Pole", "Hardware", 40, 5, 5, 1.0)];

        let plan = plan_shipment(
            &products,
            &templates,
            &IncompatibilityTable::new(),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(plan.boxes[0].instance.template().name(), "Cube");
        assert!(plan.unplaceable.is_empty());
        assert_eq!(plan.spilled.len(), 1);
        assert_eq!(plan.spilled[0].name(), "Pole");
    }

    #[test]
    fn test_contention_is_spilled() {
        let templates =
            TemplateSet::new(vec![BoxTemplate::new("Cube", 10, 10, 10, 10.0, 1)]).unwrap();
        let products = vec![
            Product::new("Block A", "Hardware", 6, 6, 6, 1.0),
            Product::new("Block B", "Hardware", 5, 5, 5, 1.0),
        ];

        let plan = plan_shipment(
            &products,
            &templates,
            &IncompatibilityTable::new(),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(plan.placed_count(), 1);
        assert_eq!(plan.spilled.len(), 1);
        assert!(plan.unplaceable.is_empty());
    }

    #[test]
    fn test_plan_with_genetic_strategy() {
        let products: Vec<Product> = (0..4)
            .map(|i| Product::new(format!("Jar {}", i), "Food", 10, 10, 10, 0.3))
            .collect();
        let config = Config::default()
            .with_strategy(Strategy::GeneticAlgorithm)
            .with_population_size(8)
            .with_max_generations(3)
            .with_parent_count(2)
            .with_seed(5);

        let plan =
            plan_shipment(&products, &templates(), &IncompatibilityTable::new(), &config).unwrap();

        assert_eq!(plan.boxes.len(), 1);
        assert_eq!(plan.boxes[0].packing.bins_used, 1);
        assert_eq!(plan.placed_count(), 4);
    }

    #[test]
    fn test_invalid_product_is_rejected() {
        let products = vec![Product::new("Ghost", "Food", 1, 1, 1, 0.0)];

        let err = plan_shipment(
            &products,
            &templates(),
            &IncompatibilityTable::new(),
            &Config::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::InvalidProduct(_)));
    }

    #[test]
    fn test_estimate_splits_fragility_classes() {
        let products = vec![
            Product::new("Vase", "Glassware", 10, 10, 10, 1.0).with_fragile(true),
            Product::new("Cheese", "Food", 10, 10, 10, 0.5),
            Product::new("Soap", "Detergent", 10, 10, 10, 0.5),
        ];
        let table = IncompatibilityTable::new()
            .with_rule("Food", ["Detergent"])
            .with_rule("Detergent", ["Food"]);

        let estimate =
            estimate_shipment(&products, &templates(), &table, &EstimatorConfig::default())
                .unwrap();

        assert_eq!(estimate.fragile.partition.subsets, vec![vec!["Glassware"]]);
        assert_eq!(estimate.non_fragile.partition.len(), 2);
        assert_eq!(estimate.total_bins(), 3);
    }
}
