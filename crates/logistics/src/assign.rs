//! Coarse bin assignment (first-fit-decreasing by weight, then volume).
//!
//! Works on whole products using only volume, weight, fragility and
//! compatibility. No geometry is considered here; the geometric packer runs
//! later on each produced box.

use crate::box_instance::BoxInstance;
use std::cmp::Ordering;
use u_packing_core::{Product, TemplateSet};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Result of the coarse assignment.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AssignResult {
    /// Boxes, relabeled and sorted by their capacity template's priority.
    pub boxes: Vec<BoxInstance>,

    /// Products no template admits by volume and weight.
    pub unplaced: Vec<Product>,
}

impl AssignResult {
    /// Returns the number of products that were boxed.
    pub fn boxed_count(&self) -> usize {
        self.boxes.iter().map(BoxInstance::len).sum()
    }
}

/// Assigns products to box instances.
///
/// Products are visited heaviest first (volume breaks weight ties, input
/// order breaks full ties). Each goes into the first open box that accepts
/// it; otherwise a box is opened from the first template, in configured
/// order, that admits it. Boxes are then finalized with [`finalize_boxes`].
pub fn coarse_assign(products: &[Product], templates: &TemplateSet) -> AssignResult {
    let mut ordered: Vec<&Product> = products.iter().collect();
    ordered.sort_by(|a, b| {
        b.weight()
            .partial_cmp(&a.weight())
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.volume().cmp(&a.volume()))
    });

    let mut boxes: Vec<BoxInstance> = Vec::new();
    let mut unplaced = Vec::new();

    for product in ordered {
        if let Some(open) = boxes.iter_mut().find(|b| b.can_fit(product)) {
            if let Err(rejected) = open.add_product(product.clone()) {
                unplaced.push(rejected);
            }
            continue;
        }

        match templates.first_admitting(product.volume(), product.weight()) {
            Some(template) => {
                let mut fresh = BoxInstance::open(template);
                match fresh.add_product(product.clone()) {
                    Ok(()) => {
                        log::debug!(
                            "opened {} #{} for '{}'",
                            template.name(),
                            boxes.len() + 1,
                            product.name()
                        );
                        boxes.push(fresh);
                    }
                    Err(rejected) => unplaced.push(rejected),
                }
            }
            None => {
                log::debug!("no template admits '{}'", product.name());
                unplaced.push(product.clone());
            }
        }
    }

    AssignResult {
        boxes: finalize_boxes(boxes, templates),
        unplaced,
    }
}

/// Relabels each box to the smallest non-largest template that covers its
/// usage, then sorts by capacity template priority.
///
/// Boxes no smaller template covers keep their label. The sort is stable so
/// boxes of equal priority stay in opening order.
pub fn finalize_boxes(mut boxes: Vec<BoxInstance>, templates: &TemplateSet) -> Vec<BoxInstance> {
    let candidates = templates.smaller_ascending();

    for instance in &mut boxes {
        if let Some(template) = candidates.iter().find(|t| instance.is_covered_by(t)) {
            instance.relabel(template.name());
        }
    }

    boxes.sort_by_key(|b| b.template().priority());
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_packing_core::BoxTemplate;

    fn reference_templates() -> TemplateSet {
        TemplateSet::new(vec![
            BoxTemplate::new("XLarge Box", 70, 70, 70, 15.0, 1),
            BoxTemplate::new("Large Box", 50, 50, 50, 10.0, 2),
            BoxTemplate::new("Medium Box", 30, 30, 30, 5.0, 3),
            BoxTemplate::new("Small Box", 20, 20, 20, 2.0, 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_incompatible_products_get_separate_boxes() {
        let templates =
            TemplateSet::new(vec![BoxTemplate::new("Only", 10, 10, 3, 10.0, 1)]).unwrap();
        let products = vec![
            Product::new("A", "Food", 10, 10, 1, 1.0).with_incompatible(["Detergent"]),
            Product::new("B", "Detergent", 10, 10, 1, 1.0).with_incompatible(["Food"]),
        ];

        let result = coarse_assign(&products, &templates);

        assert_eq!(result.boxes.len(), 2);
        assert!(result.boxes.iter().all(|b| b.len() == 1));
        assert!(result.unplaced.is_empty());
    }

    #[test]
    fn test_oversized_product_is_unplaced() {
        let products = vec![Product::new("Over size", "Over", 800, 800, 800, 5.0)];

        let result = coarse_assign(&products, &reference_templates());

        assert!(result.boxes.is_empty());
        assert_eq!(result.unplaced.len(), 1);
        assert_eq!(result.unplaced[0].name(), "Over size");
    }

    #[test]
    fn test_first_admitting_template_wins() {
        // The small product still opens the first (largest) template.
        let products = vec![Product::new("Chip", "Electronics", 1, 1, 1, 0.1)];

        let result = coarse_assign(&products, &reference_templates());

        assert_eq!(result.boxes.len(), 1);
        assert_eq!(result.boxes[0].template().name(), "XLarge Box");
        assert_eq!(result.boxes[0].label(), "Small Box");
    }

    #[test]
    fn test_heaviest_first_order() {
        let products = vec![
            Product::new("light", "Food", 10, 10, 10, 1.0),
            Product::new("heavy", "Food", 10, 10, 10, 4.0),
            Product::new("bulky", "Food", 20, 10, 10, 1.0),
        ];

        let result = coarse_assign(&products, &reference_templates());

        let names: Vec<&str> = result.boxes[0].products().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["heavy", "bulky", "light"]);
    }

    #[test]
    fn test_weight_overflow_opens_new_box() {
        let templates =
            TemplateSet::new(vec![BoxTemplate::new("Crate", 100, 100, 100, 10.0, 1)]).unwrap();
        let products: Vec<Product> = (0..3)
            .map(|i| Product::new(format!("Anvil {}", i), "Metal", 10, 10, 10, 4.0))
            .collect();

        let result = coarse_assign(&products, &templates);

        assert_eq!(result.boxes.len(), 2);
        assert_eq!(result.boxes[0].len(), 2);
        assert_eq!(result.boxed_count(), 3);
    }

    #[test]
    fn test_finalize_sorts_by_capacity_priority() {
        let templates = reference_templates();
        let mut small = BoxInstance::open(&templates.as_slice()[3]);
        small
            .add_product(Product::new("Ring", "Jewelry", 1, 1, 1, 0.1))
            .unwrap();
        let mut xl = BoxInstance::open(&templates.as_slice()[0]);
        xl.add_product(Product::new("Sofa", "Furniture", 60, 60, 60, 12.0))
            .unwrap();

        let boxes = finalize_boxes(vec![small, xl], &templates);

        assert_eq!(boxes[0].template().name(), "XLarge Box");
        assert_eq!(boxes[0].label(), "XLarge Box");
        assert_eq!(boxes[1].template().name(), "Small Box");
        assert_eq!(boxes[1].label(), "Small Box");
    }
}
