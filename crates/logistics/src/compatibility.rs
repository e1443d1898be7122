//! Compatibility resolver.

use u_packing_core::{IncompatibilityTable, Product};

/// Rewrites each product's incompatibility set from the table entry for its
/// category.
///
/// Products whose category has no entry keep their current set. Returns the
/// number of products that were rewritten.
pub fn resolve_compatibility(products: &mut [Product], table: &IncompatibilityTable) -> usize {
    let mut rewritten = 0;
    for product in products.iter_mut() {
        if let Some(rule) = table.get(product.category()) {
            product.set_incompatible_with(rule.clone());
            rewritten += 1;
        }
    }

    log::debug!(
        "resolved compatibility for {}/{} products",
        rewritten,
        products.len()
    );
    rewritten
}
