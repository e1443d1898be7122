//! Product categorization and greedy category partitioning.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use u_packing_core::{Category, IncompatibilityTable, Product};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Product count per category.
pub type CategoryCounts = BTreeMap<Category, usize>;

/// Products split by category and fragility class.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Categorized {
    /// Count of every product per category.
    pub counts: CategoryCounts,
    /// Count of fragile products per category (categories with none omitted).
    pub fragile_counts: CategoryCounts,
    /// Count of non-fragile products per category (categories with none omitted).
    pub non_fragile_counts: CategoryCounts,
    /// Fragile products, in input order.
    pub fragile: Vec<Product>,
    /// Non-fragile products, in input order.
    pub non_fragile: Vec<Product>,
}

/// Counts products per category, overall and per fragility class.
pub fn categorize(products: &[Product]) -> Categorized {
    let mut categorized = Categorized::default();

    for product in products {
        let category = product.category().clone();
        *categorized.counts.entry(category.clone()).or_insert(0) += 1;

        if product.is_fragile() {
            *categorized.fragile_counts.entry(category).or_insert(0) += 1;
            categorized.fragile.push(product.clone());
        } else {
            *categorized.non_fragile_counts.entry(category).or_insert(0) += 1;
            categorized.non_fragile.push(product.clone());
        }
    }

    categorized
}

/// Groups products by category, keeping input order within each group.
pub fn group_by_category(products: &[Product]) -> BTreeMap<Category, Vec<Product>> {
    let mut groups: BTreeMap<Category, Vec<Product>> = BTreeMap::new();
    for product in products {
        groups
            .entry(product.category().clone())
            .or_default()
            .push(product.clone());
    }
    groups
}

/// Mutually compatible category subsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Partition {
    /// Subsets in the order they were formed; each starts with its seed.
    pub subsets: Vec<Vec<Category>>,
    /// Total count covered by all subsets.
    pub total: usize,
}

impl Partition {
    /// Returns the number of subsets.
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    /// Returns true if there are no subsets.
    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    /// Returns the subset containing `category`, if any.
    pub fn subset_of(&self, category: &str) -> Option<&[Category]> {
        self.subsets
            .iter()
            .find(|s| s.iter().any(|c| c == category))
            .map(Vec::as_slice)
    }
}

/// Greedily partitions categories into mutually compatible subsets.
///
/// The remaining category with the highest count seeds each subset; every
/// other remaining category, in descending-count order, joins if it is
/// compatible with all current members. Count ties go to the
/// lexicographically smaller name. This approximates a minimum coloring of
/// the incompatibility graph and is not guaranteed optimal.
pub fn partition_categories(counts: &CategoryCounts, table: &IncompatibilityTable) -> Partition {
    let mut remaining: Vec<(&Category, usize)> = counts.iter().map(|(c, &n)| (c, n)).collect();
    // BTreeMap iteration is name-ordered, so a stable sort keeps name as the tie-break.
    remaining.sort_by_key(|&(_, n)| Reverse(n));

    let mut partition = Partition::default();

    while !remaining.is_empty() {
        let (seed, seed_count) = remaining.remove(0);
        let mut subset: Vec<Category> = vec![seed.clone()];
        let mut covered = seed_count;

        remaining.retain(|&(candidate, count)| {
            if subset
                .iter()
                .all(|member| table.are_compatible(member, candidate))
            {
                subset.push(candidate.clone());
                covered += count;
                false
            } else {
                true
            }
        });

        log::debug!("category subset {:?} covers {} products", subset, covered);
        partition.total += covered;
        partition.subsets.push(subset);
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, usize)]) -> CategoryCounts {
        entries.iter().map(|&(c, n)| (c.to_string(), n)).collect()
    }

    #[test]
    fn test_incompatible_pair_is_split() {
        let table = IncompatibilityTable::new().with_rule("A", ["B"]);
        let partition = partition_categories(&counts(&[("A", 5), ("B", 3), ("C", 2)]), &table);

        assert_eq!(
            partition.subsets,
            vec![vec!["A".to_string(), "C".to_string()], vec!["B".to_string()]]
        );
        assert_eq!(partition.total, 10);
    }

    #[test]
    fn test_all_compatible_is_one_subset() {
        let partition = partition_categories(
            &counts(&[("X", 1), ("Y", 4), ("Z", 4)]),
            &IncompatibilityTable::new(),
        );

        assert_eq!(partition.len(), 1);
        assert_eq!(partition.subsets[0], vec!["Y", "Z", "X"]);
    }

    #[test]
    fn test_candidate_must_match_every_member() {
        // C is fine with A but clashes with B, which joined first.
        let table = IncompatibilityTable::new().with_rule("C", ["B"]);
        let partition =
            partition_categories(&counts(&[("A", 9), ("B", 5), ("C", 4)]), &table);

        assert_eq!(partition.subsets[0], vec!["A", "B"]);
        assert_eq!(partition.subset_of("C"), Some(&["C".to_string()][..]));
    }

    #[test]
    fn test_reference_table_partition() {
        let table: IncompatibilityTable = vec![
            ("Food", vec!["Detergent"]),
            ("Detergent", vec!["Food"]),
            ("Electronics", vec!["Magnet"]),
            ("Magnet", vec!["Electronics"]),
            (
                "Incompatible",
                vec!["Food", "Electronics", "Magnet", "Detergent", "Glassware"],
            ),
        ]
        .into_iter()
        .collect();

        let partition = partition_categories(
            &counts(&[
                ("Detergent", 6),
                ("Electronics", 11),
                ("Food", 11),
                ("Glassware", 5),
                ("Incompatible", 4),
                ("Magnet", 8),
            ]),
            &table,
        );

        assert_eq!(partition.subsets[0], vec!["Electronics", "Food", "Glassware"]);
        assert_eq!(partition.subsets[1], vec!["Magnet", "Detergent"]);
        assert_eq!(partition.subsets[2], vec!["Incompatible"]);
        assert_eq!(partition.total, 45);
    }

    #[test]
    fn test_empty_counts() {
        let partition = partition_categories(&CategoryCounts::new(), &IncompatibilityTable::new());
        assert!(partition.is_empty());
        assert_eq!(partition.total, 0);
    }

    #[test]
    fn test_categorize_splits_by_fragility() {
        let products = vec![
            Product::new("Laptop", "Electronics", 30, 20, 2, 2.5).with_fragile(true),
            Product::new("Cheese", "Food", 20, 15, 3, 0.5),
            Product::new("Honey", "Food", 25, 10, 10, 1.2).with_fragile(true),
            Product::new("Pasta", "Food", 20, 15, 5, 0.4),
        ];

        let categorized = categorize(&products);

        assert_eq!(categorized.counts["Food"], 3);
        assert_eq!(categorized.fragile_counts["Food"], 1);
        assert_eq!(categorized.non_fragile_counts["Food"], 2);
        assert!(!categorized.non_fragile_counts.contains_key("Electronics"));
        assert_eq!(categorized.fragile.len(), 2);
        assert_eq!(categorized.non_fragile[1].name(), "Pasta");
    }

    #[test]
    fn test_group_by_category() {
        let products = vec![
            Product::new("B1", "B", 1, 1, 1, 1.0),
            Product::new("A1", "A", 1, 1, 1, 1.0),
            Product::new("B2", "B", 1, 1, 1, 1.0),
        ];

        let groups = group_by_category(&products);

        assert_eq!(groups.len(), 2);
        let names: Vec<&str> = groups["B"].iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["B1", "B2"]);
    }
}
