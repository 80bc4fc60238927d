/**
 * RecoRules
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::cmp::Ordering;

use serde_derive::Serialize;

use crate::apriori::FrequentItemsetTable;
use crate::combinations::Combinations;
use crate::types::{ItemId, Itemset};

/// Association rule `antecedent -> consequent`, both sides are disjoint and non-empty.
#[derive(Clone, PartialEq, Debug)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub confidence: f64,
}

impl Rule {

    pub fn is_simple(&self) -> bool {
        self.antecedent.len() == 1 && self.consequent.len() == 1
    }

    pub fn as_simple(&self) -> Option<SimpleRule> {
        match (self.antecedent.single_item(), self.consequent.single_item()) {
            (Some(antecedent), Some(consequent)) => {
                Some(SimpleRule { antecedent, consequent, confidence: self.confidence })
            },
            _ => None,
        }
    }
}

/// Rule with a single antecedent and a single consequent item. Field names will be used in JSON.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct SimpleRule {
    pub antecedent: ItemId,
    pub consequent: ItemId,
    pub confidence: f64,
}

/// Derives all rules with confidence of at least `min_confidence` from the frequent itemsets. For
/// every itemset of size two or more, each non-empty proper subset is tried as antecedent, in
/// table order and lexicographic subset order.
pub fn generate_rules(table: &FrequentItemsetTable, min_confidence: f64) -> Vec<Rule> {

    let mut rules = Vec::new();
    let mut combinations = Combinations::new(0, 0);

    for (itemset, itemset_support) in table.iter().filter(|(itemset, _)| itemset.len() >= 2) {
        for antecedent_size in 1..itemset.len() {

            combinations.reset(itemset.len(), antecedent_size);

            while let Some(positions) = combinations.next_combination() {

                let antecedent = itemset.select(positions);

                // Subsets of frequent itemsets are always in the table with positive support,
                // we still refuse to divide by anything else
                let antecedent_support = match table.support(&antecedent) {
                    Some(support) if support > 0.0 => support,
                    _ => continue,
                };

                let confidence = itemset_support / antecedent_support;

                if confidence >= min_confidence {
                    let consequent = itemset.difference(&antecedent);
                    rules.push(Rule { antecedent, consequent, confidence });
                }
            }
        }
    }

    rules
}

/// Restricts rules to single-item-to-single-item rules, sorted by descending confidence. The sort
/// is stable, rules with equal confidence keep their generation order.
pub fn simple_rules(rules: &[Rule]) -> Vec<SimpleRule> {

    let mut simple: Vec<SimpleRule> = rules.iter()
        .filter_map(Rule::as_simple)
        .collect();

    simple.sort_by(|rule_a, rule_b| {
        rule_b.confidence.partial_cmp(&rule_a.confidence).unwrap_or(Ordering::Equal)
    });

    simple
}

#[cfg(test)]
mod tests {

    use fnv::FnvHashSet;

    use crate::apriori::frequent_itemsets;
    use crate::config::MiningConfig;
    use crate::types::{Itemset, Transaction};
    use super::{generate_rules, simple_rules, Rule, SimpleRule};

    fn transactions(raw: &[&[u32]]) -> Vec<Transaction> {
        raw.iter()
            .map(|items| items.iter().cloned().collect::<FnvHashSet<u32>>())
            .collect()
    }

    fn mining_config(min_support: f64) -> MiningConfig {
        MiningConfig { min_support, num_threads: 1, ..MiningConfig::default() }
    }

    #[test]
    fn symmetric_pairs_in_generation_order() {
        let transactions = transactions(&[&[1, 2, 3], &[1, 2], &[1, 3], &[2, 3]]);
        let table = frequent_itemsets(&transactions, &mining_config(0.5));

        let rules = generate_rules(&table, 0.1);
        assert_eq!(rules.len(), 6);

        let simple = simple_rules(&rules);
        let pairs: Vec<(u32, u32)> = simple.iter()
            .map(|rule| (rule.antecedent, rule.consequent))
            .collect();

        assert_eq!(pairs, vec![(1, 2), (2, 1), (1, 3), (3, 1), (2, 3), (3, 2)]);

        for rule in simple.iter() {
            assert!((rule.confidence - 0.5 / 0.75).abs() < 1e-9);
        }
    }

    #[test]
    fn confidence_threshold_filters_rules() {
        // support({1}) = 1.0, support({2}) = 0.5, support({1, 2}) = 0.5
        let transactions = transactions(&[&[1, 2], &[1], &[1, 2], &[1]]);
        let table = frequent_itemsets(&transactions, &mining_config(0.5));

        let rules = simple_rules(&generate_rules(&table, 0.6));

        assert_eq!(
            rules,
            vec![SimpleRule { antecedent: 2, consequent: 1, confidence: 1.0 }]
        );

        let all_rules = simple_rules(&generate_rules(&table, 0.1));

        assert_eq!(all_rules.len(), 2);
        assert_eq!((all_rules[0].antecedent, all_rules[0].consequent), (2, 1));
        assert_eq!((all_rules[1].antecedent, all_rules[1].consequent), (1, 2));
        assert!((all_rules[1].confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn multi_item_rules_are_not_simple() {
        let transactions = transactions(&[&[1, 2, 3], &[1, 2, 3], &[1, 2, 3], &[4]]);
        let table = frequent_itemsets(&transactions, &mining_config(0.5));

        let rules = generate_rules(&table, 0.1);

        // 3 pairs with 2 rules each, 1 triple with 6 rules
        assert_eq!(rules.len(), 12);
        assert_eq!(rules.iter().filter(|rule| rule.is_simple()).count(), 6);

        let complex = rules.iter().find(|rule| !rule.is_simple()).unwrap();
        assert!(complex.antecedent.is_disjoint(&complex.consequent));
        assert_eq!(complex.antecedent.union(&complex.consequent), Itemset::new(vec![1, 2, 3]));
        assert!(complex.as_simple().is_none());

        assert_eq!(simple_rules(&rules).len(), 6);
    }

    #[test]
    fn stable_sort_by_confidence() {
        let rule = |antecedent: u32, consequent: u32, confidence: f64| Rule {
            antecedent: Itemset::singleton(antecedent),
            consequent: Itemset::singleton(consequent),
            confidence,
        };

        let rules = vec![rule(1, 2, 0.5), rule(3, 4, 0.9), rule(5, 6, 0.5), rule(7, 8, 0.9)];
        let sorted: Vec<u32> = simple_rules(&rules).iter().map(|rule| rule.antecedent).collect();

        assert_eq!(sorted, vec![3, 7, 1, 5]);
    }

    #[test]
    fn empty_table_yields_no_rules() {
        let table = frequent_itemsets(&[], &mining_config(0.1));

        assert!(generate_rules(&table, 0.1).is_empty());
    }
}
