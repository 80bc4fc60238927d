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

use std::fmt;

use fnv::FnvHashSet;

pub type ItemId = u32;
pub type UserId = u32;

/// The distinct items a single user liked.
pub type Transaction = FnvHashSet<ItemId>;

/// Canonical form of an itemset: items sorted ascending, without duplicates. Two itemsets with the
/// same elements are equal and hash identically, no matter in which order they were built.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Itemset {
    items: Vec<ItemId>,
}

impl Itemset {

    pub fn new<I>(items: I) -> Self where I: IntoIterator<Item=ItemId> {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();

        Itemset { items }
    }

    pub fn singleton(item: ItemId) -> Self {
        Itemset { items: vec![item] }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// The only element of a single-item itemset.
    pub fn single_item(&self) -> Option<ItemId> {
        if self.items.len() == 1 {
            Some(self.items[0])
        } else {
            None
        }
    }

    /// Whether both itemsets agree on their first `prefix_len` items in canonical order.
    pub fn shares_prefix(&self, other: &Itemset, prefix_len: usize) -> bool {
        self.items.len() >= prefix_len
            && other.items.len() >= prefix_len
            && self.items[..prefix_len] == other.items[..prefix_len]
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        let mut items = Vec::with_capacity(self.items.len() + other.items.len());
        let (mut left, mut right) = (0, 0);

        while left < self.items.len() && right < other.items.len() {
            let (a, b) = (self.items[left], other.items[right]);
            if a < b {
                items.push(a);
                left += 1;
            } else if b < a {
                items.push(b);
                right += 1;
            } else {
                items.push(a);
                left += 1;
                right += 1;
            }
        }

        items.extend_from_slice(&self.items[left..]);
        items.extend_from_slice(&other.items[right..]);

        Itemset { items }
    }

    pub fn difference(&self, other: &Itemset) -> Itemset {
        let items = self.items.iter()
            .filter(|item| other.items.binary_search(item).is_err())
            .cloned()
            .collect();

        Itemset { items }
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        self.items.iter().all(|item| other.items.binary_search(item).is_err())
    }

    /// The sub-itemset made of the items at the given ascending positions.
    pub fn select(&self, positions: &[usize]) -> Itemset {
        Itemset { items: positions.iter().map(|&position| self.items[position]).collect() }
    }

    pub fn is_contained_in(&self, transaction: &Transaction) -> bool {
        self.items.iter().all(|item| transaction.contains(item))
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (position, item) in self.items.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

/// Parses a user supplied movie identifier. We accept plain non-negative integers and floating
/// point notation without a fractional part (e.g. `42.0`), everything else is rejected.
pub fn parse_item_id(raw: &str) -> Option<ItemId> {
    let raw = raw.trim();

    // Negative zero would otherwise slip through as 0
    if raw.starts_with('-') {
        return None;
    }

    if let Ok(item) = raw.parse::<ItemId>() {
        return Some(item);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite()
            && value.fract() == 0.0
            && value >= 0.0
            && value <= f64::from(ItemId::max_value()) => Some(value as ItemId),
        _ => None,
    }
}
