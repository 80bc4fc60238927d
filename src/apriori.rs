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

use std::time::Instant;

use fnv::{FnvHashMap, FnvHashSet};
use scoped_pool::Pool;
use tracing::{debug, info};

use crate::combinations::Combinations;
use crate::config::MiningConfig;
use crate::types::{ItemId, Itemset, Transaction};

/// All frequent itemsets found so far with their support ratio. Entries are only ever added,
/// never updated or removed, and we remember the order of insertion so that everything derived
/// from the table is deterministic.
#[derive(Debug, PartialEq)]
pub struct FrequentItemsetTable {
    supports: FnvHashMap<Itemset, f64>,
    insertion_order: Vec<Itemset>,
    num_transactions: usize,
}

impl FrequentItemsetTable {

    pub fn new(num_transactions: usize) -> Self {
        FrequentItemsetTable {
            supports: FnvHashMap::default(),
            insertion_order: Vec::new(),
            num_transactions,
        }
    }

    fn insert(&mut self, itemset: Itemset, support: f64) {
        if !self.supports.contains_key(&itemset) {
            self.supports.insert(itemset.clone(), support);
            self.insertion_order.push(itemset);
        }
    }

    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.supports.get(itemset).cloned()
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.supports.contains_key(itemset)
    }

    pub fn len(&self) -> usize {
        self.insertion_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertion_order.is_empty()
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    /// Size of the largest frequent itemset, zero for an empty table.
    pub fn max_itemset_size(&self) -> usize {
        self.insertion_order.iter().map(Itemset::len).max().unwrap_or(0)
    }

    /// Iterates over itemsets and their support in insertion order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item=(&'a Itemset, f64)> + 'a {
        self.insertion_order.iter()
            .map(move |itemset| (itemset, self.supports[itemset]))
    }
}

/// Level-wise search for all itemsets whose support ratio is at least `config.min_support`, up to
/// `config.max_itemset_size` items. Candidates of size k are built by joining frequent itemsets of
/// size k - 1 with a common prefix, and discarded if any of their (k - 1)-subsets is not frequent.
pub fn frequent_itemsets(
    transactions: &[Transaction],
    config: &MiningConfig,
) -> FrequentItemsetTable {

    let num_transactions = transactions.len();
    let mut table = FrequentItemsetTable::new(num_transactions);

    if num_transactions == 0 {
        info!("No transactions to mine");
        return table;
    }

    let mining_start = Instant::now();

    let mut level = frequent_items(transactions, config.min_support, &mut table);
    info!(itemset_size = 1, frequent_itemsets = level.len(), "Counted item supports");

    let pool = if config.num_threads > 1 {
        Some(Pool::new(config.num_threads))
    } else {
        None
    };

    let mut combinations = Combinations::new(0, 0);
    let mut k = 2;

    while !level.is_empty() && k <= config.max_itemset_size {

        let candidates = generate_candidates(&level, k, &table, &mut combinations);
        debug!(itemset_size = k, candidates = candidates.len(), "Generated candidates");

        if candidates.is_empty() {
            break;
        }

        let counts = count_support(&candidates, transactions, pool.as_ref(), config.num_threads);

        let mut next_level = Vec::new();
        for (candidate, count) in candidates.into_iter().zip(counts.into_iter()) {
            let support = f64::from(count) / num_transactions as f64;
            if support >= config.min_support {
                table.insert(candidate.clone(), support);
                next_level.push(candidate);
            }
        }

        info!(itemset_size = k, frequent_itemsets = next_level.len(), "Counted candidate supports");

        level = next_level;
        k += 1;
    }

    if let Some(pool) = pool {
        pool.shutdown();
    }

    info!(
        "Found {} frequent itemsets in {} transactions, {}ms mining time",
        table.len(),
        num_transactions,
        mining_start.elapsed().as_millis(),
    );

    table
}

/// Seeds the table with all frequent single items, returned in ascending item order.
fn frequent_items(
    transactions: &[Transaction],
    min_support: f64,
    table: &mut FrequentItemsetTable,
) -> Vec<Itemset> {

    let mut item_counts: FnvHashMap<ItemId, u32> =
        FnvHashMap::with_capacity_and_hasher(100, Default::default());

    for transaction in transactions.iter() {
        for item in transaction.iter() {
            *item_counts.entry(*item).or_insert(0) += 1;
        }
    }

    let num_transactions = transactions.len() as f64;

    let mut frequent: Vec<(ItemId, f64)> = item_counts.into_iter()
        .map(|(item, count)| (item, f64::from(count) / num_transactions))
        .filter(|&(_, support)| support >= min_support)
        .collect();

    frequent.sort_by_key(|&(item, _)| item);

    frequent.into_iter()
        .map(|(item, support)| {
            let itemset = Itemset::singleton(item);
            table.insert(itemset.clone(), support);
            itemset
        })
        .collect()
}

/// Joins pairs of frequent (k - 1)-itemsets sharing their first k - 2 items, and prunes every
/// union which has an infrequent (k - 1)-subset. Surviving candidates are distinct and keep the
/// order in which they were first generated.
fn generate_candidates(
    previous_level: &[Itemset],
    k: usize,
    table: &FrequentItemsetTable,
    combinations: &mut Combinations,
) -> Vec<Itemset> {

    let mut seen: FnvHashSet<Itemset> = FnvHashSet::default();
    let mut candidates = Vec::new();

    for (index, itemset) in previous_level.iter().enumerate() {
        for other in previous_level[index + 1..].iter() {

            if !itemset.shares_prefix(other, k - 2) {
                continue;
            }

            let candidate = itemset.union(other);

            if candidate.len() != k || !all_subsets_frequent(&candidate, table, combinations) {
                continue;
            }

            if seen.insert(candidate.clone()) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

fn all_subsets_frequent(
    candidate: &Itemset,
    table: &FrequentItemsetTable,
    combinations: &mut Combinations,
) -> bool {

    combinations.reset(candidate.len(), candidate.len() - 1);

    while let Some(positions) = combinations.next_combination() {
        if !table.contains(&candidate.select(positions)) {
            return false;
        }
    }

    true
}

/// Number of transactions containing each candidate. With a pool, candidates are split into one
/// chunk per worker, every worker writes the counts of its own chunk.
fn count_support(
    candidates: &[Itemset],
    transactions: &[Transaction],
    pool: Option<&Pool>,
    num_threads: usize,
) -> Vec<u32> {

    let mut counts = vec![0_u32; candidates.len()];

    match pool {
        None => count_chunk(candidates, transactions, &mut counts),
        Some(pool) => {
            let chunk_size = (candidates.len() + num_threads - 1) / num_threads;

            pool.scoped(|scope| {
                for (candidates_chunk, counts_chunk) in
                    candidates.chunks(chunk_size).zip(counts.chunks_mut(chunk_size)) {

                    scope.execute(move || {
                        count_chunk(candidates_chunk, transactions, counts_chunk)
                    });
                }
            });
        }
    }

    counts
}

fn count_chunk(candidates: &[Itemset], transactions: &[Transaction], counts: &mut [u32]) {
    for transaction in transactions.iter() {
        for (candidate, count) in candidates.iter().zip(counts.iter_mut()) {
            if candidate.is_contained_in(transaction) {
                *count += 1;
            }
        }
    }
}
