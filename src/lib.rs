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

use tracing::info;

pub mod types;
pub mod combinations;
pub mod transactions;
pub mod apriori;
pub mod rules;
pub mod recommend;
pub mod catalog;
pub mod io;
pub mod config;
pub mod error;


use apriori::FrequentItemsetTable;
use config::MiningConfig;
use rules::SimpleRule;
use types::Transaction;

/// Mines the frequent itemsets of the transactions and derives the simple rules from them, sorted
/// by descending confidence.
pub fn association_rules(
    transactions: &[Transaction],
    config: &MiningConfig,
) -> (FrequentItemsetTable, Vec<SimpleRule>) {

    let start = Instant::now();

    let table = apriori::frequent_itemsets(transactions, config);
    let rules = rules::generate_rules(&table, config.min_confidence);
    let simple_rules = rules::simple_rules(&rules);

    info!(
        "{} frequent itemsets, {} rules ({} simple), {}ms total time",
        table.len(),
        rules.len(),
        simple_rules.len(),
        start.elapsed().as_millis(),
    );

    (table, simple_rules)
}
