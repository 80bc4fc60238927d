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

use fnv::FnvHashMap;

use crate::types::{ItemId, Transaction, UserId};

/// Groups liked (user, item) events into one transaction per user. Users are assigned consecutive
/// transaction indices in the order in which they are first seen, so a user only gets a
/// transaction once they liked at least one item.
pub struct TransactionBuilder {
    user_index: FnvHashMap<UserId, usize>,
    transactions: Vec<Transaction>,
    num_interactions: u64,
}

impl TransactionBuilder {

    pub fn new() -> Self {
        TransactionBuilder {
            user_index: FnvHashMap::with_capacity_and_hasher(100, Default::default()),
            transactions: Vec::with_capacity(100),
            num_interactions: 0,
        }
    }

    pub fn add(&mut self, user: UserId, item: ItemId) {

        let next_index = self.transactions.len();
        let index = *self.user_index.entry(user).or_insert(next_index);

        if index == next_index {
            self.transactions.push(Transaction::with_capacity_and_hasher(10, Default::default()));
        }

        self.transactions[index].insert(item);
        self.num_interactions += 1;
    }

    pub fn num_users(&self) -> usize {
        self.transactions.len()
    }

    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }

    pub fn build(self) -> Vec<Transaction> {
        self.transactions
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        TransactionBuilder::new()
    }
}

/// Aggregates liked interactions into per-user transactions.
pub fn transactions_from<I>(liked: I) -> Vec<Transaction>
    where I: IntoIterator<Item=(UserId, ItemId)> {

    let mut builder = TransactionBuilder::new();

    for (user, item) in liked {
        builder.add(user, item);
    }

    builder.build()
}

#[cfg(test)]
mod tests {

    use super::{transactions_from, TransactionBuilder};

    #[test]
    fn groups_by_user() {
        let liked = vec![(10, 1), (20, 2), (10, 3), (10, 1), (30, 2), (20, 1)];

        let mut builder = TransactionBuilder::new();
        for &(user, item) in &liked {
            builder.add(user, item);
        }

        assert_eq!(builder.num_users(), 3);
        assert_eq!(builder.num_interactions(), 6);

        let transactions = builder.build();

        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].len(), 2);
        assert!(transactions[0].contains(&1) && transactions[0].contains(&3));
        assert!(transactions[1].contains(&2) && transactions[1].contains(&1));
        assert_eq!(transactions[2].len(), 1);
    }

    #[test]
    fn empty_input() {
        assert!(transactions_from(Vec::new()).is_empty());
    }
}
