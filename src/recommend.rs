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

use fnv::{FnvHashMap, FnvHashSet};
use serde_derive::Serialize;

use crate::rules::SimpleRule;
use crate::types::{parse_item_id, ItemId};

/// Resolves movie ids to display titles.
pub trait TitleLookup {

    fn title(&self, item: ItemId) -> Option<&str>;

    fn original_title(&self, _item: ItemId) -> Option<&str> {
        None
    }
}

impl TitleLookup for FnvHashMap<ItemId, String> {
    fn title(&self, item: ItemId) -> Option<&str> {
        self.get(&item).map(String::as_str)
    }
}

/// A recommended movie. Field names will be used in JSON.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Recommendation {
    pub item: ItemId,
    pub title: String,
    pub confidence: f64,
}

/// The title of an item, falling back to its original title and finally to a placeholder which
/// still names the item id.
pub fn resolve_title<L>(titles: &L, item: ItemId) -> String where L: TitleLookup + ?Sized {
    titles.title(item)
        .or_else(|| titles.original_title(item))
        .map(String::from)
        .unwrap_or_else(|| format!("Title unavailable (ID: {})", item))
}

/// Recommends the consequents of all simple rules whose antecedent is `query`. The rules must be
/// sorted by descending confidence, which makes the first occurrence of a consequent also its
/// highest-confidence one. The query itself is never recommended.
pub fn recommend<L>(query: ItemId, rules: &[SimpleRule], titles: &L) -> Vec<Recommendation>
    where L: TitleLookup + ?Sized {

    let mut already_recommended: FnvHashSet<ItemId> = FnvHashSet::default();

    rules.iter()
        .filter(|rule| rule.antecedent == query)
        .filter(|rule| rule.consequent != query)
        .filter(|rule| already_recommended.insert(rule.consequent))
        .map(|rule| {
            Recommendation {
                item: rule.consequent,
                title: resolve_title(titles, rule.consequent),
                confidence: rule.confidence,
            }
        })
        .collect()
}

/// Like `recommend`, for an unvalidated query. Queries which are not a movie id yield no
/// recommendations.
pub fn recommend_for<L>(raw_query: &str, rules: &[SimpleRule], titles: &L) -> Vec<Recommendation>
    where L: TitleLookup + ?Sized {

    match parse_item_id(raw_query) {
        Some(query) => recommend(query, rules, titles),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {

    use fnv::FnvHashMap;

    use crate::rules::SimpleRule;
    use super::{recommend, recommend_for, resolve_title, TitleLookup};

    fn rule(antecedent: u32, consequent: u32, confidence: f64) -> SimpleRule {
        SimpleRule { antecedent, consequent, confidence }
    }

    fn titles() -> FnvHashMap<u32, String> {
        let mut titles = FnvHashMap::default();
        titles.insert(2, String::from("Jumanji"));
        titles.insert(3, String::from("Grumpier Old Men"));
        titles
    }

    #[test]
    fn first_occurrence_wins() {
        let rules = vec![
            rule(1, 2, 0.9),
            rule(4, 3, 0.8),
            rule(1, 3, 0.7),
            rule(1, 2, 0.5),
            rule(1, 1, 0.4),
        ];

        let recommendations = recommend(1, &rules, &titles());

        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].item, 2);
        assert_eq!(recommendations[0].title, "Jumanji");
        assert!((recommendations[0].confidence - 0.9).abs() < 1e-9);
        assert_eq!(recommendations[1].item, 3);
        assert!((recommendations[1].confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn invalid_or_unknown_queries() {
        let rules = vec![rule(1, 2, 0.9)];

        assert!(recommend_for("abc", &rules, &titles()).is_empty());
        assert!(recommend_for("99", &rules, &titles()).is_empty());
        assert_eq!(recommend_for("1.0", &rules, &titles()).len(), 1);
        assert!(recommend(1, &[], &titles()).is_empty());
    }

    struct OriginalTitlesOnly;

    impl TitleLookup for OriginalTitlesOnly {
        fn title(&self, _item: u32) -> Option<&str> {
            None
        }

        fn original_title(&self, item: u32) -> Option<&str> {
            if item == 5 { Some("Le Samouraï") } else { None }
        }
    }

    #[test]
    fn title_fallbacks() {
        assert_eq!(resolve_title(&OriginalTitlesOnly, 5), "Le Samouraï");
        assert_eq!(resolve_title(&OriginalTitlesOnly, 6), "Title unavailable (ID: 6)");

        let recommendations = recommend(1, &[rule(1, 42, 0.3)], &titles());
        assert_eq!(recommendations[0].title, "Title unavailable (ID: 42)");
    }
}
