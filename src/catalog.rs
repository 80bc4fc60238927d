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
use serde_derive::Serialize;

use crate::error::{RecorulesError, Result};
use crate::recommend::{resolve_title, TitleLookup};
use crate::types::{parse_item_id, ItemId, UserId};

/// Metadata of a single movie.
#[derive(Clone, PartialEq, Debug)]
pub struct Movie {
    pub id: ItemId,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub release_year: Option<i32>,
}

/// Entry of the popularity listing. Field names will be used in JSON.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct PopularMovie {
    pub id: ItemId,
    pub title: String,
    pub release_year: Option<i32>,
    pub num_likes: u32,
}

/// Movie metadata keyed by movie id.
#[derive(Default)]
pub struct Catalog {
    movies: FnvHashMap<ItemId, Movie>,
}

impl Catalog {

    pub fn new() -> Self {
        Catalog::default()
    }

    /// Adds a movie unless its id is already known, returns whether it was added.
    pub fn insert(&mut self, movie: Movie) -> bool {
        if self.movies.contains_key(&movie.id) {
            false
        } else {
            self.movies.insert(movie.id, movie);
            true
        }
    }

    pub fn lookup(&self, item: ItemId) -> Option<&Movie> {
        self.movies.get(&item)
    }

    /// The catalogued movie a user supplied id refers to.
    pub fn find_query(&self, raw_query: &str) -> Result<&Movie> {
        let item = parse_item_id(raw_query).ok_or_else(|| {
            RecorulesError::InvalidArgument(format!("'{}' is not a valid movie id", raw_query))
        })?;

        self.lookup(item).ok_or(RecorulesError::UnknownMovie(item))
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.movies.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// The `n` catalogued movies with the most likes, ties are broken by ascending movie id.
    pub fn popular<I>(&self, liked: I, n: usize) -> Vec<PopularMovie>
        where I: IntoIterator<Item=(UserId, ItemId)> {

        let mut num_likes: FnvHashMap<ItemId, u32> = FnvHashMap::default();

        for (_, item) in liked {
            if self.contains(item) {
                *num_likes.entry(item).or_insert(0) += 1;
            }
        }

        let mut counted: Vec<(ItemId, u32)> = num_likes.into_iter().collect();
        counted.sort_by(|(item_a, count_a), (item_b, count_b)| {
            count_b.cmp(count_a).then(item_a.cmp(item_b))
        });

        counted.into_iter()
            .take(n)
            .map(|(item, num_likes)| {
                PopularMovie {
                    id: item,
                    title: resolve_title(self, item),
                    release_year: self.lookup(item).and_then(|movie| movie.release_year),
                    num_likes,
                }
            })
            .collect()
    }
}

impl TitleLookup for Catalog {

    fn title(&self, item: ItemId) -> Option<&str> {
        self.lookup(item)
            .and_then(|movie| movie.title.as_ref())
            .map(String::as_str)
            .filter(|title| !title.is_empty())
    }

    fn original_title(&self, item: ItemId) -> Option<&str> {
        self.lookup(item)
            .and_then(|movie| movie.original_title.as_ref())
            .map(String::as_str)
            .filter(|title| !title.is_empty())
    }
}

#[cfg(test)]
mod tests {

    use crate::error::RecorulesError;
    use crate::recommend::{resolve_title, TitleLookup};
    use super::{Catalog, Movie};

    fn movie(id: u32, title: Option<&str>, original_title: Option<&str>) -> Movie {
        Movie {
            id,
            title: title.map(String::from),
            original_title: original_title.map(String::from),
            release_year: Some(1995),
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(movie(1, Some("Toy Story"), Some("Toy Story")));
        catalog.insert(movie(2, Some("Jumanji"), None));
        catalog.insert(movie(3, None, Some("Grumpier Old Men")));
        catalog.insert(movie(4, Some(""), None));
        catalog
    }

    #[test]
    fn keeps_first_occurrence() {
        let mut catalog = catalog();

        assert!(!catalog.insert(movie(1, Some("Duplicate"), None)));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.title(1), Some("Toy Story"));
        assert!(catalog.lookup(99).is_none());
    }

    #[test]
    fn query_lookup() {
        let catalog = catalog();

        assert_eq!(catalog.find_query(" 2 ").unwrap().id, 2);
        assert_eq!(catalog.find_query("3.0").unwrap().id, 3);

        match catalog.find_query("99") {
            Err(RecorulesError::UnknownMovie(item)) => assert_eq!(item, 99),
            other => panic!("expected an unknown movie, got {:?}", other),
        }

        match catalog.find_query("abc") {
            Err(RecorulesError::InvalidArgument(_)) => {},
            other => panic!("expected an invalid id, got {:?}", other),
        }

        assert!(!catalog.is_empty());
        assert!(Catalog::new().is_empty());
    }

    #[test]
    fn title_resolution() {
        let catalog = catalog();

        assert_eq!(resolve_title(&catalog, 2), "Jumanji");
        assert_eq!(resolve_title(&catalog, 3), "Grumpier Old Men");
        assert_eq!(resolve_title(&catalog, 4), "Title unavailable (ID: 4)");
        assert_eq!(resolve_title(&catalog, 99), "Title unavailable (ID: 99)");
    }

    #[test]
    fn popularity_ranking() {
        let catalog = catalog();
        let liked = vec![(1, 2), (2, 2), (3, 1), (1, 3), (2, 3), (4, 99), (5, 99), (6, 99)];

        let popular = catalog.popular(liked, 2);

        assert_eq!(popular.len(), 2);
        assert_eq!((popular[0].id, popular[0].num_likes), (2, 2));
        assert_eq!(popular[0].title, "Jumanji");
        assert_eq!(popular[0].release_year, Some(1995));
        assert_eq!((popular[1].id, popular[1].num_likes), (3, 2));
    }
}
