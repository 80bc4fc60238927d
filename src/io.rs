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

use std::fs::File;
use std::io::{stdout, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_derive::Deserialize;
use tracing::warn;

use crate::catalog::{Catalog, Movie, PopularMovie};
use crate::error::Result;
use crate::recommend::Recommendation;
use crate::rules::SimpleRule;
use crate::types::{parse_item_id, ItemId, UserId};

/// Reads a comma-separated CSV file. We expect a header line, as in the MovieLens exports.
pub fn csv_reader(file: &str) -> Result<csv::Reader<File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(file)?;

    Ok(reader)
}

/// One line of the ratings file, additional columns such as `timestamp` are ignored.
#[derive(Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user: UserId,
    #[serde(rename = "movieId")]
    item: ItemId,
    rating: f64,
}

/// One line of the movies metadata file.
#[derive(Deserialize)]
struct MovieRecord {
    id: String,
    title: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
}

/// The (user, item) pairs of all ratings strictly above `like_threshold`. Malformed lines are
/// skipped.
pub fn liked_ratings_from_csv<'a, R>(
    reader: &'a mut csv::Reader<R>,
    like_threshold: f64,
) -> impl Iterator<Item=(UserId, ItemId)> + 'a
    where R: Read {

    reader.deserialize::<RatingRecord>()
        .filter_map(|result| {
            match result {
                Ok(record) => Some(record),
                Err(failure) => {
                    warn!("Skipping malformed rating: {}", failure);
                    None
                }
            }
        })
        .filter(move |record| record.rating > like_threshold)
        .map(|record| (record.user, record.item))
}

pub fn read_liked_ratings(file: &str, like_threshold: f64) -> Result<Vec<(UserId, ItemId)>> {
    let mut reader = csv_reader(file)?;
    let liked = liked_ratings_from_csv(&mut reader, like_threshold).collect();

    Ok(liked)
}

/// Builds a catalog from movie metadata. Lines whose `id` is not a movie id are dropped, for
/// duplicate ids the first line wins.
pub fn movies_from_csv<R>(reader: &mut csv::Reader<R>) -> Catalog where R: Read {

    let mut catalog = Catalog::new();

    for result in reader.deserialize::<MovieRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(failure) => {
                warn!("Skipping malformed movie: {}", failure);
                continue;
            }
        };

        if let Some(id) = parse_item_id(&record.id) {
            catalog.insert(Movie {
                id,
                title: record.title,
                original_title: record.original_title,
                release_year: record.release_date.as_ref().and_then(|date| release_year(date)),
            });
        }
    }

    catalog
}

pub fn read_movies(file: &str) -> Result<Catalog> {
    let mut reader = csv_reader(file)?;
    Ok(movies_from_csv(&mut reader))
}

/// The year of a `YYYY-MM-DD` date.
fn release_year(date: &str) -> Option<i32> {
    date.trim().split('-').next().and_then(|year| year.parse().ok())
}

/// Writes one JSON document per record and line.
pub fn write_json_lines<W, T>(out: &mut W, records: &[T]) -> Result<()>
    where W: Write + ?Sized, T: Serialize {

    for record in records.iter() {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }

    Ok(())
}

/// If an `output_path` is supplied, we write to a file at the specified path, otherwise, we output
/// to stdout.
fn output(output_path: Option<String>) -> Result<Box<dyn Write>> {
    let out: Box<dyn Write> = match output_path {
        Some(path) => Box::new(File::create(&Path::new(&path))?),
        _ => Box::new(stdout()),
    };

    Ok(out)
}

pub fn write_rules(rules: &[SimpleRule], output_path: Option<String>) -> Result<()> {
    let mut out = output(output_path)?;
    write_json_lines(&mut out, rules)?;
    out.flush()?;
    Ok(())
}

pub fn write_recommendations(
    recommendations: &[Recommendation],
    output_path: Option<String>,
) -> Result<()> {
    let mut out = output(output_path)?;
    write_json_lines(&mut out, recommendations)?;
    out.flush()?;
    Ok(())
}

pub fn write_popular(popular: &[PopularMovie], output_path: Option<String>) -> Result<()> {
    let mut out = output(output_path)?;
    write_json_lines(&mut out, popular)?;
    out.flush()?;
    Ok(())
}
