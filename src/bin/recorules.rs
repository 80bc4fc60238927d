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

use std::env;
use std::fmt::Display;
use std::process;
use std::str::FromStr;

use getopts::{Matches, Options};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recorules::catalog::Catalog;
use recorules::config::MiningConfig;
use recorules::error::{RecorulesError, Result};
use recorules::io;
use recorules::recommend;
use recorules::recommend::resolve_title;
use recorules::transactions::TransactionBuilder;
use recorules::types::parse_item_id;

fn main() {

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("r", "ratings", "Ratings file name (required). CSV with a header line and the \
        columns userId, movieId and rating.", "PATH");
    opts.optopt("m", "movies", "Movie metadata file name (optional). CSV with a header line and \
        the columns id, title, original_title and release_date. If given, only liked ratings of \
        catalogued movies are mined.", "PATH");
    opts.optopt("q", "query", "Id of the movie to compute recommendations for.", "MOVIE_ID");
    opts.optopt("s", "min-support", "Minimum support ratio of frequent itemsets (optional, \
        defaults to 0.1).", "RATIO");
    opts.optopt("c", "min-confidence", "Minimum confidence of rules (optional, defaults to 0.1).",
        "RATIO");
    opts.optopt("l", "max-itemset-size", "Maximum number of movies per frequent itemset \
        (optional, defaults to 5).", "NUMBER");
    opts.optopt("t", "like-threshold", "Ratings strictly above this value count as likes \
        (optional, defaults to 3.0).", "RATING");
    opts.optopt("n", "num-recommendations", "Number of recommendations to output (optional, \
        defaults to 10).", "NUMBER");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to stdout \
        by default).", "PATH");
    opts.optflag("", "rules", "Output all single-movie rules instead of recommendations.");
    opts.optopt("", "catalog", "Output the given number of most liked movies instead of \
        recommendations (requires --movies).", "NUMBER");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    if !matches.opt_present("r") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify a ratings file via --ratings."),
        );
    }

    let wants_output = ["q", "rules", "catalog"].iter().any(|name| matches.opt_present(name));

    if !wants_output {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify a movie via --query, or ask for --rules or --catalog."),
        );
    }

    let config = match mining_config(&matches) {
        Ok(config) => config,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if let Err(failure) = run(&matches, &config) {
        eprintln!("{}", failure);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));

    process::exit(if hint.is_some() { 1 } else { 0 });
}

fn option<T>(matches: &Matches, name: &str, default: T) -> Result<T>
    where T: FromStr, T::Err: Display {

    matches.opt_get_default(name, default).map_err(|failure| {
        RecorulesError::InvalidArgument(format!("Problem with option '{}': {}", name, failure))
    })
}

fn mining_config(matches: &Matches) -> Result<MiningConfig> {

    let defaults = MiningConfig::default();

    let config = MiningConfig {
        min_support: option(matches, "s", defaults.min_support)?,
        min_confidence: option(matches, "c", defaults.min_confidence)?,
        max_itemset_size: option(matches, "l", defaults.max_itemset_size)?,
        like_threshold: option(matches, "t", defaults.like_threshold)?,
        num_threads: defaults.num_threads,
    };

    config.validate()?;

    Ok(config)
}

fn run(matches: &Matches, config: &MiningConfig) -> Result<()> {

    let output_path = matches.opt_str("o");

    let catalog = match matches.opt_str("m") {
        Some(movies_path) => {
            info!("Reading movie metadata from {}", movies_path);
            let catalog = io::read_movies(&movies_path)?;
            if catalog.is_empty() {
                warn!("No movies found in {}, every like will be discarded", movies_path);
            } else {
                info!("Found {} movies", catalog.len());
            }
            Some(catalog)
        },
        None => None,
    };

    let ratings_path = matches.opt_str("r")
        .ok_or_else(|| RecorulesError::InvalidArgument(String::from("Missing --ratings")))?;

    info!("Reading {} to collect likes (rating > {})", ratings_path, config.like_threshold);
    let mut liked = io::read_liked_ratings(&ratings_path, config.like_threshold)?;

    if let Some(catalog) = catalog.as_ref() {
        liked.retain(|&(_, item)| catalog.contains(item));
    }

    if matches.opt_present("catalog") {
        let catalog = catalog.as_ref().ok_or_else(|| {
            RecorulesError::InvalidArgument(String::from("--catalog requires --movies"))
        })?;

        let n: usize = option(matches, "catalog", 10)?;
        let popular = catalog.popular(liked.iter().cloned(), n);

        info!("Writing the {} most liked movies...", popular.len());
        return io::write_popular(&popular, output_path);
    }

    let mut builder = TransactionBuilder::new();
    for &(user, item) in liked.iter() {
        builder.add(user, item);
    }

    info!(
        "Found {} likes from {} users",
        builder.num_interactions(),
        builder.num_users(),
    );

    let transactions = builder.build();
    let (_, rules) = recorules::association_rules(&transactions, config);

    if matches.opt_present("rules") {
        info!("Writing {} rules...", rules.len());
        return io::write_rules(&rules, output_path);
    }

    let query = matches.opt_str("q")
        .ok_or_else(|| RecorulesError::InvalidArgument(String::from("Missing --query")))?;

    let num_recommendations: usize = option(matches, "n", 10)?;

    let no_titles = Catalog::new();
    let titles = catalog.as_ref().unwrap_or(&no_titles);

    if let Some(catalog) = catalog.as_ref() {
        match catalog.find_query(&query) {
            Ok(movie) => info!("Recommendations based on '{}'", resolve_title(catalog, movie.id)),
            Err(failure) => warn!("{}", failure),
        }
    }

    let mut recommendations = recommend::recommend_for(&query, &rules, titles);

    if recommendations.is_empty() {
        match parse_item_id(&query) {
            Some(_) => info!("No recommendations found for movie {}", query),
            // Already reported by the catalog lookup
            None if catalog.is_some() => {},
            None => warn!("'{}' is not a valid movie id", query),
        }
    }

    recommendations.truncate(num_recommendations);

    info!("Writing {} recommendations...", recommendations.len());
    io::write_recommendations(&recommendations, output_path)
}
