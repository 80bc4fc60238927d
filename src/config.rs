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

use crate::error::{RecorulesError, Result};

pub const DEFAULT_MIN_SUPPORT: f64 = 0.1;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.1;
/// Hard bound on the size of mined itemsets, larger co-occurrence patterns are not searched for.
pub const DEFAULT_MAX_ITEMSET_SIZE: usize = 5;
/// Ratings strictly above this value count as a "like".
pub const DEFAULT_LIKE_THRESHOLD: f64 = 3.0;

/// Thresholds and resources for a mining run.
#[derive(Clone, Debug, PartialEq)]
pub struct MiningConfig {
    /// Minimum fraction of transactions an itemset must occur in, in (0, 1].
    pub min_support: f64,
    /// Minimum confidence of a retained rule, in (0, 1].
    pub min_confidence: f64,
    pub max_itemset_size: usize,
    pub like_threshold: f64,
    /// Number of workers used to count candidate support.
    pub num_threads: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_itemset_size: DEFAULT_MAX_ITEMSET_SIZE,
            like_threshold: DEFAULT_LIKE_THRESHOLD,
            num_threads: num_cpus::get(),
        }
    }
}

impl MiningConfig {

    pub fn validate(&self) -> Result<()> {

        check_ratio("min_support", self.min_support)?;
        check_ratio("min_confidence", self.min_confidence)?;

        if self.max_itemset_size == 0 {
            return Err(RecorulesError::InvalidConfig(
                String::from("max_itemset_size must be at least 1")));
        }

        if !self.like_threshold.is_finite() {
            return Err(RecorulesError::InvalidConfig(
                format!("like_threshold must be a finite number, got {}", self.like_threshold)));
        }

        if self.num_threads == 0 {
            return Err(RecorulesError::InvalidConfig(
                String::from("num_threads must be at least 1")));
        }

        Ok(())
    }
}

fn check_ratio(name: &str, value: f64) -> Result<()> {
    // NaN fails both comparisons
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(RecorulesError::InvalidConfig(format!("{} must be in (0, 1], got {}", name, value)))
    }
}
