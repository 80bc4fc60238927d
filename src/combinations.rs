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

/// Restartable generator for all `k`-combinations of the positions `0..n`, produced in
/// lexicographic order. The index buffer is reused across restarts, which matters because we
/// enumerate subsets for every candidate during pruning and for every itemset during rule
/// generation.
pub struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Combinations {

    pub fn new(n: usize, k: usize) -> Self {
        let mut combinations = Combinations {
            n,
            k,
            indices: Vec::with_capacity(k),
            started: false,
            exhausted: false,
        };

        combinations.restart();
        combinations
    }

    /// Rewinds to the first combination.
    pub fn restart(&mut self) {
        self.indices.clear();
        self.indices.extend(0..self.k);
        self.started = false;
        self.exhausted = self.k > self.n;
    }

    /// Switches to `k`-combinations of `0..n` and rewinds.
    pub fn reset(&mut self, n: usize, k: usize) {
        self.n = n;
        self.k = k;
        self.restart();
    }

    /// Returns the next combination as ascending positions, or `None` once all have been produced.
    pub fn next_combination(&mut self) -> Option<&[usize]> {

        if self.exhausted {
            return None;
        }

        if !self.started {
            self.started = true;
            return Some(self.indices.as_slice());
        }

        // Find the rightmost position which has not reached its maximum value n - k + i yet
        let mut position = self.k;
        loop {
            if position == 0 {
                self.exhausted = true;
                return None;
            }
            position -= 1;

            if self.indices[position] < self.n - self.k + position {
                break;
            }
        }

        self.indices[position] += 1;
        for next in (position + 1)..self.k {
            self.indices[next] = self.indices[next - 1] + 1;
        }

        Some(self.indices.as_slice())
    }
}

#[cfg(test)]
mod tests {

    use super::Combinations;

    fn collect_all(combinations: &mut Combinations) -> Vec<Vec<usize>> {
        let mut all = Vec::new();
        while let Some(positions) = combinations.next_combination() {
            all.push(positions.to_vec());
        }
        all
    }

    #[test]
    fn lexicographic_order() {
        let mut combinations = Combinations::new(4, 2);

        assert_eq!(
            collect_all(&mut combinations),
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );

        assert!(combinations.next_combination().is_none());
    }

    #[test]
    fn restartable() {
        let mut combinations = Combinations::new(5, 3);
        let first_pass = collect_all(&mut combinations);

        combinations.restart();
        let second_pass = collect_all(&mut combinations);

        assert_eq!(first_pass.len(), 10);
        assert_eq!(first_pass, second_pass);

        combinations.reset(3, 2);
        assert_eq!(collect_all(&mut combinations), vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn degenerate_sizes() {
        assert_eq!(collect_all(&mut Combinations::new(3, 3)), vec![vec![0, 1, 2]]);
        assert_eq!(collect_all(&mut Combinations::new(3, 0)), vec![Vec::<usize>::new()]);
        assert!(collect_all(&mut Combinations::new(2, 3)).is_empty());
    }
}
