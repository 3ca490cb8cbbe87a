//! Rank-based electrostatic field solver
//!
//! With a uniform neutralizing background, the field on a sheet is
//! proportional to how far its rank among all sheets (the charge to its left)
//! departs from the rank a uniform distribution would give at its position:
//!
//! `field[i] = coeff * (rank[i] * step - (x[i] + xmax))`
//!
//! Ranks come from a sorted copy of the positions, rebuilt on every call.

use crate::config::{Config, RankStrategy};
use std::cmp::Ordering;

/// Position of a sheet plus its index, so coincident sheets still order
/// deterministically (lower index first)
type SortKey = (f64, usize);

fn key_cmp(a: &SortKey, b: &SortKey) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Narrow `[start, end]` until adjacent, moving `start` while `is_below`
/// holds at the midpoint. Returns the first index that is not below, which
/// for a value present in `sorted` is its exact position.
///
/// Empty and single-element slices give 0.
pub fn search_rank<T>(sorted: &[T], mut is_below: impl FnMut(&T) -> bool) -> usize {
    if sorted.len() < 2 {
        return 0;
    }
    let mut start = 0;
    let mut end = sorted.len() - 1;
    while start + 1 < end {
        let mid = (start + end) / 2;
        if is_below(&sorted[mid]) {
            start = mid;
        } else {
            end = mid;
        }
    }
    if is_below(&sorted[start]) {
        end
    } else {
        start
    }
}

/// Rank of `value` in an ascending slice: the number of elements strictly
/// less than it, when `value` is present
pub fn rank_of(sorted: &[f64], value: f64) -> usize {
    search_rank(sorted, |&x| x < value)
}

/// Computes the field on every sheet.
///
/// Owns the sort buffers so repeated calls do not reallocate them.
#[derive(Debug, Default)]
pub struct FieldSolver {
    strategy: RankStrategy,
    order: Vec<SortKey>,
    ranks: Vec<usize>,
}

impl FieldSolver {
    pub fn new(strategy: RankStrategy) -> Self {
        Self {
            strategy,
            order: Vec::new(),
            ranks: Vec::new(),
        }
    }

    pub fn strategy(&self) -> RankStrategy {
        self.strategy
    }

    /// Rank of every sheet in ascending position order, index-aligned with
    /// `positions`. Ties are broken by sheet index.
    pub fn ranks(&mut self, positions: &[f64]) -> &[usize] {
        self.order.clear();
        self.order
            .extend(positions.iter().copied().zip(0..positions.len()));
        self.order.sort_unstable_by(key_cmp);

        self.ranks.clear();
        match self.strategy {
            RankStrategy::Binary => {
                for (i, &x) in positions.iter().enumerate() {
                    let key = (x, i);
                    let rank = search_rank(&self.order, |k| key_cmp(k, &key) == Ordering::Less);
                    self.ranks.push(rank);
                }
            }
            RankStrategy::Walk => {
                let mut rank = 0;
                for (i, &x) in positions.iter().enumerate() {
                    let key = (x, i);
                    if i == 0 {
                        rank = search_rank(&self.order, |k| key_cmp(k, &key) == Ordering::Less);
                    } else {
                        // every key is present, so the walk stops on it
                        while key_cmp(&self.order[rank], &key) == Ordering::Less {
                            rank += 1;
                        }
                        while key_cmp(&self.order[rank], &key) == Ordering::Greater {
                            rank -= 1;
                        }
                    }
                    self.ranks.push(rank);
                }
            }
        }
        &self.ranks
    }

    /// Field at every sheet, index-aligned with `positions`.
    ///
    /// Fewer than two sheets feel no field.
    pub fn field(&mut self, positions: &[f64], config: &Config) -> Vec<f64> {
        if positions.len() < 2 {
            return vec![0.0; positions.len()];
        }
        let step = config.step();
        let coeff = config.coeff();
        let xmax = config.xmax();
        self.ranks(positions);
        positions
            .iter()
            .zip(&self.ranks)
            .map(|(&x, &rank)| coeff * (rank as f64 * step - (x + xmax)))
            .collect()
    }
}
