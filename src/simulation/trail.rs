//! Bounded history of recent positions, newest first.

use std::collections::VecDeque;

use super::states::NVec2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<NVec2>,
}

impl Trail {
    /// Prepend `point` and evict the oldest entries beyond `limit`.
    /// A limit of zero disables trails and keeps the history empty.
    pub fn record(&mut self, point: NVec2, limit: usize) {
        if limit == 0 {
            self.points.clear();
            return;
        }
        self.points.push_front(point);
        self.points.truncate(limit);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn newest(&self) -> Option<&NVec2> {
        self.points.front()
    }

    pub fn oldest(&self) -> Option<&NVec2> {
        self.points.back()
    }

    pub fn get(&self, k: usize) -> Option<&NVec2> {
        self.points.get(k)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NVec2> + '_ {
        self.points.iter()
    }

    /// Consecutive point pairs `(trail[k], trail[k + 1])`, newest segment first
    pub fn segments(&self) -> impl Iterator<Item = (usize, &NVec2, &NVec2)> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .enumerate()
            .map(|(k, (a, b))| (k, a, b))
    }
}
