//! Incremental clustering of mismatching pixels.
//!
//! During the scan each point either extends the first provisional cluster
//! whose radius-expanded rectangle contains it, or starts a new one. Because
//! clusters only grow, two provisional rectangles can end up overlapping;
//! [`join_clusters`] merges every connected component of the overlap graph
//! into a single rectangle.

use crate::diff::area::Rect;

/// Default cluster radius in pixels.
pub const CLUSTERS_SIZE: usize = 10;

/// Provisional diff clusters collected during a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffClusters {
    radius: usize,
    clusters: Vec<Rect>,
}

impl Default for DiffClusters {
    fn default() -> Self {
        Self::new(CLUSTERS_SIZE)
    }
}

impl DiffClusters {
    /// Creates an empty cluster set with the given radius. A radius of zero
    /// selects [`CLUSTERS_SIZE`].
    pub fn new(radius: usize) -> Self {
        let radius = if radius == 0 { CLUSTERS_SIZE } else { radius };
        Self {
            radius,
            clusters: Vec::new(),
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Adds a mismatching point.
    pub fn update(&mut self, x: usize, y: usize) -> &mut Self {
        let radius = self.radius;
        let hit = self.clusters.iter_mut().find(|rect| {
            x >= rect.left.saturating_sub(radius)
                && x <= rect.right.saturating_add(radius)
                && y >= rect.top.saturating_sub(radius)
                && y <= rect.bottom.saturating_add(radius)
        });
        match hit {
            Some(rect) => rect.include(x, y),
            None => self.clusters.push(Rect::point(x, y)),
        }
        self
    }

    /// Appends the provisional clusters of another partition.
    pub fn extend(&mut self, other: DiffClusters) {
        self.clusters.extend(other.clusters);
    }

    /// Provisional (not yet joined) rectangles in insertion order.
    pub fn provisional(&self) -> &[Rect] {
        &self.clusters
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Returns the final, non-overlapping cluster list.
    pub fn clusters(&self) -> Vec<Rect> {
        join_clusters(&self.clusters)
    }
}

/// Merges overlapping rectangles until no two of them overlap.
///
/// A merged component can grow over a rectangle it had no member in common
/// with, so components are joined repeatedly until the count stops shrinking.
/// Output order follows the first member of each component. Joining an
/// already joined list returns it unchanged.
pub fn join_clusters(rects: &[Rect]) -> Vec<Rect> {
    let mut joined = join_components(rects);
    loop {
        let next = join_components(&joined);
        if next.len() == joined.len() {
            return next;
        }
        joined = next;
    }
}

/// One union-find pass over the overlap graph.
fn join_components(rects: &[Rect]) -> Vec<Rect> {
    let mut sets = DisjointSets::new(rects.len());
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].overlaps(&rects[j]) {
                sets.union(i, j);
            }
        }
    }

    let mut slot_of_root: Vec<Option<usize>> = vec![None; rects.len()];
    let mut joined: Vec<Rect> = Vec::new();
    for (idx, rect) in rects.iter().enumerate() {
        let root = sets.find(idx);
        match slot_of_root[root] {
            Some(slot) => joined[slot] = joined[slot].union(rect),
            None => {
                slot_of_root[root] = Some(joined.len());
                joined.push(*rect);
            }
        }
    }
    joined
}

struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            self.parent[idx] = self.parent[self.parent[idx]];
            idx = self.parent[idx];
        }
        idx
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
