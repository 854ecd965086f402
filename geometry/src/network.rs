use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::{envelope::Envelope, linear::segment::Segment, point::Point};

/// Undirected connectivity between points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    links: BTreeMap<Point, BTreeSet<Point>>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a Segment>) -> Self {
        let mut network = Self::new();
        for segment in segments {
            network.add_segment(segment);
        }
        network
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Adds an isolated node, keeping the links of an existing one.
    pub fn add_point(&mut self, point: Point) {
        self.links.entry(point).or_default();
    }

    /// Links both ends of `segment`. A zero length segment adds a lone node.
    pub fn add_segment(&mut self, segment: &Segment) {
        let (start, end) = (segment.start(), segment.end());
        if start == end {
            self.add_point(start);
            return;
        }
        self.links.entry(start).or_default().insert(end);
        self.links.entry(end).or_default().insert(start);
    }

    /// Folds `other` into this network; the links of shared nodes are united.
    pub fn merge(&mut self, other: Network) {
        for (point, neighbours) in other.links {
            self.links.entry(point).or_default().extend(neighbours);
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.links.contains_key(point)
    }

    pub fn neighbours(&self, point: &Point) -> impl Iterator<Item = &Point> {
        self.links.get(point).into_iter().flatten()
    }

    pub fn degree(&self, point: &Point) -> usize {
        self.links.get(point).map_or(0, BTreeSet::len)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Point> {
        self.links.keys()
    }

    /// Every link once, directed from its lower (y, then x) point.
    pub fn segments(&self) -> Vec<Segment> {
        self.links
            .iter()
            .flat_map(|(from, tos)| {
                tos.iter()
                    .filter(move |to| from < *to)
                    .map(move |to| Segment::new(*from, *to))
            })
            .collect_vec()
    }

    pub fn envelope(&self) -> Option<Envelope> {
        self.links
            .keys()
            .map(Envelope::from_point)
            .reduce(|acc, e| acc.union(&e))
    }
}
