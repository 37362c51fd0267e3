// distance.rs - Edit distance and the pairwise distance matrix

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::Sequence;
use crate::error::{Error, Result};

/// Levenshtein distance with unit insert, delete and substitute costs.
///
/// Either input may be empty.
pub fn edit_distance(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Stable handle for a cluster in a [`DistanceMatrix`].
///
/// Handles are issued in creation order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub(crate) usize);

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Symmetric matrix of distances between labelled clusters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceMatrix {
    labels: BTreeMap<ClusterId, String>,
    /// Label to the oldest live handle carrying it
    by_label: HashMap<String, ClusterId>,
    distances: BTreeMap<ClusterId, BTreeMap<ClusterId, f64>>,
    next_id: usize,
}

impl DistanceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cluster with no distances yet and return its handle
    pub fn insert(&mut self, label: impl Into<String>) -> ClusterId {
        let id = ClusterId(self.next_id);
        self.next_id += 1;
        let label = label.into();
        self.by_label.entry(label.clone()).or_insert(id);
        self.labels.insert(id, label);
        self.distances.insert(id, BTreeMap::new());
        id
    }

    /// Set `d(a, b)` and `d(b, a)`.
    ///
    /// Distances must be finite and non-negative.
    pub fn set(&mut self, a: ClusterId, b: ClusterId, distance: f64) -> Result<()> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(Error::invalid(format!(
                "distance between {} and {} must be finite and non-negative, got {}",
                a, b, distance
            )));
        }
        if a == b {
            return Err(Error::invalid(format!("cannot set a distance from {} to itself", a)));
        }
        for id in [a, b] {
            if !self.labels.contains_key(&id) {
                return Err(Error::invalid(format!("unknown cluster {}", id)));
            }
        }
        self.distances.entry(a).or_default().insert(b, distance);
        self.distances.entry(b).or_default().insert(a, distance);
        Ok(())
    }

    /// `d(a, b)`; zero on the diagonal, `None` for an unknown or unset pair
    pub fn get(&self, a: ClusterId, b: ClusterId) -> Option<f64> {
        if a == b {
            return self.labels.contains_key(&a).then_some(0.0);
        }
        self.distances.get(&a)?.get(&b).copied()
    }

    pub fn get_by_label(&self, a: &str, b: &str) -> Option<f64> {
        self.get(self.id_of(a)?, self.id_of(b)?)
    }

    /// Remove a cluster and every distance involving it, returning its label
    pub fn remove(&mut self, id: ClusterId) -> Option<String> {
        let label = self.labels.remove(&id)?;
        if self.by_label.get(&label) == Some(&id) {
            self.by_label.remove(&label);
            if let Some((&other, _)) = self.labels.iter().find(|(_, l)| **l == label) {
                self.by_label.insert(label.clone(), other);
            }
        }
        if let Some(row) = self.distances.remove(&id) {
            for other in row.keys() {
                if let Some(other_row) = self.distances.get_mut(other) {
                    other_row.remove(&id);
                }
            }
        }
        Some(label)
    }

    pub fn label(&self, id: ClusterId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, label: &str) -> Option<ClusterId> {
        self.by_label.get(label).copied()
    }

    /// Live handles in creation order
    pub fn ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.labels.keys().copied()
    }

    /// Live labels in creation order
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Every stored pair agrees in both directions
    pub fn is_symmetric(&self) -> bool {
        self.distances.iter().all(|(a, row)| {
            row.iter()
                .all(|(b, d)| self.distances.get(b).and_then(|r| r.get(a)) == Some(d))
        })
    }

    /// Pair with the smallest distance.
    ///
    /// Ties go to the smallest `(a, b)` in handle order with `a < b`.
    /// Fails if any pair of live clusters has no distance.
    pub fn closest_pair(&self) -> Result<Option<(ClusterId, ClusterId, f64)>> {
        let ids: Vec<ClusterId> = self.ids().collect();
        let mut best: Option<(ClusterId, ClusterId, f64)> = None;

        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let distance = self.get(a, b).ok_or_else(|| {
                    Error::invalid(format!(
                        "missing distance between '{}' and '{}'",
                        self.label(a).unwrap_or_default(),
                        self.label(b).unwrap_or_default()
                    ))
                })?;
                if best.map_or(true, |(_, _, d)| distance < d) {
                    best = Some((a, b, distance));
                }
            }
        }

        Ok(best)
    }

    /// Build from explicit `(label, label, distance)` triples.
    ///
    /// Labels get handles in order of first appearance.
    pub fn from_pairs(pairs: &[(&str, &str, f64)]) -> Result<Self> {
        let mut matrix = Self::new();
        for &(a, b, distance) in pairs {
            let a = match matrix.id_of(a) {
                Some(id) => id,
                None => matrix.insert(a),
            };
            let b = match matrix.id_of(b) {
                Some(id) => id,
                None => matrix.insert(b),
            };
            matrix.set(a, b, distance)?;
        }
        Ok(matrix)
    }

    /// Pairwise edit distances between all sequences
    pub fn from_sequences(sequences: &[Sequence]) -> Result<Self> {
        Self::from_sequences_with_progress(sequences, false)
    }

    /// Pairwise edit distances computed in parallel, optionally with a progress bar
    pub fn from_sequences_with_progress(sequences: &[Sequence], show_progress: bool) -> Result<Self> {
        let n = sequences.len();
        if n < 2 {
            return Err(Error::invalid(format!(
                "need at least 2 sequences for a distance matrix, got {}",
                n
            )));
        }

        let mut matrix = Self::new();
        let mut ids = Vec::with_capacity(n);
        for sequence in sequences {
            if matrix.id_of(&sequence.id).is_some() {
                return Err(Error::invalid(format!(
                    "duplicate sequence label '{}'",
                    sequence.id
                )));
            }
            ids.push(matrix.insert(sequence.id.clone()));
        }

        let start = Instant::now();
        let total_comparisons = n * (n - 1) / 2;
        info!(sequences = n, comparisons = total_comparisons, "computing distance matrix");

        let pb = if show_progress {
            ProgressBar::new(total_comparisons as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }

        let update_interval = std::cmp::max(1, total_comparisons / 100);
        let progress_counter = AtomicUsize::new(0);

        let upper_triangle: Vec<(usize, usize, usize)> = (0..n)
            .into_par_iter()
            .flat_map(|i| {
                let progress = &progress_counter;
                let pb = &pb;
                (i + 1..n).into_par_iter().map(move |j| {
                    let distance = edit_distance(&sequences[i].sequence, &sequences[j].sequence);
                    let count = progress.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % update_interval == 0 {
                        pb.set_position(count as u64);
                    }
                    (i, j, distance)
                })
            })
            .collect();

        pb.finish_and_clear();

        for (i, j, distance) in upper_triangle {
            matrix.set(ids[i], ids[j], distance as f64)?;
        }

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "distance matrix complete"
        );
        Ok(matrix)
    }

    /// Dense rows in handle order, for output writers
    pub fn to_rows(&self) -> Vec<(String, Vec<Option<f64>>)> {
        let ids: Vec<ClusterId> = self.ids().collect();
        ids.iter()
            .map(|&a| {
                let row = ids.iter().map(|&b| self.get(a, b)).collect();
                (self.labels[&a].clone(), row)
            })
            .collect()
    }
}
