//! Provides [`SpatialSort`]; a one-dimensional proximity index over 3D points.
//!
//! Every point is projected onto a fixed reference plane normal and the points
//! are sorted by their signed distance to a plane through the centroid.
//! Proximity queries then become a binary search for the start of the distance
//! window followed by a short linear scan, instead of testing all pairs.
//! This is a good trade for one-shot preprocessing passes where every point is
//! queried a handful of times.

use alloc::{vec, vec::Vec};
use core::cmp::Ordering;

use tracing::trace;

use crate::math::{Vec3, fabsf};

/// Tolerance assumed for incoming positions, which may already have been
/// transformed with imprecise instructions.
const TOLERANCE_ULPS: i32 = 4;

/// The plane distance is a dot product: one multiplication and one addition per
/// component on top of the input error.
const DISTANCE_TOLERANCE_ULPS: i32 = TOLERANCE_ULPS + 2;

/// The 3D comparison adds one further subtraction.
const DISTANCE_3D_TOLERANCE_ULPS: u32 = (DISTANCE_TOLERANCE_ULPS + 1) as u32;

/// Drift of the plane distance, in ULPs of the largest coordinate magnitude,
/// between two positions within [`DISTANCE_3D_TOLERANCE_ULPS`] of each other
/// per axis, including the roundoff of both distance computations.
const PLANE_DRIFT_ULPS: f32 = 32.;

/// Proximity index over a set of 3D points.
///
/// A [`SpatialSort`] is constructed from a point set (optionally appended to in
/// several batches), [finished](SpatialSort::finish) once, and then queried any
/// number of times.
/// Once finished it is read-only, so a shared reference can be queried from
/// several threads at once.
///
/// # Panics
///
/// Querying before [`finish`](SpatialSort::finish), or appending afterwards, is
/// a programming error and panics.
#[derive(Clone, Debug)]
pub struct SpatialSort {
    plane_normal: Vec3,
    centroid: Vec3,
    entries: Vec<Entry>,
    finished: bool,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    /// Index of the point in the order it was supplied.
    index: u32,
    position: Vec3,
    /// Signed distance to the reference plane. Only valid once finished.
    distance: f32,
}

impl Default for SpatialSort {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl SpatialSort {
    /// Unit normal of the reference plane: `normalize(0.8523, 0.34321, 0.5736)`.
    ///
    /// The direction is arbitrary but deliberately not axis-aligned, so that it
    /// is unlikely to coincide with the principal axes of real geometry.
    pub const PLANE_NORMAL: [f32; 3] = [0.786_867_8, 0.316_861_33, 0.529_563_96];

    /// Builds a finished index over `points`.
    ///
    /// An empty point set is legal and produces an empty index.
    pub fn new(points: &[[f32; 3]]) -> Self {
        let mut this = Self::unfinished();
        this.append(points, true);
        this
    }

    /// Creates an empty index that still accepts points through
    /// [`append`](SpatialSort::append).
    pub fn unfinished() -> Self {
        Self {
            plane_normal: Self::PLANE_NORMAL.into(),
            centroid: Vec3::ZERO,
            entries: Vec::new(),
            finished: false,
        }
    }

    /// Discards all points and refills the index with `points`.
    pub fn fill(&mut self, points: &[[f32; 3]], finish: bool) {
        self.entries.clear();
        self.finished = false;
        self.append(points, finish);
    }

    /// Adds `points` to the index, numbering them after the points already
    /// present.
    /// Pass `finish = true` on the last batch, or call
    /// [`finish`](SpatialSort::finish) afterwards.
    ///
    /// # Panics
    ///
    /// Panics if the index has already been finished, or if the total number
    /// of points exceeds [`u32::MAX`].
    pub fn append(&mut self, points: &[[f32; 3]], finish: bool) {
        self.extend_entries(points.iter().copied());

        if finish {
            self.finish();
        }
    }

    fn extend_entries(&mut self, points: impl ExactSizeIterator<Item = [f32; 3]>) {
        assert!(
            !self.finished,
            "positions cannot be added to a SpatialSort after it has been finished"
        );

        let initial = self.entries.len();
        assert!(
            initial + points.len() <= u32::MAX as usize,
            "a SpatialSort holds at most u32::MAX positions"
        );

        self.entries.reserve(points.len());
        self.entries
            .extend(points.enumerate().map(|(offset, position)| Entry {
                index: (initial + offset) as u32,
                position: position.into(),
                distance: f32::MAX,
            }));
    }

    /// Computes the centroid and every entry's plane distance, then sorts the
    /// entries ascending by distance.
    ///
    /// Calling this again recomputes everything from the current entries.
    pub fn finish(&mut self) {
        // non-finite positions are left out of the centroid, they would poison
        // every distance
        let finite = self.entries.iter().filter(|entry| entry.position.is_finite());
        let count = finite.clone().count();
        self.centroid = if count == 0 {
            Vec3::ZERO
        } else {
            let scale = 1.0 / count as f32;
            finite.fold(Vec3::ZERO, |centroid, entry| centroid + scale * entry.position)
        };

        let (centroid, plane_normal) = (self.centroid, self.plane_normal);
        for entry in &mut self.entries {
            entry.distance = plane_distance(entry.position, centroid, plane_normal);
        }

        self.entries.sort_by(compare_distance);
        #[cfg(mesh_ntb_more_assertions)]
        debug_assert!(
            self.entries
                .is_sorted_by(|a, b| compare_distance(a, b) != Ordering::Greater)
        );

        self.finished = true;

        trace!(entries = self.entries.len(), "spatial sort finished");
    }

    /// Returns `true` once [`finish`](SpatialSort::finish) has been called.
    #[inline]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the number of indexed points.
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no points are indexed.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the mean of all indexed positions, as computed by the last
    /// [`finish`](SpatialSort::finish).
    #[inline]
    pub fn centroid(&self) -> [f32; 3] {
        self.centroid.into()
    }

    /// Returns the sorted plane distances, ascending.
    pub fn distances(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.assert_finished("distances");
        self.entries.iter().map(|entry| entry.distance)
    }

    /// Writes the index of every point within `radius` of `position` into
    /// `results`, replacing its previous contents.
    ///
    /// Results are ordered by plane distance, not by proximity to `position`.
    ///
    /// # Panics
    ///
    /// Panics if the index has not been finished.
    pub fn find_positions(&self, position: [f32; 3], radius: f32, results: &mut Vec<u32>) {
        self.assert_finished("find_positions");
        results.clear();

        let position = Vec3::from(position);
        let distance = self.distance_to_plane(position);
        // the exact 3D test below decides, the window only has to contain
        // every candidate despite roundoff in the plane distances
        let window = radius + self.plane_drift(position);
        let (min_distance, max_distance) = (distance - window, distance + window);

        // quick check for positions outside the range
        let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) else {
            return;
        };
        if max_distance < first.distance || min_distance > last.distance {
            return;
        }

        let start = self.search_start(|entry| entry.distance < min_distance);

        let radius_squared = radius * radius;
        results.extend(
            self.entries[start..]
                .iter()
                .take_while(|entry| entry.distance <= max_distance)
                .filter(|entry| (entry.position - position).length_squared() <= radius_squared)
                .map(|entry| entry.index),
        );
    }

    /// Writes the index of every point whose position is identical to
    /// `position`, allowing for floating point roundoff, into `results`.
    ///
    /// Epsilons have constant precision while floats have logarithmic precision,
    /// so a fixed epsilon is either enormous near zero or negligible for large
    /// coordinates.
    /// This query instead tolerates a fixed number of units in the last place
    /// (ULPs), which scales with the magnitude of the coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the index has not been finished.
    pub fn find_identical_positions(&self, position: [f32; 3], results: &mut Vec<u32>) {
        self.assert_finished("find_identical_positions");
        results.clear();

        if self.entries.is_empty() {
            return;
        }

        let position = Vec3::from(position);
        let distance = self.distance_to_plane(position);
        let drift = self.plane_drift(position);
        let binary = to_binary(distance);
        let min_distance =
            to_binary(distance - drift).min(binary.saturating_sub(DISTANCE_TOLERANCE_ULPS));
        let max_distance =
            to_binary(distance + drift).max(binary.saturating_add(DISTANCE_TOLERANCE_ULPS));

        // integer comparisons of the bit patterns, NaN distances sort last
        let start = self.search_start(|entry| {
            !entry.distance.is_nan() && to_binary(entry.distance) < min_distance
        });

        results.extend(
            self.entries[start..]
                .iter()
                .take_while(|entry| {
                    !entry.distance.is_nan() && to_binary(entry.distance) <= max_distance
                })
                .filter(|entry| {
                    (0..3).all(|c| {
                        ulp_distance(entry.position[c], position[c]) <= DISTANCE_3D_TOLERANCE_ULPS
                    })
                })
                .map(|entry| entry.index),
        );
    }

    /// Assigns every point a cluster id such that points within `radius` of
    /// each other, walking the sorted sequence, share an id.
    ///
    /// A point starts a new cluster when it lies further than `radius` from
    /// the first member of the current cluster, either along the plane normal
    /// or in 3D.
    /// Returns the table, indexed by original point index, and the number of
    /// clusters.
    /// Ids are dense in `0..clusters`.
    ///
    /// # Panics
    ///
    /// Panics if the index has not been finished.
    pub fn generate_mapping_table(&self, radius: f32) -> (Vec<u32>, u32) {
        self.assert_finished("generate_mapping_table");

        let mut table = vec![u32::MAX; self.entries.len()];
        let radius_squared = radius * radius;

        let mut clusters = 0u32;
        let mut entries = self.entries.iter().peekable();
        while let Some(seed) = entries.next() {
            let max_distance = seed.distance + radius;
            table[seed.index as usize] = clusters;

            while let Some(entry) = entries.next_if(|entry| {
                entry.distance <= max_distance
                    && (entry.position - seed.position).length_squared() <= radius_squared
            }) {
                table[entry.index as usize] = clusters;
            }

            clusters += 1;
        }

        debug_assert!(table.iter().all(|&id| id < clusters));

        (table, clusters)
    }

    fn distance_to_plane(&self, position: Vec3) -> f32 {
        plane_distance(position, self.centroid, self.plane_normal)
    }

    /// Upper bound on the roundoff between the plane distances of `position`
    /// and of any position within the per-axis ULP tolerance of it.
    ///
    /// Plane distances are measured from the centroid and are usually far
    /// smaller than the coordinates themselves, so a tolerance in ULPs of the
    /// distance alone would reject positions that differ in the last bit.
    fn plane_drift(&self, position: Vec3) -> f32 {
        let magnitude = (0..3)
            .map(|c| fabsf(position[c]).max(fabsf(self.centroid[c])))
            .fold(0., f32::max);
        magnitude * f32::EPSILON * PLANE_DRIFT_ULPS
    }

    /// Finds the first entry for which `is_below` is `false`.
    ///
    /// The search starts in the middle and moves by a step that halves every
    /// iteration, then single-steps to the exact boundary.
    /// `is_below` must be monotonic over the sorted entries, and the entries
    /// must not be empty.
    fn search_start(&self, is_below: impl Fn(&Entry) -> bool) -> usize {
        let len = self.entries.len();
        debug_assert!(len > 0);

        let mut index = len / 2;
        let mut step = len / 4;
        while step > 1 {
            if is_below(&self.entries[index]) {
                index += step;
            } else {
                index -= step;
            }

            step /= 2;
        }

        // depending on the direction of the last step we need to single step a
        // bit back or forth to find the actual beginning of the range
        while index > 0 && !is_below(&self.entries[index]) {
            index -= 1;
        }
        while index < len - 1 && is_below(&self.entries[index]) {
            index += 1;
        }

        index
    }

    fn assert_finished(&self, operation: &str) {
        assert!(
            self.finished,
            "the SpatialSort must be finished before {operation} can be called"
        );
    }
}

impl FromIterator<[f32; 3]> for SpatialSort {
    /// Collects points into a finished index.
    fn from_iter<T: IntoIterator<Item = [f32; 3]>>(iter: T) -> Self {
        let points = iter.into_iter().collect::<Vec<_>>();
        Self::new(&points)
    }
}

fn plane_distance(position: Vec3, centroid: Vec3, plane_normal: Vec3) -> f32 {
    (position - centroid).dot(plane_normal)
}

/// Orders entries by plane distance.
/// Entries with a `NaN` distance (non-finite positions) are placed last so
/// range scans stop before reaching them.
fn compare_distance(a: &Entry, b: &Entry) -> Ordering {
    a.distance
        .is_nan()
        .cmp(&b.distance.is_nan())
        .then_with(|| a.distance.total_cmp(&b.distance))
}

/// Maps the sign-magnitude bit pattern of `value` onto a two's complement
/// integer, so that integer order matches float order and adjacent floats
/// differ by one.
/// Both zeros map to `0`.
fn to_binary(value: f32) -> i32 {
    let bits = value.to_bits() as i32;
    if bits < 0 {
        i32::MIN.wrapping_sub(bits)
    } else {
        bits
    }
}

/// Number of representable floats between `a` and `b`.
fn ulp_distance(a: f32, b: f32) -> u32 {
    to_binary(a).abs_diff(to_binary(b))
}
