//! # Chunk Cache
//!
//! Remembers the voxels generated for each chunk coordinate, plus the voxels the player
//! has removed since, so revisiting a chunk reproduces it without running the noise
//! again and without undoing edits.
//!
//! The cache is bounded and least-recently-used: touching an entry (through `get`,
//! `insert` or `record_removal`) marks it fresh, and inserting past capacity evicts the
//! stalest entry together with its removal log.

use std::num::NonZeroUsize;

use cgmath::Point3;
use lru::LruCache;

use super::chunk::{Chunk, ChunkCoord};

/// Fewest entries a cache may hold: the player's chunk and its eight neighbours.
pub const MIN_CACHE_CAPACITY: usize = 9;

/// Default number of cached chunks.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// What the cache remembers about one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkCacheEntry {
    /// Coordinate of the chunk
    pub coord: ChunkCoord,
    /// Columns per side
    pub size: i32,
    /// Voxels as originally generated
    pub voxels: Vec<Point3<i32>>,
    /// Voxels removed since generation, in removal order
    pub removed: Vec<Point3<i32>>,
}

impl ChunkCacheEntry {
    /// Rebuilds the chunk, skipping every removed voxel.
    pub fn to_chunk(&self) -> Chunk {
        Chunk::without(self.coord, self.size, &self.voxels, &self.removed)
    }
}

/// Bounded LRU map from chunk coordinate to its cache entry.
pub struct ChunkCache {
    entries: LruCache<ChunkCoord, ChunkCacheEntry>,
}

impl ChunkCache {
    /// Creates a cache holding at most `capacity` chunks, raised to [`MIN_CACHE_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(MIN_CACHE_CAPACITY)).unwrap_or(NonZeroUsize::MIN);
        ChunkCache {
            entries: LruCache::new(capacity),
        }
    }

    /// Returns the entry for `coord`, marking it most recently used.
    pub fn get(&mut self, coord: ChunkCoord) -> Option<&ChunkCacheEntry> {
        self.entries.get(&coord)
    }

    /// Returns the entry for `coord` without touching its recency.
    pub fn peek(&self, coord: ChunkCoord) -> Option<&ChunkCacheEntry> {
        self.entries.peek(&coord)
    }

    /// Whether an entry exists for `coord`.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.entries.contains(&coord)
    }

    /// Inserts `entry`, replacing any entry for the same coordinate.
    ///
    /// # Returns
    /// The coordinate of the evicted chunk, if inserting pushed one out.
    pub fn insert(&mut self, entry: ChunkCacheEntry) -> Option<ChunkCoord> {
        let coord = entry.coord;
        match self.entries.push(coord, entry) {
            Some((evicted, old)) if evicted != coord => {
                log::debug!(
                    "Evicted chunk {:?} from cache ({} removals discarded)",
                    evicted,
                    old.removed.len()
                );
                Some(evicted)
            }
            _ => None,
        }
    }

    /// Inserts a freshly generated chunk with an empty removal log.
    pub fn insert_generated(&mut self, chunk: &Chunk) -> Option<ChunkCoord> {
        self.insert(ChunkCacheEntry {
            coord: chunk.coord(),
            size: chunk.size(),
            voxels: chunk.voxels().to_vec(),
            removed: Vec::new(),
        })
    }

    /// Appends `position` to the removal log of `coord`.
    ///
    /// # Returns
    /// `false` if the chunk has no entry, in which case nothing is recorded.
    pub fn record_removal(&mut self, coord: ChunkCoord, position: Point3<i32>) -> bool {
        match self.entries.get_mut(&coord) {
            Some(entry) => {
                if !entry.removed.contains(&position) {
                    entry.removed.push(position);
                }
                true
            }
            None => false,
        }
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached chunks.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for ChunkCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;

    fn entry(x: i32, z: i32) -> ChunkCacheEntry {
        ChunkCacheEntry {
            coord: Point2::new(x, z),
            size: 4,
            voxels: vec![Point3::new(x * 4, 1, z * 4), Point3::new(x * 4 + 1, 2, z * 4)],
            removed: Vec::new(),
        }
    }

    #[test]
    fn capacity_is_raised_to_the_minimum() {
        assert_eq!(ChunkCache::new(1).capacity(), MIN_CACHE_CAPACITY);
        assert_eq!(ChunkCache::default().capacity(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = ChunkCache::new(MIN_CACHE_CAPACITY);
        for x in 0..MIN_CACHE_CAPACITY as i32 {
            assert_eq!(cache.insert(entry(x, 0)), None);
        }
        // Touch the oldest so the second oldest becomes the eviction candidate.
        assert!(cache.get(Point2::new(0, 0)).is_some());
        assert_eq!(cache.insert(entry(100, 0)), Some(Point2::new(1, 0)));
        assert!(cache.contains(Point2::new(0, 0)));
        assert!(!cache.contains(Point2::new(1, 0)));
        assert_eq!(cache.len(), MIN_CACHE_CAPACITY);
    }

    #[test]
    fn reinserting_a_coordinate_is_not_an_eviction() {
        let mut cache = ChunkCache::default();
        cache.insert(entry(3, 3));
        assert_eq!(cache.insert(entry(3, 3)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn removals_are_logged_once_and_skipped_on_rebuild() {
        let mut cache = ChunkCache::default();
        let coord = Point2::new(2, -1);
        cache.insert(entry(2, -1));
        let removed = Point3::new(8, 1, -4);

        assert!(cache.record_removal(coord, removed));
        assert!(cache.record_removal(coord, removed));
        assert!(!cache.record_removal(Point2::new(9, 9), removed));

        let stored = cache.peek(coord).expect("entry exists");
        assert_eq!(stored.removed, vec![removed]);
        let chunk = stored.to_chunk();
        assert_eq!(chunk.voxels(), &[Point3::new(9, 2, -4)]);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = ChunkCache::default();
        cache.insert(entry(0, 0));
        cache.clear();
        assert!(cache.is_empty());
    }
}
