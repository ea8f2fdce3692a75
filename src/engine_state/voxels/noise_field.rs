//! # Noise Field
//!
//! Deterministic fractal height noise used to shape the terrain surface.
//!
//! A height map is built by summing several octaves of 3D Perlin noise. Each octave
//! samples the field at a higher frequency (`lacunarity^k`) and contributes with a
//! smaller amplitude (`persistence^k`). Every octave is shifted by its own offset drawn
//! from an RNG seeded with the configured seed string, and the same seed also picks the
//! Perlin permutation table, so two configurations that differ only by seed produce
//! different terrain.
//!
//! ## Determinism
//!
//! [`generate_height_map`] is a pure function of its arguments: it owns its RNG and noise
//! source, so repeated calls with the same inputs yield bit-identical grids.

use std::hash::{Hash, Hasher};

use cgmath::Point2;
use noise::{NoiseFn, Perlin};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Smallest scale accepted by the sampler. Non-positive scales are clamped to this.
pub const MIN_NOISE_SCALE: f64 = 0.0001;

/// Half-width of the range the per-octave sample offsets are drawn from.
const OCTAVE_OFFSET_RANGE: f64 = 10_000.0;

/// A square grid of noise samples, indexed `grid[row][col]`.
///
/// `row` runs along world z and `col` along world x.
pub type HeightGrid = Vec<Vec<f64>>;

/// Parameters of the fractal height noise.
///
/// The values are plain data so the tuning layer can nudge them at runtime; a change is
/// only picked up by chunks generated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Seed string. Hashed into both the Perlin permutation and the octave offsets.
    pub seed: String,
    /// World units per noise period of the first octave. Larger is smoother.
    pub scale: f64,
    /// Vertical scale applied to the normalized height, in voxels.
    pub height: f64,
    /// Frequency multiplier applied to every sample coordinate.
    pub frequency: f64,
    /// Number of octaves summed together.
    pub octaves: u32,
    /// Amplitude falloff per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            seed: String::from("42"),
            scale: 75.0,
            height: 16.0,
            frequency: 1.0,
            octaves: 4,
            persistence: 0.1,
            lacunarity: 5.0,
        }
    }
}

impl NoiseConfig {
    /// Returns the seed string folded into a 64-bit value.
    pub fn seed_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        hasher.finish()
    }

    /// Returns the configured scale, clamped away from zero.
    pub fn effective_scale(&self) -> f64 {
        if self.scale <= 0.0 {
            MIN_NOISE_SCALE
        } else {
            self.scale
        }
    }

    /// Sum of the octave amplitudes, i.e. the largest magnitude a summed sample can reach.
    pub fn amplitude_sum(&self) -> f64 {
        let mut amplitude = 1.0;
        let mut sum = 0.0;
        for _ in 0..self.octaves {
            sum += amplitude;
            amplitude *= self.persistence;
        }
        sum
    }
}

/// Generates a `size × size` grid of heights in `[0, 1]`.
///
/// # Arguments
/// * `size` - Side length of the grid, in columns
/// * `config` - Noise parameters
/// * `world_offset` - World-space (x, z) center of the sampled square
/// * `normalize` - When `true`, heights are scaled against the theoretical amplitude
///   bound, which keeps neighbouring chunks consistent. When `false`, the observed
///   minimum and maximum of this grid are stretched to `[0, 1]`.
///
/// # Returns
/// The height grid, indexed `grid[row][col]` (row along z, col along x).
pub fn generate_height_map(
    size: usize,
    config: &NoiseConfig,
    world_offset: Point2<f64>,
    normalize: bool,
) -> HeightGrid {
    let scale = config.effective_scale();
    let seed = config.seed_hash();
    let perlin = Perlin::new(seed as u32);
    let mut rng = fastrand::Rng::with_seed(seed);

    let octave_offsets: Vec<Point2<f64>> = (0..config.octaves)
        .map(|_| {
            Point2::new(
                world_offset.x + (rng.f64() * 2.0 - 1.0) * OCTAVE_OFFSET_RANGE,
                world_offset.y + (rng.f64() * 2.0 - 1.0) * OCTAVE_OFFSET_RANGE,
            )
        })
        .collect();

    let half_size = size as f64 / 2.0;
    let mut grid = vec![vec![0.0; size]; size];
    let mut min_noise = f64::MAX;
    let mut max_noise = f64::MIN;

    for (row, grid_row) in grid.iter_mut().enumerate() {
        for (col, cell) in grid_row.iter_mut().enumerate() {
            let mut amplitude = 1.0;
            let mut octave_frequency = 1.0;
            let mut noise_height = 0.0;

            for offset in &octave_offsets {
                let sample_x = (col as f64 - half_size + offset.x) / scale * octave_frequency;
                let sample_z = (row as f64 - half_size + offset.y) / scale * octave_frequency;
                let sample_plane = octave_frequency / scale;
                let sample = perlin.get([
                    sample_x * config.frequency,
                    sample_z * config.frequency,
                    sample_plane * config.frequency,
                ]);

                noise_height += sample * amplitude;
                amplitude *= config.persistence;
                octave_frequency *= config.lacunarity;
            }

            min_noise = min_noise.min(noise_height);
            max_noise = max_noise.max(noise_height);
            *cell = noise_height;
        }
    }

    let amplitude_sum = config.amplitude_sum();
    for cell in grid.iter_mut().flatten() {
        *cell = if normalize {
            normalize_against_bound(*cell, amplitude_sum)
        } else {
            inverse_lerp(min_noise, max_noise, *cell)
        };
    }

    grid
}

fn normalize_against_bound(value: f64, bound: f64) -> f64 {
    if bound <= 0.0 {
        return 0.0;
    }
    ((value + bound) / (2.0 * bound)).clamp(0.0, 1.0)
}

/// Position of `value` between `low` and `high`, clamped to `[0, 1]`.
///
/// A degenerate range maps everything to 0.
pub fn inverse_lerp(low: f64, high: f64, value: f64) -> f64 {
    if high <= low {
        return 0.0;
    }
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}
