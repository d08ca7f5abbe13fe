//! Deterministic fractal noise field used as the terrain height source.
//!
//! Composites several octaves of gradient noise (fractal Brownian motion)
//! and normalises the result by the geometric amplitude sum, so samples stay
//! within roughly `[-1, 1]` before the height multiplier is applied.

use noise::{NoiseFn, Perlin, Simplex};

/// Anything that maps a 2D world coordinate to a height sample.
///
/// Implementations must be pure: the same input always yields the same
/// output for the lifetime of the source.
pub trait HeightSource {
    /// Sample the field at world grid coordinate `(x, y)`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> HeightSource for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Base gradient noise algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoiseKind {
    /// Classic Perlin noise.
    #[default]
    Perlin,
    /// OpenSimplex-style simplex noise.
    Simplex,
}

/// Configuration for the fractal noise field.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Seed for deterministic generation.
    pub seed: u32,
    /// Base algorithm for every octave.
    pub kind: NoiseKind,
    /// Frequency of the first octave, in cycles per world grid unit.
    /// Default: 0.01.
    pub frequency: f64,
    /// Added to both world coordinates before the frequency is applied.
    /// Default: 1.0.
    pub offset: f64,
    /// Number of octaves to composite. Default: 3.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves. Default: 2.0.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves. Default: 0.5.
    pub persistence: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            kind: NoiseKind::Perlin,
            frequency: 0.01,
            offset: 1.0,
            octaves: 3,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

enum Generator {
    Perlin(Perlin),
    Simplex(Simplex),
}

impl Generator {
    fn get(&self, point: [f64; 2]) -> f64 {
        match self {
            Self::Perlin(n) => n.get(point),
            Self::Simplex(n) => n.get(point),
        }
    }
}

/// Fractal Brownian motion over a seeded gradient noise.
///
/// Immutable once built; every sample is a pure function of the parameters
/// and the input coordinate.
pub struct NoiseField {
    generator: Generator,
    params: NoiseParams,
    max_amplitude: f64,
}

impl NoiseField {
    /// Build a field from the given parameters.
    pub fn new(params: NoiseParams) -> Self {
        let generator = match params.kind {
            NoiseKind::Perlin => Generator::Perlin(Perlin::new(params.seed)),
            NoiseKind::Simplex => Generator::Simplex(Simplex::new(params.seed)),
        };
        let max_amplitude = amplitude_sum(params.octaves, params.persistence);
        Self {
            generator,
            params,
            max_amplitude,
        }
    }

    /// Raw fBm value before normalisation.
    fn fbm(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            total += self.generator.get([x * frequency, y * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// Sum of all octave amplitudes; zero when there are no octaves.
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }
}

impl HeightSource for NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        if self.max_amplitude == 0.0 {
            return 0.0;
        }
        let offset = self.params.offset;
        self.fbm(x + offset, y + offset) / self.max_amplitude
    }
}

fn amplitude_sum(octaves: u32, persistence: f64) -> f64 {
    let mut sum = 0.0;
    let mut amp = 1.0;
    for _ in 0..octaves {
        sum += amp;
        amp *= persistence;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_same_seed_same_sample() {
        let a = NoiseField::new(NoiseParams::default());
        let b = NoiseField::new(NoiseParams::default());
        for i in 0..50 {
            let x = i as f64 * 13.7 - 200.0;
            let y = i as f64 * -4.1 + 35.0;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(NoiseParams {
            seed: 1,
            ..Default::default()
        });
        let b = NoiseField::new(NoiseParams {
            seed: 999,
            ..Default::default()
        });
        let differs = (0..20).any(|i| {
            let x = 17.0 + i as f64 * 31.0;
            (a.sample(x, 42.0) - b.sample(x, 42.0)).abs() > EPSILON
        });
        assert!(differs, "different seeds should produce different fields");
    }

    #[test]
    fn test_samples_stay_near_unit_range() {
        for kind in [NoiseKind::Perlin, NoiseKind::Simplex] {
            let field = NoiseField::new(NoiseParams {
                kind,
                ..Default::default()
            });
            for x in (-50..50).map(|i| i as f64 * 7.3) {
                for y in (-50..50).map(|i| i as f64 * 5.9) {
                    let h = field.sample(x, y);
                    assert!(h.is_finite());
                    assert!(h.abs() <= 1.5, "{kind:?} sample {h} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_offset_shifts_input() {
        let shifted = NoiseField::new(NoiseParams {
            offset: 25.0,
            ..Default::default()
        });
        let plain = NoiseField::new(NoiseParams {
            offset: 0.0,
            ..Default::default()
        });
        for i in 0..20 {
            let x = i as f64 * 3.3;
            let y = i as f64 * 1.7;
            assert_eq!(
                shifted.sample(x, y).to_bits(),
                plain.sample(x + 25.0, y + 25.0).to_bits()
            );
        }
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let field = NoiseField::new(NoiseParams {
            octaves: 0,
            ..Default::default()
        });
        assert_eq!(field.max_amplitude(), 0.0);
        assert_eq!(field.sample(12.0, 34.0), 0.0);
    }

    #[test]
    fn test_amplitude_sum() {
        let field = NoiseField::new(NoiseParams {
            octaves: 4,
            persistence: 0.5,
            ..Default::default()
        });
        assert!((field.max_amplitude() - 1.875).abs() < EPSILON);
    }

    #[test]
    fn test_closure_is_height_source() {
        let ramp = |x: f64, y: f64| x + 2.0 * y;
        assert_eq!(ramp.sample(1.0, 2.0), 5.0);
    }
}
