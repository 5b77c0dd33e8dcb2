use crate::config::{TARGET_HUE_RANGE, TARGET_SAT_RANGE};
use crate::gameplay::color::ColorSample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of per-round target colors.
pub struct TargetGenerator<R: Rng = StdRng> {
    rng: R,
}

impl TargetGenerator<StdRng> {
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TargetGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self) -> ColorSample {
        let hue = self.rng.random_range(TARGET_HUE_RANGE);
        let saturation = self.rng.random_range(TARGET_SAT_RANGE);
        ColorSample::new(hue as f64, saturation as f64)
    }
}
