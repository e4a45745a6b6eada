use ai_core::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EnvQueryContext, EnvQueryItem, FloatParam, Generator, QueryEnv};

/// Square lattice of points around every location of a context.
///
/// With `k = trunc(radius / density)` steps on each side of the center, the point at row `r`,
/// column `c` (both in `-k..=k`) sits at `center + (c * density, r * density, 0)`. Rows (y) are
/// the outer loop, columns (x) the inner one, so every lattice is symmetric and stays inside
/// `[-radius, radius]`. A non-positive or non-finite radius or density collapses the lattice to
/// the center point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimpleGrid {
    /// Half extent of the square.
    pub radius: FloatParam,
    /// Spacing between neighbouring points.
    pub density: FloatParam,
    #[cfg_attr(feature = "serde", serde(default))]
    pub generate_around: EnvQueryContext,
}

impl SimpleGrid {
    /// Upper bound on `k`, i.e. `2 * MAX_HALF_STEPS + 1` points per axis.
    pub const MAX_HALF_STEPS: usize = 127;
    /// Upper bound on the items one call adds across all context locations. Contexts with more
    /// locations than this still get their center points.
    pub const MAX_ITEMS: usize = 65_536;

    pub fn new(
        radius: impl Into<FloatParam>,
        density: impl Into<FloatParam>,
        generate_around: EnvQueryContext,
    ) -> Self {
        Self {
            radius: radius.into(),
            density: density.into(),
            generate_around,
        }
    }

    fn half_steps(radius: f32, density: f32) -> usize {
        let degenerate =
            !(density > 0.0 && density.is_finite() && radius > 0.0 && radius.is_finite());
        if degenerate {
            return 0;
        }

        let steps = (radius / density).trunc();
        if steps > Self::MAX_HALF_STEPS as f32 {
            tracing::warn!(
                radius,
                density,
                cap = Self::MAX_HALF_STEPS,
                "grid too dense, clamping steps per side"
            );
            return Self::MAX_HALF_STEPS;
        }
        steps as usize
    }

    /// Largest `k` whose lattices around `centers` locations fit in [`Self::MAX_ITEMS`].
    fn half_steps_within_budget(centers: usize, steps: usize) -> usize {
        let per_axis = ((Self::MAX_ITEMS / centers.max(1)) as f64).sqrt() as usize;
        let budget = per_axis.saturating_sub(1) / 2;
        if steps > budget {
            tracing::warn!(
                centers,
                requested = steps,
                allowed = budget,
                cap = Self::MAX_ITEMS,
                "grid exceeds item budget, shrinking lattice"
            );
            return budget;
        }
        steps
    }
}

impl Generator for SimpleGrid {
    fn generate_items(&self, env: &QueryEnv<'_>, items: &mut Vec<EnvQueryItem>) {
        let radius = self.radius.resolve(env.params);
        let density = self.density.resolve(env.params);

        let centers = env.locations(&self.generate_around);
        if centers.is_empty() {
            tracing::debug!(context = %self.generate_around, "grid context resolved no locations");
            return;
        }

        let steps = Self::half_steps(radius, density);
        let steps = Self::half_steps_within_budget(centers.len(), steps);
        if steps == 0 {
            items.extend(centers.into_iter().map(EnvQueryItem::point));
            return;
        }

        let per_axis = 2 * steps + 1;
        items.reserve(centers.len() * per_axis * per_axis);

        let steps = steps as i32;
        for center in centers {
            for row in -steps..=steps {
                let dy = row as f32 * density;
                for col in -steps..=steps {
                    let dx = col as f32 * density;
                    items.push(EnvQueryItem::point(center + Vec3::new(dx, dy, 0.0)));
                }
            }
        }
    }

    fn describe(&self) -> String {
        format!(
            "SimpleGrid(radius: {:?}, density: {:?}) around {}",
            self.radius, self.density, self.generate_around
        )
    }
}
