use std::f32::consts::TAU;

use ai_core::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EnvQueryContext, EnvQueryItem, FloatParam, Generator, QueryEnv};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CirclePoints {
    /// Fixed number of points.
    Count(FloatParam),
    /// Arc length between neighbouring points; the count is rounded up.
    Spacing(FloatParam),
}

/// Points evenly spaced on a horizontal circle around every context location, counter-clockwise
/// starting at +X.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OnCircle {
    pub radius: FloatParam,
    pub points: CirclePoints,
    #[cfg_attr(feature = "serde", serde(default))]
    pub center: EnvQueryContext,
}

impl OnCircle {
    pub const MAX_POINTS: usize = 1024;

    pub fn new(
        radius: impl Into<FloatParam>,
        points: CirclePoints,
        center: EnvQueryContext,
    ) -> Self {
        Self {
            radius: radius.into(),
            points,
            center,
        }
    }

    fn point_count(&self, radius: f32, env: &QueryEnv<'_>) -> usize {
        let raw = match &self.points {
            CirclePoints::Count(count) => count.resolve(env.params).floor(),
            CirclePoints::Spacing(spacing) => {
                let spacing = spacing.resolve(env.params);
                if !(spacing > 0.0 && spacing.is_finite()) {
                    return 1;
                }
                (TAU * radius / spacing).ceil()
            }
        };

        if !raw.is_finite() || raw < 1.0 {
            return 1;
        }
        (raw as usize).min(Self::MAX_POINTS)
    }
}

impl Generator for OnCircle {
    fn generate_items(&self, env: &QueryEnv<'_>, items: &mut Vec<EnvQueryItem>) {
        let centers = env.locations(&self.center);
        if centers.is_empty() {
            tracing::debug!(context = %self.center, "circle context resolved no locations");
            return;
        }

        let radius = self.radius.resolve(env.params);
        if !(radius > 0.0 && radius.is_finite()) {
            items.extend(centers.into_iter().map(EnvQueryItem::point));
            return;
        }

        let count = self.point_count(radius, env);
        let step = TAU / count as f32;
        items.reserve(centers.len() * count);
        for center in centers {
            for i in 0..count {
                let angle = step * i as f32;
                let offset = Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0);
                items.push(EnvQueryItem::point(center + offset));
            }
        }
    }

    fn describe(&self) -> String {
        format!("OnCircle(radius: {:?}, {:?}) around {}", self.radius, self.points, self.center)
    }
}
