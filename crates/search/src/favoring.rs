//! Per-destination multiplicative cost modifiers.
//!
//! A favoring table maps positions to coefficients that scale edge
//! costs. Composition is multiplicative on purpose: penalties then
//! grow with path length, so avoiding a hazard stays worthwhile on
//! long routes where a fixed additive penalty would wash out.

use std::collections::HashMap;
use voxelnav_core::BlockPos;

/// Coefficient applied to every position of the previous path so the
/// new search prefers fresh ground over retracing.
pub const BACKTRACK_PENALTY: f64 = 1.05;

/// Sparse map from position to a positive cost coefficient.
///
/// Positions absent from the table cost their base amount (1.0).
#[derive(Debug, Default, Clone)]
pub struct Favoring {
    coeffs: HashMap<BlockPos, f64>,
}

impl Favoring {
    /// An empty table (all coefficients 1.0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Coefficient at `pos`.
    pub fn get(&self, pos: BlockPos) -> f64 {
        self.coeffs.get(&pos).copied().unwrap_or(1.0)
    }

    /// Multiply the coefficient at `pos` by `coef`.
    pub fn apply(&mut self, pos: BlockPos, coef: f64) {
        debug_assert!(coef >= 0.0 && coef.is_finite());
        let slot = self.coeffs.entry(pos).or_insert(1.0);
        *slot *= coef;
    }

    /// Penalize every position of the previous path.
    pub fn add_backtrack_penalty(&mut self, previous_path: &[BlockPos]) {
        for pos in previous_path {
            self.apply(*pos, BACKTRACK_PENALTY);
        }
    }

    /// Penalize the sphere around a hazard with a linear falloff:
    /// full `coef` at the center, decaying to 1.0 at `radius`.
    pub fn add_hazard(&mut self, center: BlockPos, coef: f64, radius: f64) {
        self.add_hazard_impl(center, coef, radius, false);
    }

    /// Like [`Favoring::add_hazard`] but with the falloff computed on
    /// horizontal distance only, penalizing a vertical slab of
    /// `±radius` around the hazard (useful for ranged threats that
    /// can shoot up or down).
    pub fn add_hazard_column(&mut self, center: BlockPos, coef: f64, radius: f64) {
        self.add_hazard_impl(center, coef, radius, true);
    }

    fn add_hazard_impl(&mut self, center: BlockPos, coef: f64, radius: f64, cylindrical: bool) {
        if !(radius > 0.0) || !coef.is_finite() {
            return;
        }
        let r = radius.ceil() as i32;
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    let pos = center.offset(dx, dy, dz);
                    let dist = if cylindrical {
                        ((dx * dx + dz * dz) as f64).sqrt()
                    } else {
                        ((dx * dx + dy * dy + dz * dz) as f64).sqrt()
                    };
                    if dist > radius {
                        continue;
                    }
                    let falloff = 1.0 + (coef - 1.0) * (1.0 - dist / radius);
                    self.apply(pos, falloff);
                }
            }
        }
    }

    /// Number of positions with a non-default coefficient.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Whether every position has the default coefficient.
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_coefficient_is_one() {
        let favoring = Favoring::new();
        assert_eq!(favoring.get(BlockPos::new(3, 64, 3)), 1.0);
    }

    #[test]
    fn composition_is_multiplicative() {
        let mut favoring = Favoring::new();
        let pos = BlockPos::new(1, 64, 1);
        favoring.apply(pos, 2.0);
        favoring.apply(pos, BACKTRACK_PENALTY);
        assert!((favoring.get(pos) - 2.0 * 1.05).abs() < 1e-12);
    }

    #[test]
    fn backtrack_penalty_scales_existing_coefficient() {
        let mut favoring = Favoring::new();
        let pos = BlockPos::new(0, 64, 0);
        favoring.apply(pos, 3.0);
        favoring.add_backtrack_penalty(&[pos]);
        assert!((favoring.get(pos) - 3.0 * BACKTRACK_PENALTY).abs() < 1e-12);
    }

    #[test]
    fn hazard_falloff_decays_to_one_at_radius() {
        let mut favoring = Favoring::new();
        let center = BlockPos::new(0, 64, 0);
        favoring.add_hazard(center, 5.0, 4.0);
        let at_center = favoring.get(center);
        let near = favoring.get(center.offset(1, 0, 0));
        let outside = favoring.get(center.offset(5, 0, 0));
        assert!((at_center - 5.0).abs() < 1e-12);
        assert!(near < at_center && near > 1.0);
        assert_eq!(outside, 1.0);
    }

    #[test]
    fn column_hazard_ignores_y() {
        let mut favoring = Favoring::new();
        let center = BlockPos::new(0, 64, 0);
        favoring.add_hazard_column(center, 3.0, 2.0);
        assert_eq!(
            favoring.get(center.offset(0, 2, 0)),
            favoring.get(center)
        );
    }
}
