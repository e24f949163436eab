//! Foot lift curves.
//!
//! The vertical lift of a stepping foot is shaped by an authored curve
//! sampled over step progress `t ∈ [0, 1]`.  Authoring is out of scope; the
//! animator only needs something it can evaluate, hence the [`LiftCurve`]
//! trait.  [`KeyframeCurve`] evaluates configuration-supplied keys with cubic
//! Hermite segments, the same model engines use for animation curves.

use stride_types::CurveKey;

/// Anything that maps step progress to a lift factor.
pub trait LiftCurve {
    fn evaluate(&self, t: f32) -> f32;
}

impl<F: Fn(f32) -> f32> LiftCurve for F {
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Piecewise cubic Hermite curve.
///
/// Outside the key range the curve holds the first/last key value.  An empty
/// curve evaluates to zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyframeCurve {
    keys: Vec<CurveKey>,
}

impl KeyframeCurve {
    /// Build a curve from keys.  Keys are sorted by time.
    pub fn from_keys(keys: &[CurveKey]) -> Self {
        let mut keys = keys.to_vec();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Symmetric arc rising from 0 to 1 at `t = 0.5` and back to 0.
    pub fn arc() -> Self {
        Self::from_keys(&[
            CurveKey::new(0.0, 0.0, 0.0, 2.0),
            CurveKey::new(0.5, 1.0, 0.0, 0.0),
            CurveKey::new(1.0, 0.0, -2.0, 0.0),
        ])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }
}

impl LiftCurve for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        // First key strictly after `t`; guaranteed to exist and be > 0.
        let i = self.keys.partition_point(|k| k.time <= t);
        let k0 = &self.keys[i - 1];
        let k1 = &self.keys[i];

        let span = k1.time - k0.time;
        if span <= 0.0 {
            return k1.value;
        }
        let s = (t - k0.time) / span;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * k0.value + h10 * span * k0.out_tangent + h01 * k1.value + h11 * span * k1.in_tangent
    }
}
