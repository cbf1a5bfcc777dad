/// Looping animation clock, easing curves and rotation motions
use std::f32::consts::FRAC_PI_2;

use crate::error::{Error, Result};

/// Normalized progress through one loop of the animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    anim_amt: f32,
    period: f32,
}

impl AnimationState {
    /// Start a loop of `period` seconds at progress zero
    pub fn new(period: f32) -> Result<Self> {
        if !period.is_finite() || period <= 0.0 {
            return Err(Error::InvalidPeriod(period));
        }
        Ok(Self {
            anim_amt: 0.0,
            period,
        })
    }

    /// Same period, progress wrapped into `[0, 1)`
    pub fn with_amount(self, anim_amt: f32) -> Self {
        let mut anim_amt = anim_amt.rem_euclid(1.0);
        // rem_euclid rounds tiny negative inputs up to exactly 1.0
        if anim_amt >= 1.0 {
            anim_amt = 0.0;
        }
        Self { anim_amt, ..self }
    }

    pub fn anim_amt(&self) -> f32 {
        self.anim_amt
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Advance by `dt` seconds, wrapping modulo one loop.
    ///
    /// Steps longer than a period wrap as many times as needed.
    pub fn advance(self, dt: f32) -> Result<Self> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::NegativeTimeStep(dt));
        }
        if dt == 0.0 {
            return Ok(self);
        }
        Ok(self.with_amount(self.anim_amt + dt / self.period))
    }
}

/// Cubic smoothstep: zero slope at both ends, clamped to `[0, 1]`
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Remap `[start, end]` onto `[0, 1]`, clamping outside it
pub fn divide_interval(t: f32, start: f32, end: f32) -> f32 {
    if end <= start {
        return if t < start { 0.0 } else { 1.0 };
    }
    ((t - start) / (end - start)).clamp(0.0, 1.0)
}

/// How loop progress turns into a rotation angle
///
/// Every motion covers a quarter turn per loop; the cube maps onto itself
/// after a quarter turn so the loop is seamless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    /// Constant angular velocity
    #[default]
    Spin,
    /// Slow in, slow out
    EasedSpin,
    /// Two eased eighth turns, pausing on the face-on and corner-on views
    Staged,
}

impl Motion {
    pub fn rotation(&self, anim_amt: f32) -> f32 {
        match self {
            Motion::Spin => anim_amt * FRAC_PI_2,
            Motion::EasedSpin => ease_in_out(anim_amt) * FRAC_PI_2,
            Motion::Staged => {
                let first = ease_in_out(divide_interval(anim_amt, 0.0, 0.5));
                let second = ease_in_out(divide_interval(anim_amt, 0.5, 1.0));
                (first + second) * FRAC_PI_2 / 2.0
            }
        }
    }
}
