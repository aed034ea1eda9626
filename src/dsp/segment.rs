//! Envelope segments: time-parameterised value functions.

use crate::{INFINITE_STOP, SMALL};

/*
A Segment describes one leg of an envelope as a pure function of time. It
holds a start and stop time in nanoseconds and a start and stop value, and
its shape picks the curve connecting them:

  Constant      start_value for the whole leg
  Set           start_value until the stop time, then stop_value
  Linear        straight line from start_value to stop_value
  Exponential   geometric sweep from start_value to stop_value

A negative stop time means the leg never ends. Exponential sweeps cannot
leave zero, so a zero start value is nudged to SMALL before the ratio is
taken. Evaluation is pure: nothing here owns a clock or a buffer, so the
same segment can be asked for any time in any order.
*/

/// Curve shape of an envelope segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Constant,
    Set,
    Linear,
    Exponential,
}

/// One leg of an envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub shape: Shape,
    /// Leg start, nanoseconds.
    pub start_time: i64,
    /// Leg end, nanoseconds. Negative means the leg never ends.
    pub stop_time: i64,
    pub start_value: f64,
    pub stop_value: f64,
}

impl Segment {
    pub fn new(
        shape: Shape,
        start_time: i64,
        stop_time: i64,
        start_value: f64,
        stop_value: f64,
    ) -> Self {
        Self {
            shape,
            start_time,
            stop_time,
            start_value,
            stop_value,
        }
    }

    /// A value held forever.
    pub fn constant(value: f64) -> Self {
        Self::new(Shape::Constant, 0, INFINITE_STOP, value, value)
    }

    /// Jump to `value` at `at_ns`.
    pub fn set_value(value: f64, at_ns: i64) -> Self {
        Self::new(Shape::Set, 0, at_ns, 0.0, value)
    }

    /// Straight-line sweep between two values.
    pub fn linear_ramp(start_time: i64, stop_time: i64, start_value: f64, stop_value: f64) -> Self {
        Self::new(Shape::Linear, start_time, stop_time, start_value, stop_value)
    }

    /// Geometric sweep between two values.
    pub fn exponential_ramp(
        start_time: i64,
        stop_time: i64,
        start_value: f64,
        stop_value: f64,
    ) -> Self {
        Self::new(Shape::Exponential, start_time, stop_time, start_value, stop_value)
    }

    /// Whether this leg holds forever.
    pub fn is_infinite(&self) -> bool {
        self.stop_time < 0
    }

    /// Leg duration in nanoseconds, or 0 for an infinite leg.
    pub fn time_delta(&self) -> i64 {
        if self.is_infinite() {
            return 0;
        }
        self.stop_time - self.start_time
    }

    pub fn value_delta(&self) -> f64 {
        self.stop_value - self.start_value
    }

    /// Ratio between stop and start values, with a zero start nudged to
    /// SMALL so exponential sweeps stay defined.
    pub fn value_ratio(&self) -> f64 {
        let denom = if self.start_value == 0.0 {
            SMALL
        } else {
            self.start_value
        };
        self.stop_value / denom
    }

    /// Evaluate the leg at `t_ns`.
    pub fn value_at(&self, t_ns: i64) -> f64 {
        match self.shape {
            Shape::Constant => self.start_value,
            Shape::Set => {
                if self.is_infinite() || t_ns < self.stop_time {
                    self.start_value
                } else {
                    self.stop_value
                }
            }
            Shape::Linear => {
                let delta = self.time_delta();
                if self.is_infinite() || delta <= 0 {
                    return self.start_value;
                }
                if t_ns >= self.stop_time {
                    return self.stop_value;
                }
                self.start_value
                    + (t_ns - self.start_time) as f64 * self.value_delta() / delta as f64
            }
            Shape::Exponential => {
                let delta = self.time_delta();
                if self.is_infinite() || delta <= 0 {
                    return self.start_value;
                }
                if t_ns >= self.stop_time {
                    return self.stop_value;
                }
                let base = if self.start_value == 0.0 {
                    SMALL
                } else {
                    self.start_value
                };
                let exponent = (t_ns - self.start_time) as f64 / delta as f64;
                base * self.value_ratio().powf(exponent)
            }
        }
    }
}
