//! Latency sketches for profiling dualbit trees.
//!
//! Enabled through the `profiler` feature of the `dualbit` crate. Each [Sketch] keeps a
//! [DDSketch] of nanosecond latencies recorded by a [Measure] drop guard, usually created
//! through [profile_scope].

use core::cell::RefCell;
use minstant::Instant;
use sketches_ddsketch::{Config, DDSketch};
use std::rc::Rc;

/// Records the latency of the enclosing scope into the given [Sketch].
///
/// ```
/// let sketch = dualbit_stats::Sketch::default();
/// {
///     dualbit_stats::profile_scope!(&sketch);
/// }
/// assert_eq!(sketch.count(), 1);
/// ```
#[macro_export]
macro_rules! profile_scope {
    ($sketch:expr) => {
        let _measure = $crate::Measure::new($sketch);
    };
}

fn quantile(sketch: &DDSketch, q: f64) -> f64 {
    sketch.quantile(q).ok().flatten().unwrap_or(0.0)
}

/// Summarizes a [DDSketch] into a fixed set of percentiles
pub fn sketch_percentiles(sketch: &DDSketch) -> Percentiles {
    Percentiles {
        count: sketch.count(),
        min: sketch.min().unwrap_or(0.0),
        p50: quantile(sketch, 0.5),
        p99: quantile(sketch, 0.99),
        p99_9: quantile(sketch, 0.999),
        max: sketch.max().unwrap_or(0.0),
    }
}

/// Latency percentiles in nanoseconds
#[derive(Default, Clone, Copy)]
pub struct Percentiles {
    /// Number of recorded samples
    pub count: usize,
    /// Smallest recorded sample
    pub min: f64,
    /// Median
    pub p50: f64,
    /// 99th percentile
    pub p99: f64,
    /// 99.9th percentile
    pub p99_9: f64,
    /// Largest recorded sample
    pub max: f64,
}

impl std::fmt::Debug for Percentiles {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Percentiles")
            .field("count", &self.count)
            .field("min", &format_args!("{:.2}ns", self.min))
            .field("p50", &format_args!("{:.2}ns", self.p50))
            .field("p99", &format_args!("{:.2}ns", self.p99))
            .field("p99.9", &format_args!("{:.2}ns", self.p99_9))
            .field("max", &format_args!("{:.2}ns", self.max))
            .finish()
    }
}

/// A cheaply cloneable handle to a shared latency sketch
#[derive(Clone)]
pub struct Sketch {
    inner: Rc<RefCell<DDSketch>>,
}

impl Default for Sketch {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DDSketch::new(Config::new(0.01, 2048, 1.0e-9)))),
        }
    }
}

impl Sketch {
    /// Records a single sample
    #[inline]
    pub fn add(&self, data: f64) {
        self.inner.borrow_mut().add(data)
    }
    /// Returns the number of recorded samples
    pub fn count(&self) -> usize {
        self.inner.borrow().count()
    }
    /// Returns the current percentiles of the sketch
    pub fn percentiles(&self) -> Percentiles {
        sketch_percentiles(&self.inner.borrow())
    }
}

impl std::fmt::Debug for Sketch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.percentiles().fmt(f)
    }
}

/// Drop guard that records the time between its creation and drop
pub struct Measure {
    start: Instant,
    sketch: Sketch,
}

impl Measure {
    /// Starts a new measurement against `sketch`
    #[inline]
    pub fn new(sketch: &Sketch) -> Measure {
        Measure {
            sketch: sketch.clone(),
            start: Instant::now(),
        }
    }
}

impl Drop for Measure {
    #[inline]
    fn drop(&mut self) {
        self.sketch.add(self.start.elapsed().as_nanos() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_on_drop() {
        let sketch = Sketch::default();
        for _ in 0..10 {
            profile_scope!(&sketch);
        }
        assert_eq!(sketch.count(), 10);
        assert_eq!(sketch.percentiles().count, 10);
    }

    #[test]
    fn clones_share_samples() {
        let sketch = Sketch::default();
        let other = sketch.clone();
        other.add(42.0);
        assert_eq!(sketch.count(), 1);
        assert!(sketch.percentiles().max >= 41.0);
    }

    #[test]
    fn empty_sketch_percentiles() {
        let p = Sketch::default().percentiles();
        assert_eq!(p.count, 0);
        assert_eq!(p.p50, 0.0);
    }
}
