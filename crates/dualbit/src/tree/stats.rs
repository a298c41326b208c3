use core::fmt;
use dualbit_stats::Sketch;

/// Latency sketches of a [DualFenwick](super::DualFenwick)
#[derive(Clone, Default)]
pub struct Stats {
    /// A sketch for recording latencies of building the tree
    pub build: Sketch,
    /// A sketch for recording latencies of point updates
    pub update: Sketch,
    /// A sketch for recording latencies of range queries
    pub query: Sketch,
}

impl fmt::Debug for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DualFenwick Stats")
            .field("build", &self.build.percentiles())
            .field("update", &self.update.percentiles())
            .field("query", &self.query.percentiles())
            .finish()
    }
}
