//! Per-stage and per-pass render timings

use std::fmt;
use std::time::{Duration, Instant};

use tracing::info;

use crate::bokeh::render::types::RenderMode;

/// Top-level stages of a render, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Validate,
    CocField,
    Decode,
    Blur,
    Encode,
}

impl RenderStage {
    pub fn name(self) -> &'static str {
        match self {
            RenderStage::Validate => "validate",
            RenderStage::CocField => "coc_field",
            RenderStage::Decode => "decode",
            RenderStage::Blur => "blur",
            RenderStage::Encode => "encode",
        }
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wall-clock time of one pass inside the blur stage, e.g. a single line blur
#[derive(Debug, Clone, PartialEq)]
pub struct PassTiming {
    pub label: String,
    pub duration: Duration,
}

impl PassTiming {
    /// Runs `f` and pairs its result with how long it took.
    pub fn measure<T>(label: impl Into<String>, f: impl FnOnce() -> T) -> (T, PassTiming) {
        let start = Instant::now();
        let value = f();
        let timing = PassTiming {
            label: label.into(),
            duration: start.elapsed(),
        };
        (value, timing)
    }
}

/// Timings of one render call
#[derive(Debug, Clone)]
pub struct RenderTimings {
    mode: RenderMode,
    pixels: usize,
    stages: Vec<(RenderStage, Duration)>,
    passes: Vec<PassTiming>,
}

impl RenderTimings {
    pub fn new(mode: RenderMode, pixels: usize) -> Self {
        Self {
            mode,
            pixels,
            stages: Vec::new(),
            passes: Vec::new(),
        }
    }

    /// Runs `f` and records its duration under `stage`.
    pub fn time<T>(&mut self, stage: RenderStage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.stages.push((stage, start.elapsed()));
        value
    }

    pub fn record_passes(&mut self, passes: impl IntoIterator<Item = PassTiming>) {
        self.passes.extend(passes);
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn stage(&self, stage: RenderStage) -> Option<Duration> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
    }

    pub fn stages(&self) -> &[(RenderStage, Duration)] {
        &self.stages
    }

    /// Blur passes in the order they ran. Empty when the blur was skipped.
    pub fn passes(&self) -> &[PassTiming] {
        &self.passes
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|(_, d)| *d).sum()
    }

    /// Stage throughput in megapixels per second, `None` if it did not run or
    /// finished below timer resolution.
    pub fn megapixels_per_second(&self, stage: RenderStage) -> Option<f64> {
        let secs = self.stage(stage)?.as_secs_f64();
        (secs > 0.0).then(|| self.pixels as f64 / 1e6 / secs)
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        info!(
            mode = ?self.mode,
            pixels = self.pixels,
            total_ms = total.as_secs_f64() * 1000.0,
            "Render timings"
        );
        for (stage, duration) in &self.stages {
            let share = if total.as_secs_f64() > 0.0 {
                duration.as_secs_f64() / total.as_secs_f64() * 100.0
            } else {
                0.0
            };
            info!(
                "{:<12} {:>10.3}ms ({:>5.1}%) {:>8.2} MP/s",
                stage.name(),
                duration.as_secs_f64() * 1000.0,
                share,
                self.megapixels_per_second(*stage).unwrap_or(0.0)
            );
        }
        for pass in &self.passes {
            info!(
                "  {:<18} {:>10.3}ms",
                pass.label,
                pass.duration.as_secs_f64() * 1000.0
            );
        }
    }
}
