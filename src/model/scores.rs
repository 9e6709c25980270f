use std::collections::BTreeMap;

/// Scores derived for one entry. Only `unified` is meant for ranking; the
/// rest are intermediate and may be 0 when no qualifying data exists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedScore {
    pub raw_weighted_total: f64,
    pub capability: f64,
    pub cost_efficiency: f64,
    pub unified: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut out: Option<Bounds> = None;
        for v in values {
            out = Some(match out {
                None => Bounds { min: v, max: v },
                Some(b) => Bounds {
                    min: b.min.min(v),
                    max: b.max.max(v),
                },
            });
        }
        out
    }

    /// Linear rescale onto 0..=100. Degenerate bounds pass the value through.
    pub fn rescale(&self, value: f64) -> f64 {
        if self.max > self.min {
            (value - self.min) / (self.max - self.min) * 100.0
        } else {
            value
        }
    }
}

/// Per-run normalization state, built once and passed explicitly into the
/// per-entry scorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationContext {
    pub qualifying: Vec<String>,
    pub participation: BTreeMap<String, usize>,
    pub max_participation: usize,
    pub benchmark_bounds: BTreeMap<String, Bounds>,
    pub capability_bounds: Option<Bounds>,
    pub cost_efficiency_bounds: Option<Bounds>,
}

impl NormalizationContext {
    pub fn weight(&self, benchmark: &str) -> f64 {
        let count = self.participation.get(benchmark).copied().unwrap_or(0);
        count as f64 / self.max_participation.max(1) as f64
    }

    pub fn without_global_bounds(&self) -> Self {
        Self {
            capability_bounds: None,
            cost_efficiency_bounds: None,
            ..self.clone()
        }
    }
}
