use crate::fleet::domain::{wire_enum, InvalidEnumValue};

/// Lower bound of the `optimal` / `ready` band.
pub const OPTIMAL_FLOOR: u8 = 80;
/// Lower bound of the `good` / `monitor` band.
pub const GOOD_FLOOR: u8 = 60;
/// Lower bound of the `degraded` band.
pub const DEGRADED_FLOOR: u8 = 40;

wire_enum! {
    pub enum PerformanceRating as "performance_rating" {
        Optimal => "optimal",
        Good => "good",
        Degraded => "degraded",
        Critical => "critical",
    }
}

impl PerformanceRating {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Good => "Good",
            Self::Degraded => "Degraded",
            Self::Critical => "Critical",
        }
    }
}

wire_enum! {
    /// Triage band driving the status dot and the recommended action tag.
    pub enum StatusBand as "status band" {
        Ready => "ready",
        Monitor => "monitor",
        Rest => "rest",
    }
}

impl StatusBand {
    pub const fn action_tag(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Monitor => "MONITOR",
            Self::Rest => "REST",
        }
    }

    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Ready => "green",
            Self::Monitor => "yellow",
            Self::Rest => "red",
        }
    }
}

wire_enum! {
    pub enum CognitiveLoad as "cognitive_load" {
        Low => "low",
        Moderate => "moderate",
        High => "high",
        Critical => "critical",
    }
}

wire_enum! {
    /// Fleet-wide trend shown next to averaged scores.
    pub enum TrendIndicator as "trend" {
        Good => "good",
        Warning => "warning",
        Critical => "critical",
    }
}

pub fn classify_performance_band(vigilance: u8) -> PerformanceRating {
    if vigilance >= OPTIMAL_FLOOR {
        PerformanceRating::Optimal
    } else if vigilance >= GOOD_FLOOR {
        PerformanceRating::Good
    } else if vigilance >= DEGRADED_FLOOR {
        PerformanceRating::Degraded
    } else {
        PerformanceRating::Critical
    }
}

pub fn classify_status_band(vigilance: u8) -> StatusBand {
    if vigilance >= OPTIMAL_FLOOR {
        StatusBand::Ready
    } else if vigilance >= GOOD_FLOOR {
        StatusBand::Monitor
    } else {
        StatusBand::Rest
    }
}

/// Validates a host-supplied cognitive load value; there is no coercion.
pub fn classify_cognitive_load(raw: &str) -> Result<CognitiveLoad, InvalidEnumValue> {
    raw.parse()
}

/// Trend for an averaged score. Non-finite averages read as critical.
pub fn fleet_trend(average: f64) -> TrendIndicator {
    if !average.is_finite() {
        return TrendIndicator::Critical;
    }
    if average >= f64::from(OPTIMAL_FLOOR) {
        TrendIndicator::Good
    } else if average >= f64::from(GOOD_FLOOR) {
        TrendIndicator::Warning
    } else {
        TrendIndicator::Critical
    }
}
