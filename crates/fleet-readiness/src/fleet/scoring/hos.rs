use crate::fleet::domain::{wire_enum, Severity};

pub const BREAK_DUE_HOURS: f64 = 8.0;
pub const DRIVING_LIMIT_HOURS: f64 = 11.0;
pub const DUTY_WINDOW_HOURS: f64 = 14.0;

wire_enum! {
    /// Hours-of-service conditions derived from time since the last rest period.
    pub enum HosFlag as "hos flag" {
        BreakDue => "break_due",
        DrivingLimit => "driving_limit",
        DutyWindowExceeded => "duty_window_exceeded",
    }
}

impl HosFlag {
    pub const fn threshold_hours(self) -> f64 {
        match self {
            Self::BreakDue => BREAK_DUE_HOURS,
            Self::DrivingLimit => DRIVING_LIMIT_HOURS,
            Self::DutyWindowExceeded => DUTY_WINDOW_HOURS,
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::BreakDue => Severity::Warning,
            Self::DrivingLimit | Self::DutyWindowExceeded => Severity::Critical,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BreakDue => "30-minute break due",
            Self::DrivingLimit => "11-hour driving limit reached",
            Self::DutyWindowExceeded => "14-hour duty window exceeded",
        }
    }
}

/// Flags are cumulative and ordered from least to most severe.
pub fn hours_of_service_flags(hours_since_rest: f64) -> Vec<HosFlag> {
    if !hours_since_rest.is_finite() {
        return Vec::new();
    }

    HosFlag::ordered()
        .iter()
        .copied()
        .filter(|flag| hours_since_rest >= flag.threshold_hours())
        .collect()
}

/// Most severe flag raised for the given rest gap, if any.
pub fn worst_hos_flag(hours_since_rest: f64) -> Option<HosFlag> {
    hours_of_service_flags(hours_since_rest).last().copied()
}
