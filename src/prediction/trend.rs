use std::fmt;

// Noise thresholds: a delta strictly below these counts as stable
pub const CO2_NOISE_PPM: i64 = 50;
pub const TVOC_NOISE_PPB: i64 = 50;
pub const TEMPERATURE_NOISE_C: f64 = 0.5;
pub const HUMIDITY_NOISE_PCT: f64 = 2.0;

// Long-term CO2 drift beyond +/- this percentage gets a directional label
pub const LONG_TERM_CHANGE_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl TrendDirection {
    /// Classify an integer delta against a noise threshold.
    ///
    /// A delta exactly equal to the threshold is directional, not stable.
    pub fn from_int_delta(delta: i64, noise: i64) -> Self {
        if delta.abs() < noise {
            TrendDirection::Stable
        } else if delta > 0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Falling
        }
    }

    pub fn from_float_delta(delta: f64, noise: f64) -> Self {
        if delta.abs() < noise {
            TrendDirection::Stable
        } else if delta > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Falling
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Rising => write!(f, "rising"),
            TrendDirection::Falling => write!(f, "falling"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Label for CO2 drift between the oldest and newest reading in the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongTermChange {
    Increase(f64),
    Decrease(f64),
    Change(f64),
}

impl LongTermChange {
    /// Percentage change from `oldest` to `latest`.
    ///
    /// Returns None when `oldest` is zero, since the percentage is undefined.
    pub fn between(oldest: i32, latest: i32) -> Option<Self> {
        if oldest == 0 {
            return None;
        }

        let percent = (f64::from(latest) - f64::from(oldest)) / f64::from(oldest) * 100.0;
        let change = if percent > LONG_TERM_CHANGE_PCT {
            LongTermChange::Increase(percent)
        } else if percent < -LONG_TERM_CHANGE_PCT {
            LongTermChange::Decrease(percent)
        } else {
            LongTermChange::Change(percent)
        };
        Some(change)
    }

    pub fn percent(&self) -> f64 {
        match *self {
            LongTermChange::Increase(p)
            | LongTermChange::Decrease(p)
            | LongTermChange::Change(p) => p,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LongTermChange::Increase(_) => "increase",
            LongTermChange::Decrease(_) => "decrease",
            LongTermChange::Change(_) => "change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Co2Level {
    Good,
    Acceptable,
    High,
}

impl Co2Level {
    pub fn classify(ppm: i32) -> Self {
        if ppm < 800 {
            Co2Level::Good
        } else if ppm < 1500 {
            Co2Level::Acceptable
        } else {
            Co2Level::High
        }
    }
}

impl fmt::Display for Co2Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Co2Level::Good => write!(f, "good"),
            Co2Level::Acceptable => write!(f, "acceptable"),
            Co2Level::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvocLevel {
    Low,
    Medium,
    High,
}

impl TvocLevel {
    pub fn classify(ppb: i32) -> Self {
        if ppb < 500 {
            TvocLevel::Low
        } else if ppb < 1500 {
            TvocLevel::Medium
        } else {
            TvocLevel::High
        }
    }
}

impl fmt::Display for TvocLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TvocLevel::Low => write!(f, "low"),
            TvocLevel::Medium => write!(f, "medium"),
            TvocLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureLevel {
    Cool,
    Mild,
    Warm,
}

impl TemperatureLevel {
    pub fn classify(celsius: f64) -> Self {
        if celsius < 18.0 {
            TemperatureLevel::Cool
        } else if celsius < 24.0 {
            TemperatureLevel::Mild
        } else {
            TemperatureLevel::Warm
        }
    }
}

impl fmt::Display for TemperatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureLevel::Cool => write!(f, "cool"),
            TemperatureLevel::Mild => write!(f, "mild"),
            TemperatureLevel::Warm => write!(f, "warm"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumidityLevel {
    Dry,
    Comfortable,
    Humid,
}

impl HumidityLevel {
    pub fn classify(percent: f64) -> Self {
        if percent < 30.0 {
            HumidityLevel::Dry
        } else if percent < 60.0 {
            HumidityLevel::Comfortable
        } else {
            HumidityLevel::Humid
        }
    }
}

impl fmt::Display for HumidityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HumidityLevel::Dry => write!(f, "dry"),
            HumidityLevel::Comfortable => write!(f, "comfortable"),
            HumidityLevel::Humid => write!(f, "humid"),
        }
    }
}
