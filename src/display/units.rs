//! Selectable digit groups

use std::str::FromStr;

/// One of the four digit groups a countdown can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// All groups in display order
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
    ];

    /// Single-letter code used on the command line
    pub fn code(&self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Hours => 'H',
            TimeUnit::Minutes => 'M',
            TimeUnit::Seconds => 'S',
        }
    }

    /// Label printed under the digits
    pub fn label(&self) -> &'static str {
        match self {
            TimeUnit::Days => "DAYS",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Minutes => "MINS",
            TimeUnit::Seconds => "SECS",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'D' => Some(TimeUnit::Days),
            'H' => Some(TimeUnit::Hours),
            'M' => Some(TimeUnit::Minutes),
            'S' => Some(TimeUnit::Seconds),
            _ => None,
        }
    }
}

/// Set of groups to display, always iterated days first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSelection(Vec<TimeUnit>);

impl UnitSelection {
    pub fn new(units: impl IntoIterator<Item = TimeUnit>) -> Self {
        let mut units: Vec<TimeUnit> = units.into_iter().collect();
        units.sort();
        units.dedup();
        Self(units)
    }

    pub fn contains(&self, unit: TimeUnit) -> bool {
        self.0.contains(&unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = TimeUnit> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for UnitSelection {
    fn default() -> Self {
        Self::new(TimeUnit::ALL)
    }
}

impl FromStr for UnitSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let units = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| {
                TimeUnit::from_code(c)
                    .ok_or_else(|| format!("Unknown time unit '{}', expected one of D, H, M, S", c))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if units.is_empty() {
            return Err("At least one time unit must be shown".to_string());
        }
        Ok(Self::new(units))
    }
}
