use std::fmt;

/// Telescope class of the VLTI array selected by the station list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Telescope {
    /// 1.8m Auxiliary Telescopes.
    AT,
    /// 8m Unit Telescopes.
    UT,
}

impl Telescope {
    /// Unit Telescope stations are named `U1`..`U4`; everything else is an AT configuration.
    pub fn from_stations(stations: &str) -> Self {
        if stations.contains('U') {
            Telescope::UT
        } else {
            Telescope::AT
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Telescope::AT => "AT",
            Telescope::UT => "UT",
        }
    }
}

impl fmt::Display for Telescope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
