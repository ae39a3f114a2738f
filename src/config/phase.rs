use std::str::FromStr;

/// The phase assigned to a variable which has never been assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PhaseInit {
    Negative = 0,
    Positive,
}

impl PhaseInit {
    /// The minimum PhaseInit type.
    pub const MIN: PhaseInit = PhaseInit::Negative;

    /// The maximum PhaseInit type.
    pub const MAX: PhaseInit = PhaseInit::Positive;

    /// The phase as a value, where positive is `1`.
    pub fn value(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::Positive => 1,
        }
    }
}

impl std::fmt::Display for PhaseInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "Negative"),
            Self::Positive => write!(f, "Positive"),
        }
    }
}

impl FromStr for PhaseInit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Negative" | "0" => Ok(Self::Negative),

            "Positive" | "1" => Ok(Self::Positive),

            _unkown_string => Err(()),
        }
    }
}
