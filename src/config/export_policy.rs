use std::str::FromStr;

/// The peers a ring exports a learnt clause to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportPolicy {
    /// A single peer, chosen at random for each clause.
    Single = 1,

    /// ⌈log₂ n⌉ distinct peers, chosen at random for each clause, for n rings.
    Logarithmic,

    /// Every peer.
    All,
}

impl std::fmt::Display for ExportPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "Single"),
            Self::Logarithmic => write!(f, "Logarithmic"),
            Self::All => write!(f, "All"),
        }
    }
}

impl ExportPolicy {
    /// The minimum ExportPolicy type.
    pub const MIN: ExportPolicy = ExportPolicy::Single;

    /// The maximum ExportPolicy type.
    pub const MAX: ExportPolicy = ExportPolicy::All;
}

impl FromStr for ExportPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" | "1" => Ok(Self::Single),

            "Logarithmic" | "2" => Ok(Self::Logarithmic),

            "All" | "3" => Ok(Self::All),

            _unkown_string => Err(()),
        }
    }
}
