/*!
Reports for the ruler.
*/

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula of the ruler is satisfiable.
    Satisfiable,

    /// The formula of the ruler is unsatisfiable.
    Unsatisfiable,

    /// Satisfiability of the formula of the ruler is unknown, for some reason.
    Unknown,
}

impl Report {
    /// The exit code conventionally used by solvers for the report.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Satisfiable => 10,
            Self::Unsatisfiable => 20,
            Self::Unknown => 0,
        }
    }

    /// The report as written on a DIMACS status line.
    pub fn status_line(&self) -> &'static str {
        match self {
            Self::Satisfiable => "s SATISFIABLE",
            Self::Unsatisfiable => "s UNSATISFIABLE",
            Self::Unknown => "s UNKNOWN",
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Counters summed over every ring, along with counters of clauses exchanged with an external solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub conflicts: u64,
    pub decisions: u64,
    pub propagations: u64,
    pub restarts: u64,
    pub reductions: u64,
    pub fixed: u64,

    pub shared_imported: u64,
    pub shared_exported: u64,

    pub external_imported: u64,
    pub external_discarded: u64,
    pub external_exported: u64,
}

impl std::fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "c {:<20} {}", "conflicts", self.conflicts)?;
        writeln!(f, "c {:<20} {}", "decisions", self.decisions)?;
        writeln!(f, "c {:<20} {}", "propagations", self.propagations)?;
        writeln!(f, "c {:<20} {}", "restarts", self.restarts)?;
        writeln!(f, "c {:<20} {}", "reductions", self.reductions)?;
        writeln!(f, "c {:<20} {}", "fixed", self.fixed)?;
        writeln!(f, "c {:<20} {}", "shared imported", self.shared_imported)?;
        writeln!(f, "c {:<20} {}", "shared exported", self.shared_exported)?;
        writeln!(f, "c {:<20} {}", "external imported", self.external_imported)?;
        writeln!(f, "c {:<20} {}", "external discarded", self.external_discarded)?;
        write!(f, "c {:<20} {}", "external exported", self.external_exported)
    }
}
