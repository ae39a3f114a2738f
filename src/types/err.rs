//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use.
//! - Conflicts are *not* errors. A conflict found during propagation is returned as data and handled by analysis, and a conflict at decision level zero marks a ring (or the ruler) inconsistent, which is reported as unsatisfiable.
//! - The remaining errors are external, e.g. an external literal outside the supported range, or a malformed DIMACS file.
//!
//! Names of the error enums overlap with the subsystems they report on.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

/// Every error the library may return, wrapping the error of a specific subsystem.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Build(BuildError),
    Parse(ParseError),
    Solve(SolveError),
    Thread(ThreadError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build(e) => write!(f, "build error: {e:?}"),
            Self::Parse(e) => write!(f, "parse error: {e:?}"),
            Self::Solve(e) => write!(f, "solve error: {e:?}"),
            Self::Thread(e) => write!(f, "thread error: {e:?}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// Noted errors when adding clauses to a ruler.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// A literal of zero, as zero terminates clauses in DIMACS and has no variable.
    ZeroLiteral,

    /// A literal whose variable exceeds [MAX_VAR](crate::structures::literal::MAX_VAR).
    VariableLimit,

    /// Clauses may only be added before a solve.
    Solving,
}

impl From<BuildError> for ErrorKind {
    fn from(e: BuildError) -> Self {
        ErrorKind::Build(e)
    }
}

/// Errors during parsing of a DIMACS file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The problem specification line is malformed.
    ProblemSpecification,

    /// A token on the given line could not be read as a literal.
    Line(usize),

    /// A clause was not terminated by zero at the end of input.
    MissingDelimiter,

    /// The input could not be read.
    Read,

    /// A literal of the clause was rejected when added.
    Build(BuildError),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Noted errors during a solve.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolveError {
    /// A solve has already taken place, and the ruler does not support a second.
    AlreadySolved,

    /// The model of the winning ring falsifies the given original clause.
    ///
    /// This is unexpected, and indicates a bug.
    Witness(usize),

    /// A winning ring claimed satisfiability without returning its valuation.
    MissingWinner,
}

impl From<SolveError> for ErrorKind {
    fn from(e: SolveError) -> Self {
        ErrorKind::Solve(e)
    }
}

/// Errors from threads running rings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThreadError {
    /// A thread could not be spawned.
    Spawn,

    /// A ring panicked, and so its thread could not be joined.
    Join(usize),
}

impl From<ThreadError> for ErrorKind {
    fn from(e: ThreadError) -> Self {
        ErrorKind::Thread(e)
    }
}
