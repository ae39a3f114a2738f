/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library, always with a target from [targets] and, for ring-local events, the id of the ring.
As the log crate is built with `release_max_level_off` none of these calls survive a release build.

Note, no log implementation is provided.
The cli installs [env_logger](https://docs.rs/env_logger/latest/env_logger/) when built with the `log` feature, and so, for example, the following narrows output to sharing between rings:

```sh
RUST_LOG=export=trace,import=trace ring_cli --threads=4 formula.cnf
```
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [assignment](crate::procedures::assign)
    pub const ASSIGN: &str = "assign";

    /// Logs related to [propagation](crate::procedures::propagate)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to [analysis](crate::procedures::analysis)
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to [minimization and shrinking](crate::procedures::minimize)
    pub const MINIMIZE: &str = "minimize";

    /// Logs related to [backjumping](crate::procedures::backjump)
    pub const BACKJUMP: &str = "backjump";

    /// Logs related to [switching modes](crate::procedures::mode)
    pub const MODE: &str = "mode";

    /// Logs related to [restarts](crate::procedures::restart)
    pub const RESTART: &str = "restart";

    /// Logs related to [rephasing](crate::procedures::rephase)
    pub const REPHASE: &str = "rephase";

    /// Logs related to [exporting](crate::procedures::export) clauses to peers.
    pub const EXPORT: &str = "export";

    /// Logs related to [importing](crate::procedures::import) clauses from peers.
    pub const IMPORT: &str = "import";

    /// Logs related to clauses exchanged with [external](crate::procedures::external) producers or consumers.
    pub const EXTERNAL: &str = "external";

    /// Logs related to [probing](crate::procedures::probe) and [failed literals](crate::procedures::fail)
    pub const PROBE: &str = "probe";

    /// Logs related to [vivification](crate::procedures::vivify)
    pub const VIVIFY: &str = "vivify";

    /// Logs related to [cloning](crate::procedures::clone) rings.
    pub const CLONE: &str = "clone";

    /// Logs related to [compaction](crate::procedures::compact)
    pub const COMPACT: &str = "compact";

    /// Logs related to root level [simplification](crate::procedures::simplify)
    pub const SIMPLIFY: &str = "simplify";

    /// Logs related to the [ruler](crate::ruler)
    pub const RULER: &str = "ruler";

    /// Logs related to a [ring](crate::ring) as a whole, e.g. verdicts and limits.
    pub const RING: &str = "ring";

    /// Logs related to [reduction](crate::procedures::reduce)
    pub const REDUCE: &str = "reduce";

    /// Logs related to the [dimacs](crate::ruler::Ruler::read_dimacs) parser.
    pub const PARSER: &str = "parser";
}
