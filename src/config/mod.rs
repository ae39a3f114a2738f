/*!
Configuration of a solve.

All configuration is contained in a [Config], given to a [ruler](crate::ruler::Ruler) on creation.
Each ring takes a copy of the configuration when cloned, and so the configuration may not be revised during a solve.

Each option is a [ConfigOption], noting a name, bounds, and the value.
The name of an option is also the name used to set the option from the [cli](crate#cli), e.g. `--tier2_glue_limit=8`.

The options fall into a handful of groups:
- The portfolio: the count of threads (and so rings), the seed, and limits.
- Sharing: whether and how learnt clauses are exchanged between rings.
- Search: glue tiers, minimization, decisions, modes, restarts, reductions, and rephasing.
- Inprocessing: probing, failed literals, and vivification, with efforts relative to search ticks.
- Simplification: rounds of root level simplification and compaction.

Constants which are limits of the representation, rather than heuristics, are not configurable.
For example, [MAX_GLUE](crate::structures::clause::MAX_GLUE) and [MAX_VAR](crate::structures::literal::MAX_VAR).
*/

mod config_option;
pub use config_option::ConfigOption;

mod export_policy;
pub use export_policy::ExportPolicy;

mod phase;
pub use phase::PhaseInit;

/// The maximum count of threads, and so rings.
pub const MAX_THREADS: usize = 1 << 16;

/// The count of buckets for each ordered pair of rings.
pub const POOL_BUCKETS: usize = 4;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// The count of rings, each of which runs on a thread.
    pub threads: ConfigOption<usize>,

    /// The seed for the random number generator of each ring, which is combined with the id of the ring.
    pub seed: ConfigOption<u64>,

    /// Terminate after (roughly) this many conflicts in some ring, if non-zero.
    pub conflict_limit: ConfigOption<u64>,

    /// Terminate after this much time, if non-zero.
    pub time_limit: ConfigOption<std::time::Duration>,

    /// Share learnt clauses between rings.
    pub share_learned: ConfigOption<bool>,

    /// Rank shared clauses by size then glue, rather than glue then size.
    pub share_by_size: ConfigOption<bool>,

    /// The peers a learnt clause is exported to.
    pub export_policy: ConfigOption<ExportPolicy>,

    /// Check whether imported clauses are subsumed by existing clauses before installing.
    pub subsume_imported: ConfigOption<bool>,

    /// Only import from peers after a conflict (or strengthening) has been found since the last import.
    pub limit_import_rate: ConfigOption<bool>,

    /// Export clauses derived by vivification to peers.
    pub vivify_export: ConfigOption<bool>,

    /// The largest learnt clause passed to an external consumer.
    pub external_export_max_size: ConfigOption<usize>,

    /// Learnt clauses of at most this glue are tier one.
    pub tier1_glue_limit: ConfigOption<u32>,

    /// Learnt clauses of at most this glue (but above tier one) are tier two.
    pub tier2_glue_limit: ConfigOption<u32>,

    /// Minimize learnt clauses by recursive self-subsuming resolution.
    pub minimize: ConfigOption<bool>,

    /// The recursion depth beyond which a literal is treated as not removable.
    pub minimize_depth: ConfigOption<usize>,

    /// Shrink learnt clauses of glue one.
    pub shrink: ConfigOption<bool>,

    /// The count of random decisions made after switching modes.
    pub random_decisions: ConfigOption<u64>,

    /// The decay of variable scores in stable mode.
    pub decay: ConfigOption<f64>,

    /// Scores are rescaled when exceeding this value.
    pub max_score: ConfigOption<f64>,

    /// The phase of a variable before its first assignment.
    pub initial_phase: ConfigOption<PhaseInit>,

    /// Use target phases in stable mode.
    pub target_phases: ConfigOption<bool>,

    /// The conflicts before the first switch from focused to stable mode.
    pub mode_interval: ConfigOption<u64>,

    /// The base interval of conflicts between restarts in focused mode.
    pub focused_restart_interval: ConfigOption<u64>,

    /// The base interval of conflicts between restarts in stable mode, multiplied by the luby sequence.
    pub stable_restart_interval: ConfigOption<u64>,

    /// In focused mode, restart when the fast glue average exceeds the slow average by this factor.
    pub restart_margin: ConfigOption<f64>,

    /// The smoothing factor of fast moving averages.
    pub fast_alpha: ConfigOption<f64>,

    /// The smoothing factor of slow moving averages.
    pub slow_alpha: ConfigOption<f64>,

    /// The base interval of conflicts between reductions.
    pub reduce_interval: ConfigOption<u64>,

    /// The fraction of reduction candidates collected on a reduction.
    pub reduce_fraction: ConfigOption<f64>,

    /// The base interval of conflicts between rephasing.
    pub rephase_interval: ConfigOption<u64>,

    /// Permit probing, i.e. failed literal probing and vivification.
    pub probe: ConfigOption<bool>,

    /// The base interval of conflicts between probing.
    pub probe_interval: ConfigOption<u64>,

    /// Permit failed literal probing.
    pub fail: ConfigOption<bool>,

    /// Failed literal probing ticks, relative to search ticks since the last probe.
    pub fail_effort: ConfigOption<f64>,

    /// Permit vivification.
    pub vivify: ConfigOption<bool>,

    /// Vivification ticks, relative to search ticks since the last probe.
    pub vivify_effort: ConfigOption<f64>,

    /// The relative share of vivification effort spent on tier one clauses.
    pub vivify_tier1_effort: ConfigOption<f64>,

    /// The relative share of vivification effort spent on tier two clauses.
    pub vivify_tier2_effort: ConfigOption<f64>,

    /// The minimum search ticks used to derive inprocessing efforts.
    pub min_effort: ConfigOption<u64>,

    /// Permit rounds of root level simplification during a solve.
    pub simplify: ConfigOption<bool>,

    /// The base interval of conflicts (of the first ring) between simplification rounds.
    pub simplify_interval: ConfigOption<u64>,

    /// Compact variables once this fraction of active variables has been fixed since the last compaction.
    pub compact_fraction: ConfigOption<f64>,

    /// Check the model of a satisfiable solve against every original clause.
    pub check_witness: ConfigOption<bool>,
}

impl Default for Config {
    /// The default configuration roughly follows the heuristic constants of established portfolio solvers.
    fn default() -> Self {
        Config {
            threads: ConfigOption {
                name: "threads",
                min: 1,
                max: MAX_THREADS,
                value: 1,
            },

            seed: ConfigOption {
                name: "seed",
                min: 0,
                max: u64::MAX,
                value: 0,
            },

            conflict_limit: ConfigOption {
                name: "conflict_limit",
                min: 0,
                max: u64::MAX,
                value: 0,
            },

            time_limit: ConfigOption {
                name: "time_limit",
                min: std::time::Duration::from_secs(0),
                max: std::time::Duration::MAX,
                value: std::time::Duration::from_secs(0),
            },

            share_learned: ConfigOption {
                name: "share_learned",
                min: false,
                max: true,
                value: true,
            },

            share_by_size: ConfigOption {
                name: "share_by_size",
                min: false,
                max: true,
                value: false,
            },

            export_policy: ConfigOption {
                name: "export_policy",
                min: ExportPolicy::MIN,
                max: ExportPolicy::MAX,
                value: ExportPolicy::Logarithmic,
            },

            subsume_imported: ConfigOption {
                name: "subsume_imported",
                min: false,
                max: true,
                value: true,
            },

            limit_import_rate: ConfigOption {
                name: "limit_import_rate",
                min: false,
                max: true,
                value: false,
            },

            vivify_export: ConfigOption {
                name: "vivify_export",
                min: false,
                max: true,
                value: true,
            },

            external_export_max_size: ConfigOption {
                name: "external_export_max_size",
                min: 1,
                max: usize::MAX,
                value: 64,
            },

            tier1_glue_limit: ConfigOption {
                name: "tier1_glue_limit",
                min: 1,
                max: crate::structures::clause::MAX_GLUE,
                value: 2,
            },

            tier2_glue_limit: ConfigOption {
                name: "tier2_glue_limit",
                min: 1,
                max: crate::structures::clause::MAX_GLUE,
                value: 6,
            },

            minimize: ConfigOption {
                name: "minimize",
                min: false,
                max: true,
                value: true,
            },

            minimize_depth: ConfigOption {
                name: "minimize_depth",
                min: 1,
                max: usize::MAX,
                value: 1000,
            },

            shrink: ConfigOption {
                name: "shrink",
                min: false,
                max: true,
                value: true,
            },

            random_decisions: ConfigOption {
                name: "random_decisions",
                min: 0,
                max: u64::MAX,
                value: 100,
            },

            decay: ConfigOption {
                name: "decay",
                min: f64::EPSILON,
                max: 1.0,
                value: 0.95,
            },

            max_score: ConfigOption {
                name: "max_score",
                min: 1.0,
                max: f64::MAX,
                value: 1e150,
            },

            initial_phase: ConfigOption {
                name: "initial_phase",
                min: PhaseInit::MIN,
                max: PhaseInit::MAX,
                value: PhaseInit::Positive,
            },

            target_phases: ConfigOption {
                name: "target_phases",
                min: false,
                max: true,
                value: true,
            },

            mode_interval: ConfigOption {
                name: "mode_interval",
                min: 1,
                max: u64::MAX,
                value: 3_000,
            },

            focused_restart_interval: ConfigOption {
                name: "focused_restart_interval",
                min: 1,
                max: u64::MAX,
                value: 50,
            },

            stable_restart_interval: ConfigOption {
                name: "stable_restart_interval",
                min: 1,
                max: u64::MAX,
                value: 1024,
            },

            restart_margin: ConfigOption {
                name: "restart_margin",
                min: 1.0,
                max: f64::MAX,
                value: 1.1,
            },

            fast_alpha: ConfigOption {
                name: "fast_alpha",
                min: f64::EPSILON,
                max: 1.0,
                value: 3e-2,
            },

            slow_alpha: ConfigOption {
                name: "slow_alpha",
                min: f64::EPSILON,
                max: 1.0,
                value: 1e-5,
            },

            reduce_interval: ConfigOption {
                name: "reduce_interval",
                min: 1,
                max: u64::MAX,
                value: 1_000,
            },

            reduce_fraction: ConfigOption {
                name: "reduce_fraction",
                min: 0.0,
                max: 1.0,
                value: 0.75,
            },

            rephase_interval: ConfigOption {
                name: "rephase_interval",
                min: 1,
                max: u64::MAX,
                value: 1_000,
            },

            probe: ConfigOption {
                name: "probe",
                min: false,
                max: true,
                value: true,
            },

            probe_interval: ConfigOption {
                name: "probe_interval",
                min: 1,
                max: u64::MAX,
                value: 2_000,
            },

            fail: ConfigOption {
                name: "fail",
                min: false,
                max: true,
                value: true,
            },

            fail_effort: ConfigOption {
                name: "fail_effort",
                min: 0.0,
                max: 1e3,
                value: 0.02,
            },

            vivify: ConfigOption {
                name: "vivify",
                min: false,
                max: true,
                value: true,
            },

            vivify_effort: ConfigOption {
                name: "vivify_effort",
                min: 0.0,
                max: 1e3,
                value: 0.01,
            },

            vivify_tier1_effort: ConfigOption {
                name: "vivify_tier1_effort",
                min: 0.0,
                max: 1e3,
                value: 1.0,
            },

            vivify_tier2_effort: ConfigOption {
                name: "vivify_tier2_effort",
                min: 0.0,
                max: 1e3,
                value: 3.0,
            },

            min_effort: ConfigOption {
                name: "min_effort",
                min: 0,
                max: u64::MAX,
                value: 10_000,
            },

            simplify: ConfigOption {
                name: "simplify",
                min: false,
                max: true,
                value: true,
            },

            simplify_interval: ConfigOption {
                name: "simplify_interval",
                min: 1,
                max: u64::MAX,
                value: 10_000,
            },

            compact_fraction: ConfigOption {
                name: "compact_fraction",
                min: 0.0,
                max: 1.0,
                value: 0.05,
            },

            check_witness: ConfigOption {
                name: "check_witness",
                min: false,
                max: true,
                value: true,
            },
        }
    }
}

impl Config {
    /// The default configuration, with the given count of threads.
    pub fn with_threads(threads: usize) -> Self {
        let mut config = Config::default();
        config.threads.value = threads.clamp(1, MAX_THREADS);
        config
    }
}
