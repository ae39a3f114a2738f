use std::{fmt::Display, str::FromStr, time::Duration};

use ring_sat::config::{Config, ConfigOption};

/// A collection of configuration options relevant only to the CLI.
#[derive(Default)]
pub struct CliConfig {
    /// Whether to report a model, if one exists.
    pub model: bool,

    /// Whether to omit statistics after a solve.
    pub quiet: bool,
}

pub enum ConfigError {
    Unrecognised(String),
    InvalidValue {
        name: &'static str,
        min: String,
        max: String,
    },
    NoPath,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::Unrecognised(arg) => write!(f, "Unable to parse argument: {arg:?}"),
            Self::InvalidValue { name, min, max } => {
                write!(f, "{name} requires a value between {min} and {max}")
            }
            Self::NoPath => write!(f, "Usage: ring_cli [--option=value ...] [--model] FILE.cnf"),
        }
    }
}

/// Sets `option` from `request`, following the common template of an option.
///
/// If a value is present, may be parsed appropriately, and is valid, the option is updated.
/// Otherwise, an error noting the bounds of the option is returned.
fn set_option<T>(option: &mut ConfigOption<T>, request: Option<&str>) -> Result<(), ConfigError>
where
    T: Clone + PartialOrd + FromStr + Display,
{
    if let Some(request) = request {
        if option.set_from_str(request) {
            println!("c {} set to: {}", option.name, option.value);
            return Ok(());
        }
    }

    let (min, max) = option.min_max();
    Err(ConfigError::InvalidValue {
        name: option.name,
        min: min.to_string(),
        max: max.to_string(),
    })
}

/// Parse CLI arguments to a [Config] struct and a [CliConfig] struct.
///
/// The last argument is the path to the formula, and every other argument (after the name of the binary) is an option.
pub(super) fn parse_args(args: &[String], cli_options: &mut CliConfig) -> Result<Config, ConfigError> {
    if args.len() < 2 || args.last().is_some_and(|arg| arg.starts_with("--")) {
        return Err(ConfigError::NoPath);
    }

    let mut cfg = Config::default();

    'arg_examination: for arg in args.iter().skip(1).rev().skip(1) {
        let mut split = arg.splitn(2, '=');
        let option = split.next();
        let request = split.next();

        match option {
            Some("--model") | Some("--valuation") => {
                println!("c A model will be written, if one exists.");
                cli_options.model = true;
            }

            Some("--quiet") => {
                cli_options.quiet = true;
            }

            // Durations are given in seconds.
            Some("--time_limit") => {
                let (min, max) = cfg.time_limit.min_max();
                let (min, max) = (min.as_secs(), max.as_secs());

                if let Some(Ok(seconds)) = request.map(|request| request.parse::<u64>()) {
                    if min <= seconds && seconds <= max {
                        println!("c time_limit set to: {seconds} seconds");
                        cfg.time_limit.value = Duration::from_secs(seconds);
                        continue 'arg_examination;
                    }
                }

                return Err(ConfigError::InvalidValue {
                    name: cfg.time_limit.name,
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }

            Some("--threads") => set_option(&mut cfg.threads, request)?,
            Some("--seed") => set_option(&mut cfg.seed, request)?,
            Some("--conflict_limit") => set_option(&mut cfg.conflict_limit, request)?,

            Some("--share_learned") => set_option(&mut cfg.share_learned, request)?,
            Some("--share_by_size") => set_option(&mut cfg.share_by_size, request)?,
            Some("--export_policy") => set_option(&mut cfg.export_policy, request)?,
            Some("--subsume_imported") => set_option(&mut cfg.subsume_imported, request)?,
            Some("--limit_import_rate") => set_option(&mut cfg.limit_import_rate, request)?,
            Some("--vivify_export") => set_option(&mut cfg.vivify_export, request)?,
            Some("--external_export_max_size") => {
                set_option(&mut cfg.external_export_max_size, request)?
            }

            Some("--tier1_glue_limit") => set_option(&mut cfg.tier1_glue_limit, request)?,
            Some("--tier2_glue_limit") => set_option(&mut cfg.tier2_glue_limit, request)?,
            Some("--minimize") => set_option(&mut cfg.minimize, request)?,
            Some("--minimize_depth") => set_option(&mut cfg.minimize_depth, request)?,
            Some("--shrink") => set_option(&mut cfg.shrink, request)?,
            Some("--random_decisions") => set_option(&mut cfg.random_decisions, request)?,
            Some("--decay") => set_option(&mut cfg.decay, request)?,
            Some("--max_score") => set_option(&mut cfg.max_score, request)?,
            Some("--initial_phase") => set_option(&mut cfg.initial_phase, request)?,
            Some("--target_phases") => set_option(&mut cfg.target_phases, request)?,

            Some("--mode_interval") => set_option(&mut cfg.mode_interval, request)?,
            Some("--focused_restart_interval") => {
                set_option(&mut cfg.focused_restart_interval, request)?
            }
            Some("--stable_restart_interval") => {
                set_option(&mut cfg.stable_restart_interval, request)?
            }
            Some("--restart_margin") => set_option(&mut cfg.restart_margin, request)?,
            Some("--fast_alpha") => set_option(&mut cfg.fast_alpha, request)?,
            Some("--slow_alpha") => set_option(&mut cfg.slow_alpha, request)?,
            Some("--reduce_interval") => set_option(&mut cfg.reduce_interval, request)?,
            Some("--reduce_fraction") => set_option(&mut cfg.reduce_fraction, request)?,
            Some("--rephase_interval") => set_option(&mut cfg.rephase_interval, request)?,

            Some("--probe") => set_option(&mut cfg.probe, request)?,
            Some("--probe_interval") => set_option(&mut cfg.probe_interval, request)?,
            Some("--fail") => set_option(&mut cfg.fail, request)?,
            Some("--fail_effort") => set_option(&mut cfg.fail_effort, request)?,
            Some("--vivify") => set_option(&mut cfg.vivify, request)?,
            Some("--vivify_effort") => set_option(&mut cfg.vivify_effort, request)?,
            Some("--vivify_tier1_effort") => set_option(&mut cfg.vivify_tier1_effort, request)?,
            Some("--vivify_tier2_effort") => set_option(&mut cfg.vivify_tier2_effort, request)?,
            Some("--min_effort") => set_option(&mut cfg.min_effort, request)?,

            Some("--simplify") => set_option(&mut cfg.simplify, request)?,
            Some("--simplify_interval") => set_option(&mut cfg.simplify_interval, request)?,
            Some("--compact_fraction") => set_option(&mut cfg.compact_fraction, request)?,
            Some("--check_witness") => set_option(&mut cfg.check_witness, request)?,

            Some(_) | None => return Err(ConfigError::Unrecognised(arg.to_owned())),
        }
    }

    Ok(cfg)
}
