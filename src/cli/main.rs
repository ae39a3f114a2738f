use parse_args::{parse_args, CliConfig};
use read::read_dimacs;
use ring_sat::{reports::Report, ruler::Ruler};

mod parse_args;
mod read;

/// Exit code for invalid arguments or an unreadable formula.
const INPUT_ERROR: i32 = 1;

/// Exit code for a solve which ended with an error.
const SOLVE_ERROR: i32 = 2;

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut cli_options = CliConfig::default();

    let config = match parse_args(&args, &mut cli_options) {
        Ok(config) => config,
        Err(e) => {
            println!("c {e}");
            std::process::exit(INPUT_ERROR);
        }
    };

    let mut ruler = Ruler::from_config(config);

    let Some(path) = args.last() else {
        std::process::exit(INPUT_ERROR);
    };

    if let Err(e) = read_dimacs(path, &mut ruler) {
        println!("c {e}");
        std::process::exit(INPUT_ERROR);
    }

    let report = match ruler.solve() {
        Ok(report) => report,
        Err(e) => {
            println!("c Solve error: {e}");
            std::process::exit(SOLVE_ERROR);
        }
    };

    println!("{}", report.status_line());

    if report == Report::Satisfiable && cli_options.model {
        if let Some(model) = ruler.model() {
            let mut line = String::from("v");
            for literal in model {
                line.push(' ');
                line.push_str(&literal.to_string());
            }
            println!("{line} 0");
        }
    }

    if !cli_options.quiet {
        if let Some(winner) = ruler.winner() {
            println!("c {:<20} {winner}", "winning ring");
        }
        println!("c {:<20} {:.2?}", "time", ruler.elapsed());
        println!("{}", ruler.statistics());
    }

    std::process::exit(report.exit_code());
}
