use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;
use weatherlog::{generate_daily_summary, generate_summary, parse_readings};

// A week of forecast data, for running without an input file
const SAMPLE: &str = "\
date,min,max
2021-07-02T07:00:00+08:00,49,67
2021-07-03T07:00:00+08:00,57,68
2021-07-04T07:00:00+08:00,56,62
2021-07-05T07:00:00+08:00,55,61
2021-07-06T07:00:00+08:00,53,62
";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let set = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).into_diagnostic()?;
            parse_readings(&raw)
        }
        None => parse_readings(SAMPLE),
    };
    if set.skipped_rows > 0 {
        eprintln!("ignored {} malformed row(s)", set.skipped_rows);
    }

    println!("{}", generate_summary(&set.readings)?);
    println!("{}", generate_daily_summary(&set.readings)?);

    Ok(())
}
