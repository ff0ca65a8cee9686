use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context};
use getopts::Options;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vtxremap::convert;
use vtxremap::ConvertConfig;

static BRIEF: &str = "Graphalytics vertex remapper (vtxremap): remap the vertices ID of the input graph \
into the dense domain [0, num_vertices)

Usage: vtxremap [options] <input> <output>";

fn main() -> ExitCode {
    init_tracing();
    let start = Instant::now();
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "vtxremap".to_string());

    match try_main(&args) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => {
            println!("\nDone. Whole completion time: {:.3}s", start.elapsed().as_secs_f64());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            eprintln!("Type `{} --help' to check how to run the program", program);
            eprintln!("Program terminated");
            ExitCode::FAILURE
        }
    }
}

// false when only the usage was requested
fn try_main(args: &[String]) -> anyhow::Result<bool> {
    let mut opts = Options::new();
    opts.optflag("c", "compress", "Compress the output vertices and edges with zlib");
    opts.optflag("h", "help", "Show this help menu");
    opts.optflag("s", "sorted", "Respect the sorted order of the vertices in the mapping");
    opts.optopt("", "seed", "Seed for the weights generated for unweighted graphs", "N");
    opts.optopt("", "max-weight", "Upper bound for the weights generated for unweighted graphs [default: 1.0]", "W");

    let matches = opts.parse(args.iter().skip(1)).context("invalid command line")?;
    if args.len() <= 1 || matches.opt_present("help") {
        println!("{}", opts.usage(BRIEF));
        return Ok(false);
    }

    if matches.free.len() != 2 {
        bail!(
            "invalid number of arguments: {}. Expected format: vtxremap [options] <input> <output>",
            matches.free.len()
        );
    }
    let input = &matches.free[0];
    if !Path::new(input).exists() {
        bail!("the given input graph does not exist: `{}'", input);
    }

    let mut config = ConvertConfig::new(input, &matches.free[1]);
    config.compress = matches.opt_present("compress");
    config.sorted_order = matches.opt_present("sorted");
    config.seed = matches
        .opt_str("seed")
        .map(|s| s.parse::<u64>())
        .transpose()
        .context("invalid setting for --seed")?;
    if let Some(weight) = matches.opt_str("max-weight") {
        config.max_weight = weight.parse().context("invalid setting for --max-weight")?;
    }

    println!("Path input graph: {}", config.input.display());
    println!("Path output: {}", config.output.display());
    println!("Compress the output with zlib: {}", config.compress);
    println!("Respect the sorted order: {}", config.sorted_order);
    println!();

    let summary = convert::run(&config)?;
    println!(
        "Saved {} vertices and {} edges to {}",
        summary.num_vertices,
        summary.num_edges,
        summary.properties_path.display()
    );
    Ok(true)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VTXREMAP_LOG").unwrap_or_else(|_| EnvFilter::new("vtxremap=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
