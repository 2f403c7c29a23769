extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate shlex;
extern crate sift;

use std::env;
use std::io::{BufReader, IsTerminal, Write};

use clap::Parser;
use color_eyre::eyre::Result;
use sift::prelude::*;

//------------------------------------------------------------------------------
fn main() {
    env_logger::builder().format_timestamp_nanos().init();
    if let Err(err) = color_eyre::install() {
        error!("failed to install the error reporter: {err}");
    }

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            eprintln!("{err:?}");
            std::process::exit(2)
        }
    }
}

fn parse_args() -> FilterOptions {
    let mut args = Vec::new();

    args.push(env::args().next().unwrap_or_else(|| String::from("sift")));
    args.extend(
        env::var("SIFT_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    args.extend(env::args().skip(1));

    FilterOptions::parse_from(args).build()
}

fn real_main() -> Result<i32> {
    let opts = parse_args();
    let output_ending = if opts.print0 { "\0" } else { "\n" };
    let print_query = opts.print_query;

    //------------------------------------------------------------------------------
    // candidates come from the pipe only
    let stdin = std::io::stdin();
    let candidates = if stdin.is_terminal() {
        debug!("stdin is a terminal, no candidates");
        Vec::new()
    } else {
        read_candidates(BufReader::new(stdin.lock()), ReaderOption::default().read0(opts.read0))?
    };

    let output = Filter::run_with(opts, candidates)?;

    //------------------------------------------------------------------------------
    // output
    if output.outcome.is_abort() {
        return Ok(output.outcome.exit_code());
    }

    let mut stdout = std::io::stdout().lock();
    if print_query {
        write!(stdout, "{}{}", output.query, output_ending)?;
    }
    for item in output.outcome.selected() {
        write!(stdout, "{item}{output_ending}")?;
    }
    stdout.flush()?;

    Ok(output.outcome.exit_code())
}
