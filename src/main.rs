use clap::Parser;
use log::warn;
use snafu::ErrorCompat;

mod args;
mod canvass;

use crate::args::Args;

fn main() {
    let args = Args::parse();
    if args.verbose && std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    if let Err(e) = canvass::run(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
