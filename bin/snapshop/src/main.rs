#![doc = "The snapshop command line: canonical headers, state proofs and governance snapshots."]
#![doc(issue_tracker_base_url = "https://github.com/snapshop-rs/snapshop/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod cli;
pub mod commands;
pub mod flags;

fn main() {
    snapshop_cli::backtrace::enable();

    if let Err(err) = <cli::Cli as clap::Parser>::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
