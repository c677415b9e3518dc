#![forbid(unsafe_code)]

//! `runcopy` binary entrypoint.

fn main() {
    std::process::exit(runcopy_cli::run());
}
