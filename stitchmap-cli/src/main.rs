//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    stitchmap_cli::logging::init();
    if let Err(err) = stitchmap_cli::run() {
        eprintln!("stitchmap: {err}");
        std::process::exit(1);
    }
}
