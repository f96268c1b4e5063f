//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = nestmap_cli::run() {
        eprintln!("nestmap: {err}");
        std::process::exit(1);
    }
}
