//! casegen CLI binary
//!
//! This is the minimal entrypoint for the casegen CLI.
//! All logic is in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() handles ALL output including errors
    // Returns Result<(), i32>; main only maps to process exit
    if let Err(code) = casegen::cli::run() {
        std::process::exit(code);
    }
}
