// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text.

use crate::output;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_usage() {
    println!(
        "{} {} - a small class-based scripting language",
        output::title("Ember"),
        output::version(VERSION)
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::section_header("Usage"),
        output::command("ember"),
        output::arg("<command>"),
        output::arg("[args]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}    Run a program", output::command("run"), output::arg("<file>"));
    println!("  {} {}    Tokenize a file and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}  Parse a file and print the statement tree", output::command("parse"), output::arg("<file>"));
    println!("  {}           Show this help", output::command("help"));
    println!("  {}        Show version", output::command("version"));
    println!();
    println!("  A bare {} argument is the same as {}.", output::arg("<file>.em"), output::command("run"));
    println!();
    println!("{}", output::section_header("Run options:"));
    println!("  {} {}  Collect when more than N objects are live", output::arg("--gc-threshold"), output::arg("N"));
    println!("  {}        Print collector statistics to stderr on exit", output::arg("--gc-stats"));
    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}  Default for --gc-threshold", output::arg("EMBER_GC_THRESHOLD"));
    println!("  {}            Log filter, e.g. ember_interp=debug", output::arg("RUST_LOG"));
    println!("  {}            Disable colored output", output::arg("NO_COLOR"));
}
