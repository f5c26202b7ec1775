// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Program execution.

use std::process;

use ember_interp::{HeapStats, InterpConfig, Interpreter};
use tracing::debug;

use crate::{read_source, show_error, RunOptions};

pub fn cmd_run(path: &str, opts: RunOptions) {
    let source = read_source(path);
    let Some(stmts) = super::phase::frontend(path, &source) else {
        process::exit(1);
    };

    let mut config = InterpConfig::from_env();
    if let Some(n) = opts.gc_threshold {
        config = config.with_gc_threshold(n);
    }

    let mut interp = Interpreter::with_config(config);
    debug!(path, config = ?interp.config(), statements = stmts.len(), "run");
    let result = interp.interpret(&stmts);

    if opts.gc_stats {
        print_stats(&interp.heap_stats());
    }

    if let Err(diag) = result {
        show_error(path, &source, diag.span, &diag.error.to_string(), diag.error.hint());
        process::exit(1);
    }
}

fn print_stats(stats: &HeapStats) {
    eprintln!(
        "gc: {} collection{}, {} freed ({} in the last), {} live, threshold {}",
        stats.collections,
        if stats.collections == 1 { "" } else { "s" },
        stats.objects_freed,
        stats.last_freed,
        stats.live,
        stats.threshold,
    );
}
