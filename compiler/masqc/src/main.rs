//! masq command-line interface.

use masq_diagnostic::ErrorCode;
use masqc::cli::{parse_anonymize_options, run_anonymize};
use masqc::BatchOutput;

fn main() {
    masqc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "anonymize" => {
            let options = match parse_anonymize_options(&args[2..]) {
                Ok(options) => options,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!();
                    print_anonymize_usage();
                    std::process::exit(1);
                }
            };

            match run_anonymize(&options) {
                Ok(output) => {
                    report(&output);
                    if output.has_errors() {
                        std::process::exit(1);
                    }
                }
                Err(err) => {
                    match err.to_diagnostic() {
                        Some(diag) => eprintln!("{diag}"),
                        None => eprintln!("error: {err}"),
                    }
                    std::process::exit(1);
                }
            }
        }
        "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: masq explain <code>");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("masq {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn report(output: &BatchOutput) {
    let preview = output.preview;
    for diag in &output.diagnostics {
        eprintln!("{diag}");
    }
    if output.suppressed_warnings > 0 {
        eprintln!(
            "{} more warning{} not shown",
            output.suppressed_warnings,
            if output.suppressed_warnings == 1 { "" } else { "s" }
        );
    }

    if preview {
        for entry in &output.entries {
            println!(
                "{:<30} -> {:<30} {} ({} occurrence{})",
                entry.original,
                entry.replacement,
                entry.category,
                entry.occurrences,
                if entry.occurrences == 1 { "" } else { "s" }
            );
        }
    }

    println!(
        "{} file{} in order, {} rewritten, {} failed, {} mapping{}, {} degraded overlay{}{}",
        output.order.len(),
        if output.order.len() == 1 { "" } else { "s" },
        output.files.len(),
        output.failed.len(),
        output.entries.len(),
        if output.entries.len() == 1 { "" } else { "s" },
        output.degraded_overlays,
        if output.degraded_overlays == 1 { "" } else { "s" },
        if preview { " (preview)" } else { "" }
    );
}

fn explain_error(code_str: &str) {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX (errors) or WXXXX (warnings) where X is a digit.");
        eprintln!(
            "Known codes: {}",
            ErrorCode::ALL.map(|c| c.as_str()).join(", ")
        );
        std::process::exit(1);
    };

    let kind = if code.is_warning() {
        "warning, the file is still rewritten"
    } else if code.is_batch_fatal() {
        "error, the whole batch stops before anything is written"
    } else {
        "error, the affected file is left out of the output"
    };
    println!("{code}: {} ({kind})", code.description());
}

fn print_anonymize_usage() {
    eprintln!("Usage: masq anonymize <file-or-dir> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o <dir>, --out=<dir>      Output directory (default: masq-out)");
    eprintln!("  --strategy=<name>          Naming strategy: counter, vocabulary");
    eprintln!("  --preview, -n              Show the mapping without writing files");
    eprintln!("  --retries=<n>              Candidates per identifier (default: 64)");
    eprintln!("  --overlay-scope=<scope>    Overlay target lookup: batch, file");
    eprintln!("  --max-warnings=<n>         Warnings to report (default: 0, no limit)");
    eprintln!("  --never-rename=<A,B,...>   Identifiers to keep unchanged");
    eprintln!("  --config=<file.json>       Read options from a JSON file");
    eprintln!("  --state=<file>             Mapping state (default: <out>/masq.state)");
}

fn print_usage() {
    println!("masq - fixed-format source anonymizer");
    println!();
    println!("Usage: masq <command> [options]");
    println!();
    println!("Commands:");
    println!("  anonymize <file-or-dir>   Rewrite sources with anonymized names");
    println!("  explain <code>            Describe a diagnostic code");
    println!("  help                      Show this help message");
    println!("  version                   Show version information");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=debug) to trace the pipeline.");
}
