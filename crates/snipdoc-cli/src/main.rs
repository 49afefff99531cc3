//! SnipDoc CLI - Normalize, check, and inspect HTML fragments
//!
//! Usage:
//!   sdcli [OPTIONS] <FILE>
//!
//! Commands:
//!   convert   Round-trip a fragment and print the normalized result (default)
//!   check     Report the repairs error recovery had to make
//!   stats     Show fragment statistics

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use env_logger::{Builder, Env};
use serde::Serialize;
use snipdoc_core::{Handle, NodeData, SnippetDocument};

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = parse_args(args)?;
    init_logger(config.verbose);

    let input = read_input(&config.file)?;

    let mut doc = SnippetDocument::new();
    doc.load_bytes(&input);

    match config.command {
        Command::Convert => cmd_convert(&doc, &config),
        Command::Check => cmd_check(&doc, &config),
        Command::Stats => cmd_stats(&doc, &config, &input),
    }
}

#[derive(Debug)]
struct Config {
    command: Command,
    file: String,
    format: OutputFormat,
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Convert,
    Check,
    Stats,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut command = Command::Convert;
    let mut format = OutputFormat::Text;
    let mut verbose = false;
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("sdcli {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-j" | "--json" => format = OutputFormat::Json,
            "convert" => command = Command::Convert,
            "check" => command = Command::Check,
            "stats" => command = Command::Stats,
            // A lone "-" means stdin, not an option.
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => {
                if file.is_some() {
                    return Err("multiple files specified".to_string());
                }
                file = Some(arg.clone());
            }
        }
        i += 1;
    }

    let file = file.ok_or_else(|| "no input file specified".to_string())?;

    Ok(Config {
        command,
        file,
        format,
        verbose,
    })
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default)).init();
}

fn read_input(file: &str) -> Result<Vec<u8>, String> {
    if file == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        Ok(buf)
    } else {
        fs::read(file).map_err(|e| format!("failed to read '{}': {}", file, e))
    }
}

fn print_help() {
    eprintln!(
        r#"sdcli - HTML fragment normalizer and inspector

USAGE:
    sdcli [OPTIONS] [COMMAND] <FILE>

COMMANDS:
    convert     Round-trip a fragment and print the normalized result (default)
    check       Report the repairs error recovery had to make
    stats       Show fragment statistics

OPTIONS:
    -v, --verbose    Enable debug-level log output (stats: dump the tree)
    -j, --json       Output in JSON format
    -h, --help       Print help information
    -V, --version    Print version information

EXAMPLES:
    sdcli snippet.html          Normalize a fragment
    sdcli - < snippet.html      Read the fragment from stdin
    sdcli -j snippet.html       Emit the result as JSON with diagnostics
    sdcli check snippet.html    Exit non-zero if any repairs were needed
    sdcli stats snippet.html    Show fragment statistics
"#
    );
}

// =============================================================================
// Convert Command
// =============================================================================

fn cmd_convert(doc: &SnippetDocument, config: &Config) -> Result<(), String> {
    let diagnostics = doc.parse_errors();

    // Report repairs without polluting stdout
    for diagnostic in diagnostics.iter() {
        eprintln!("warning: {}", diagnostic);
    }

    let output = doc.serialize().map_err(|e| e.to_string())?;

    match config.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "html": output,
                "diagnostics": diagnostics,
            });
            println!("{}", payload);
        }
        OutputFormat::Text => println!("{}", output),
    }

    Ok(())
}

// =============================================================================
// Check Command
// =============================================================================

fn cmd_check(doc: &SnippetDocument, config: &Config) -> Result<(), String> {
    let diagnostics = doc.parse_errors();

    if diagnostics.is_empty() {
        if matches!(config.format, OutputFormat::Json) {
            println!(r#"{{"clean": true, "diagnostics": []}}"#);
        } else {
            println!("Clean: no repairs needed");
        }
        Ok(())
    } else {
        let count = diagnostics.len();
        if matches!(config.format, OutputFormat::Json) {
            println!(
                "{}",
                serde_json::json!({"clean": false, "diagnostics": diagnostics})
            );
        } else {
            eprintln!("Repaired: {} recovery action(s)", count);
            for diagnostic in diagnostics.iter() {
                eprintln!("  - {}", diagnostic);
            }
        }
        Err(format!("{} recovery action(s) needed", count))
    }
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(doc: &SnippetDocument, config: &Config, input: &[u8]) -> Result<(), String> {
    let content = doc.content_root().map_err(|e| e.to_string())?;
    let output = doc.serialize().map_err(|e| e.to_string())?;
    let diagnostics = doc.parse_errors();
    let text = String::from_utf8_lossy(input);

    let mut stats = FragmentStats {
        input_bytes: input.len(),
        input_words: text.split_whitespace().count(),
        input_lines: text.lines().count(),
        output_chars: output.chars().count(),
        repairs: diagnostics.len(),
        ..FragmentStats::default()
    };
    for child in content.children.borrow().iter() {
        collect_node_stats(child, 1, &mut stats);
    }

    if matches!(config.format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&stats).unwrap());
        return Ok(());
    }

    println!("Fragment Statistics");
    println!("-------------------");
    println!("Input:");
    println!("  Bytes:          {}", stats.input_bytes);
    println!("  Words (est.):   {}", stats.input_words);
    println!("  Lines:          {}", stats.input_lines);
    println!();
    println!("Tree:");
    println!("  Elements:       {}", stats.elements);
    println!("  Text nodes:     {}", stats.text_nodes);
    println!("  Comments:       {}", stats.comments);
    println!("  Attributes:     {}", stats.attributes);
    println!("  Max depth:      {}", stats.max_depth);
    println!("  Text chars:     {}", stats.text_chars);
    println!();
    println!("Output:");
    println!("  Chars:          {}", stats.output_chars);
    println!();
    println!("Repairs:        {}", stats.repairs);

    if config.verbose {
        println!();
        println!("--- Tree ---");
        for child in content.children.borrow().iter() {
            print_tree(child, 0);
        }
    }

    Ok(())
}

#[derive(Default, Serialize)]
struct FragmentStats {
    input_bytes: usize,
    input_words: usize,
    input_lines: usize,
    elements: usize,
    text_nodes: usize,
    comments: usize,
    attributes: usize,
    max_depth: usize,
    text_chars: usize,
    output_chars: usize,
    repairs: usize,
}

fn collect_node_stats(node: &Handle, depth: usize, stats: &mut FragmentStats) {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            stats.elements += 1;
            stats.attributes += attrs.borrow().len();
            stats.max_depth = stats.max_depth.max(depth);
        }
        NodeData::Text { contents } => {
            stats.text_nodes += 1;
            stats.text_chars += contents.borrow().chars().count();
        }
        NodeData::Comment { .. } => stats.comments += 1,
        _ => {}
    }

    for child in node.children.borrow().iter() {
        collect_node_stats(child, depth + 1, stats);
    }
}

// =============================================================================
// Tree Output
// =============================================================================

fn print_tree(node: &Handle, indent: usize) {
    let prefix = "  ".repeat(indent);

    match &node.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs.borrow();
            if attrs.is_empty() {
                println!("{}<{}>", prefix, name.local);
            } else {
                let formatted: Vec<String> = attrs
                    .iter()
                    .map(|attr| format!("{}=\"{}\"", attr.name.local, attr.value))
                    .collect();
                println!("{}<{} {}>", prefix, name.local, formatted.join(" "));
            }
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            let preview: String = text.chars().take(40).collect();
            let ellipsis = if text.chars().count() > 40 { "..." } else { "" };
            println!("{}{:?}{}", prefix, preview, ellipsis);
        }
        NodeData::Comment { contents } => {
            println!("{}<!-- {} -->", prefix, contents);
        }
        _ => {}
    }

    for child in node.children.borrow().iter() {
        print_tree(child, indent + 1);
    }
}
