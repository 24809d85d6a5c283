//! vdata CLI - Tool for inspecting vertex data stream files.

use std::env;
use std::path::Path;
use std::process;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vertex_data::core::{Data, Object, SharedData};
use vertex_data::io::{self, ObjectFactory};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    match filtered_args[0] {
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: vdata info <file.vdata>");
                process::exit(1);
            }
            cmd_info(filtered_args[1]);
        }

        "copy" | "c" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: vdata copy <input.vdata> <output.vdata>");
                process::exit(1);
            }
            cmd_copy(filtered_args[1], filtered_args[2]);
        }

        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0]);
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                process::exit(1);
            }
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by flags.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_help() {
    println!("vdata - vertex data stream toolkit");
    println!();
    println!("USAGE:");
    println!("    vdata [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>              Show root objects and their layouts");
    println!("    c, copy   <in> <out>          Read and re-write a stream file");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (every stream field)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    vdata info mesh.vdata");
    println!("    vdata -vv info mesh.vdata > /dev/null");
    println!("    vdata copy mesh.vdata out.vdata");
}

fn load(path: &str) -> Vec<Option<SharedData>> {
    info!("Opening {}", path);
    match io::read_file(path, &ObjectFactory::new()) {
        Ok(roots) => roots,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    let roots = load(path);
    debug!("Read {} root objects", roots.len());

    println!("File: {}", path);
    println!("Roots: {}", roots.len());
    println!();

    let mut total_bytes = 0usize;
    for (i, root) in roots.iter().enumerate() {
        let Some(root) = root else {
            println!("  [{}] <unreadable>", i);
            continue;
        };
        let data = root.read();
        let layout = data.layout();
        total_bytes += data.data_size();
        println!("  [{}] {}", i, data.class_name());
        println!("      values:  {} x {} bytes", data.value_count(), data.value_size());
        println!("      bytes:   {}", data.data_size());
        println!("      format:  {}  stride: {}", layout.format, layout.stride);
        if layout.has_mipmaps() {
            println!("      mipmaps: {}", layout.max_num_mipmaps);
        }
        if data.dimensions() > 1 {
            println!("      extent:  {}x{}x{}", data.width(), data.height(), data.depth());
        }
    }
    println!();
    println!("Total data: {} bytes", total_bytes);
}

fn cmd_copy(input: &str, output: &str) {
    let roots = load(input);
    let readable: Vec<SharedData> = roots.into_iter().flatten().collect();

    info!("Writing {} root objects to {}", readable.len(), output);
    if let Err(e) = io::write_file(output, &readable) {
        eprintln!("Failed to write {}: {}", output, e);
        process::exit(1);
    }
    println!("Copied {} root objects to {}", readable.len(), output);
}
