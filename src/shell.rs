use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::{self, GenConfig};
use crate::generate::{self, GenSummary};
use crate::run::{self, HeapKind};

const DATA_DIR: &str = "data";
const CONFIG_DIR: &str = "config";

/// Runs the interactive shell until `exit` or end of input.
pub fn run() -> io::Result<()> {
    println!("\n==================\n=   heapbench    =\n==================");
    print_help(None);
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.to_lowercase();
        let args: Vec<&str> = line.split_whitespace().collect();
        match args.first() {
            None => {}
            Some(&"exit") => break,
            Some(&"gen") => gen_command(&args),
            Some(&"run") => run_command(&args),
            Some(&"help") => print_help(args.get(1).copied()),
            Some(_) => println!("Invalid command. Type 'help' to show all commands."),
        }
    }
    println!("bye");
    Ok(())
}

/// `gen [config]`: generate a trace into `data/`, using defaults or a
/// config file from `config/`.
fn gen_command(args: &[&str]) {
    let options = if args.len() == 1 {
        GenConfig::default()
    } else {
        let path = Path::new(CONFIG_DIR).join(args[1]);
        if !path.is_file() {
            println!("File not found: {}", path.display());
            return;
        }
        match config::read_config(&path) {
            Ok(options) => options,
            Err(err) => {
                println!("Could not read the config: {}", err);
                return;
            }
        }
    };
    println!("generating...");
    match write_trace(&options) {
        Ok(summary) => display_summary(&summary),
        Err(err) => println!("Could not write the test data: {}", err),
    }
}

fn write_trace(options: &GenConfig) -> io::Result<GenSummary> {
    fs::create_dir_all(DATA_DIR)?;
    let file = File::create(Path::new(DATA_DIR).join(&options.name))?;
    let mut out = BufWriter::new(file);
    let summary = generate::random_trace(&mut out, options, &mut rand::rng())?;
    out.flush()?;
    Ok(summary)
}

fn display_summary(summary: &GenSummary) {
    let total = summary.total.max(1) as f64;
    println!("\n-----Test Composition-----");
    println!("operations {}", summary.total);
    println!("add        {:.2}%", summary.add as f64 / total * 100.0);
    println!("decrease   {:.2}%", summary.dec as f64 / total * 100.0);
    println!("pop min    {:.2}%", summary.pop as f64 / total * 100.0);
    println!("min value  {}", summary.minval);
    println!("max value  {}", summary.maxval);
    println!("--------------------------\n");
}

/// `run {p|f|b} [data]`: time one heap implementation over a trace from
/// `data/`.
fn run_command(args: &[&str]) {
    if args.len() < 2 {
        println!("Invalid options. Type 'help run' for usage.");
        return;
    }
    let kind = match args[1] {
        "p" => HeapKind::Pairing,
        "f" => HeapKind::Fibonacci,
        "b" => HeapKind::Binary,
        _ => {
            println!("Invalid option. Type 'help run' for usage.");
            return;
        }
    };
    let data = Path::new(DATA_DIR).join(args.get(2).copied().unwrap_or("default"));
    if !data.is_file() {
        println!("Test data not found. Use the gen command if you haven't already.");
        return;
    }
    println!("running...");
    match run::trace_time(kind, &data) {
        Ok(elapsed) => println!(
            "\n{} heap runtime: {:.5} s\n",
            kind.label(),
            elapsed.as_secs_f64()
        ),
        Err(err) => println!("Could not run the test: {}", err),
    }
}

fn print_help(command: Option<&str>) {
    match command {
        None => println!(
            "\nCommands\n  \
             gen   Generate test data\n  \
             run   Run a test\n  \
             help  Display this help message\n  \
             exit  Stop testing\n\
             Type 'help <command>' to show more details.\n"
        ),
        Some("gen") => println!(
            "\nGenerate test data\n  \
             usage: gen [config]\n  \
             Where [config] is the name of the config file,\n  \
             located in the config/ directory. Omit to use\n  \
             default values.\n"
        ),
        Some("run") => println!(
            "\nMeasure a heap's runtime\n  \
             usage: run <heap> [data]\n  \
             Where <heap> is one of the following:\n    \
             p -> pairing heap\n    \
             f -> Fibonacci heap\n    \
             b -> binary heap\n  \
             And [data] is the name of the test data file,\n  \
             located in the data/ directory. Omit to use\n  \
             the default data file.\n"
        ),
        Some("help") => println!(
            "\nDisplay command information\n  \
             usage: help [command]\n  \
             Where [command] is the command to get help for.\n  \
             Omit [command] to display all commands.\n"
        ),
        Some("exit") => println!("\nExit this application\n  usage: exit\n"),
        Some(_) => println!("Unrecognized command. Type 'help' to show all commands."),
    }
}
