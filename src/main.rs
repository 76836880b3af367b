use std::process::exit;

fn main() {
    if let Err(err) = heapbench::shell::run() {
        eprintln!("{}", err);
        exit(1);
    }
}
