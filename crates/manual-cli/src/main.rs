use std::process;

fn main() {
    match manual_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("doc-manual error: {err:#}");
            process::exit(1);
        }
    }
}
