mod api;
mod cmd;
mod error;
mod spinner;

fn main() {
    if let Err(err) = cmd::run() {
        eprintln!("ERROR: {:#}", err);
        std::process::exit(1);
    }
}
