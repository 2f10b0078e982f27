fn main() {
    if let Err(err) = corkboard::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
