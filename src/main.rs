fn main() {
    if let Err(err) = dashgen::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
