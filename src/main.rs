fn main() {
    if let Err(err) = radial_labels::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
