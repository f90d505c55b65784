fn main() {
    if let Err(err) = device_outages::app::run() {
        eprintln!("application startup failed: {err}");
        std::process::exit(1);
    }
}
