fn main() {
    if let Err(err) = device_outages::app::run_export() {
        eprintln!("outage export failed: {err}");
        std::process::exit(1);
    }
}
