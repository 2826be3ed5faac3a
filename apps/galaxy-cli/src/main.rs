//! `galaxy` — standalone binary entry point.
//!
//! A thin wrapper around [`galaxy_cli::run_cli`], handling error
//! display and exit codes. All command logic lives in the library
//! crate for testability.

fn main() {
    env_logger::init();
    if let Err(e) = galaxy_cli::run_cli() {
        if e.kind() == galaxy_base::ErrorKind::Remote {
            log::warn!("remote exchange failed, not retrying: {}", e);
        }
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
