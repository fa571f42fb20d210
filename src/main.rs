mod app;
mod auth;
mod catalog;
mod cli;
mod config;
mod db;
mod domain;
mod errors;
mod geocoding;
mod isochrone;
mod responses;
mod router;
mod server;
mod services;
mod telemetry;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
