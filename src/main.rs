use clap::Parser;
use paging_sim::config::Config;
use paging_sim::error::Result;
use paging_sim::run_simulation;
use std::io::{self, BufWriter, Write};
use std::process;

fn run(config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = run_simulation(config, &mut out)?;
    write!(out, "{}", summary)?;
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::init();
    let config = Config::parse();
    config.display();
    if let Err(err) = run(&config) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
