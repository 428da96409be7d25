use addrspace::{
    cli::shell::run_shell,
    sim::{
        config::SimConfig,
        driver::Simulation,
        logging::{LogFormat, init_tracing},
    },
};
use anyhow::Context;
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <simulate [config.json] | shell [capacity]>", args[0]);
        std::process::exit(1);
    }
    let format: LogFormat = std::env::var("ADDRSPACE_LOG_FORMAT")
        .unwrap_or_default()
        .parse()
        .unwrap_or_default();
    init_tracing(format)?;

    match args[1].as_str() {
        "simulate" => {
            let config = match args.get(2) {
                Some(path) => SimConfig::from_path(path)?,
                None => SimConfig {
                    pace_ms: 1500,
                    ..SimConfig::default()
                },
            };
            println!(
                "Watching {} units over {} days",
                config.capacity, config.days
            );
            let mut sim = Simulation::new(config)?;
            let rt = Runtime::new().context("starting tokio runtime")?;
            let report = rt.block_on(sim.run(&mut std::io::stdout().lock()))?;
            println!(
                "Simulation complete: {} granted, {} denied (empty), {} denied (oversized), {} denied (fragmented), {} releases, {} no-op releases",
                report.granted,
                report.denied_empty,
                report.denied_oversized,
                report.denied_fragmented,
                report.releases,
                report.noop_releases
            );
        }
        "shell" => {
            let capacity = match args.get(2) {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("invalid capacity {:?}", raw))?,
                None => SimConfig::default().capacity,
            };
            run_shell(capacity, SimConfig::default().row_width)?;
        }
        other => {
            eprintln!("Unknown command: {}", other);
            std::process::exit(1);
        }
    }
    Ok(())
}
