// Main entry point for the life simulator

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use life_simulator::config::SimConfig;
use life_simulator::{Grid, RunOutcome, Session};

#[derive(Debug, Parser)]
#[command(name = "life-simulator", about = "Game of Life on a bounded grid")]
struct Args {
    /// Path to a JSON run config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Rule name (conway, highlife, seeds, day-and-night, life-without-death) or B3/S23 rulestring
    #[arg(long)]
    rule: Option<String>,

    /// Named seed pattern, stamped at the center of the grid
    #[arg(long, conflicts_with = "density")]
    pattern: Option<String>,

    /// Fraction of cells alive at start
    #[arg(long)]
    density: Option<f64>,

    /// Seed for --density, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations to run (default: until Ctrl-C)
    #[arg(long)]
    generations: Option<u64>,

    /// Delay between generations in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// End the run once the grid stops changing
    #[arg(long)]
    stop_when_stable: bool,

    /// Only print the final grid
    #[arg(long, short)]
    quiet: bool,

    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

impl Args {
    fn into_config(self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(rule) = self.rule {
            config.rule = rule;
        }
        if self.pattern.is_some() {
            config.pattern = self.pattern;
            config.density = None;
        }
        if self.density.is_some() {
            config.density = self.density;
            config.pattern = None;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.generations.is_some() {
            config.generations = self.generations;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        config.stop_when_stable |= self.stop_when_stable;
        config.validate()?;
        Ok(config)
    }
}

fn render(out: &mut impl Write, grid: &Grid, generation: u64) -> Result<()> {
    // Clear screen and home the cursor.
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(
        out,
        "Generation {}  population {}",
        generation,
        grid.population()
    )?;
    write!(out, "{grid}")?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(args.log_level)
        .env()
        .init()
        .context("failed to initialise logger")?;
    let quiet = args.quiet;
    let config = args.into_config()?;

    println!("🧬 Life Simulator");
    println!("=================\n");

    let rule = config.rule_kind()?;
    let mut session = Session::new(config.width, config.height, rule.to_rule());
    println!(
        "🔧 {}x{} grid, rule {} ({})",
        config.width,
        config.height,
        rule,
        rule.to_rule()
    );

    if let Some(pattern) = config.pattern()? {
        let origin = pattern.centered(session.grid());
        pattern.place(session.grid_mut(), origin);
        println!("   Pattern: {} at {}", pattern.name, origin);
    } else if let Some(density) = config.density {
        match config.seed {
            Some(seed) => session.randomize_seeded(density, seed)?,
            None => session.randomize(density)?,
        }
        println!("   Random fill: density {density}");
    }
    info!("Initial population {}", session.grid().population());

    let handle = session.stop_handle();
    ctrlc::set_handler(move || handle.stop()).context("failed to install Ctrl-C handler")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = session.run(config.run_options(), |grid, generation| {
        if quiet {
            return Ok(());
        }
        render(&mut out, grid, generation)
    })?;

    if quiet {
        print!("{}", session.grid());
    }
    let reason = match outcome {
        RunOutcome::Finished => "generation limit reached",
        RunOutcome::Stopped => "interrupted",
        RunOutcome::Stable => "grid is stable",
    };
    println!(
        "\n✅ Stopped after {} generations ({reason}); population {}",
        session.generation(),
        session.grid().population()
    );
    Ok(())
}
