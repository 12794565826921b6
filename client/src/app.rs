use crate::settings::Settings;
use crate::tui;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sim::{Savannah, TickControl, TickReport};

pub fn run(settings: Settings) -> Result<()> {
    let registry = settings.registry()?;
    let mut savannah =
        Savannah::new(settings.config.clone(), registry).context("Failed to set up the savannah")?;

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let placed = savannah.seed(&mut rng);
    tracing::info!(
        width = savannah.board.width(),
        height = savannah.board.height(),
        species = savannah.registry.len(),
        placed,
        "Savannah ready"
    );

    match settings.headless {
        Some(ticks) => {
            let summary = run_headless(&mut savannah, &mut rng, ticks);
            tracing::info!(
                ticks = summary.ticks,
                births = summary.births,
                deaths = summary.deaths,
                population = summary.population,
                "Headless run completed"
            );
            Ok(())
        }
        None => tui::run(&mut savannah, &mut rng, settings.tick),
    }
}

/// Totals over a headless run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub births: usize,
    pub deaths: usize,
    pub population: usize,
}

impl RunSummary {
    fn record(&mut self, report: &TickReport) {
        self.ticks = report.tick;
        self.births += report.births;
        self.deaths += report.deaths;
        self.population = report.population;
    }
}

/// Tick without a terminal, logging every report; stops early once
/// everything has died
pub fn run_headless(savannah: &mut Savannah, rng: &mut StdRng, ticks: u64) -> RunSummary {
    let mut summary = RunSummary {
        population: savannah.population.len(),
        ..Default::default()
    };

    for _ in 0..ticks {
        let (report, control) = savannah.tick(rng, None);
        tracing::info!(
            tick = report.tick,
            births = report.births,
            deaths = report.deaths,
            pairs = report.pairs_formed,
            population = report.population,
            "tick"
        );
        summary.record(&report);

        if control == TickControl::Quit || report.population == 0 {
            break;
        }
    }

    summary
}
