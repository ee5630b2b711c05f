//! pidcuts: apply a PID cut configuration to a sample of tracks
//!
//! Usage: `pidcuts [config-file]`, the configuration file defaulting to
//! `pidcuts.cfg`. The configuration summary and the cut statistics are
//! printed on stdout, and a statistics report is written to `pidcuts.stats`.
//! Set `RUST_LOG` to see what the PID cuts are doing.

#![warn(missing_docs)]

mod config;
mod output;
mod sample;

use eyre::WrapErr;
use pidcuts::{scheduling, selector::PidSelector, MemorySink};

use crate::{config::Configuration, sample::SampleResponse};

use std::{env, time::Instant};

/// We'll use eyre's type-erased result type throughout the application
type Result<T> = eyre::Result<T>;

/// Name under which the diagnostics are accounted
const SELECTOR_NAME: &str = "PIDCuts";

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    env_logger::init();

    // ### CONFIGURATION READOUT ###

    let config_file = env::args().nth(1).unwrap_or_else(|| "pidcuts.cfg".to_owned());
    let cfg = Configuration::load(&config_file).wrap_err("Failed to load the configuration")?;
    let tracks = sample::load_tracks(&cfg.tracks_path).wrap_err("Failed to load the tracks")?;

    // ### SELECTOR INITIALIZATION ###

    let mut selector = PidSelector::<SampleResponse, MemorySink>::with_diagnostics(
        SELECTOR_NAME,
        cfg.target,
        cfg.cut_number,
        cfg.qa_level,
        MemorySink::new(),
    );
    *selector.configuration_mut() = cfg.cuts()?;
    selector
        .init(Some(SampleResponse), cfg.on_the_fly_mc)
        .wrap_err("Failed to initialize the PID cuts")?;
    selector.notify_period(&cfg.period);

    // ### SELECTION ###

    // NOTE: The clock starts after configuration I/O, to avoid IO-induced
    //       timing fluctuations
    let saved_time = Instant::now();
    let decisions = scheduling::run_selection(&mut selector, &tracks);
    let elapsed_time = saved_time.elapsed();

    // ### RESULTS DISPLAY AND STORAGE ###

    let num_accepted = decisions.iter().filter(|&&accepted| accepted).count();
    log::info!(
        "{} of {} tracks accepted, {} observations recorded",
        num_accepted,
        tracks.len(),
        selector.recorder().sink().samples().len()
    );
    output::dump_results(&selector, decisions.len(), num_accepted, elapsed_time)
        .wrap_err("Failed to output the results")?;

    // ...and we're done
    Ok(())
}
