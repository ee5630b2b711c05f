//! This module is in charge of outputting the final selection results to the
//! standard output and to disk

use crate::Result;

use pidcuts::{
    numeric::{reals, Float},
    qa::ObservationSink,
    CutKind, PidResponse, PidSelector,
};

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Duration,
};

/// Name of the statistics report
const STATS_FILE_NAME: &str = "pidcuts.stats";

// Number of significant digits in file output
const SIG_DIGITS: usize = (reals::DIGITS - 1) as usize;

/// Output the selection results to the console and to disk
pub fn dump_results<R: PidResponse, S: ObservationSink>(
    selector: &PidSelector<R, S>,
    num_tracks: usize,
    num_accepted: usize,
    elapsed_time: Duration,
) -> Result<()> {
    // Print out the configuration and statistics on stdout
    print!("{}", selector.configuration());
    println!("Statistics of {}:", selector.recorder().bucket());
    print!("{}", selector.recorder().statistics());

    // Compute a timestamp of when the run ended
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;

    // Write the statistics report
    let mut stats_file = BufWriter::new(File::create(STATS_FILE_NAME)?);
    write_stats(
        &mut stats_file,
        &timestamp,
        selector,
        num_tracks,
        num_accepted,
        elapsed_time,
    )?;
    stats_file.flush()?;

    // ...and we're done
    Ok(())
}

/// Write the statistics report
///
/// Track counts come from the selection itself. The cut statistics only feed
/// the per-kind rows, as they stay empty when QA is disabled.
///
fn write_stats<R: PidResponse, S: ObservationSink>(
    stats_file: &mut impl Write,
    timestamp: &str,
    selector: &PidSelector<R, S>,
    num_tracks: usize,
    num_accepted: usize,
    elapsed_time: Duration,
) -> io::Result<()> {
    let statistics = selector.recorder().statistics();
    writeln_3p(stats_file, timestamp)?;
    writeln_3p(stats_file, "---------------------------------------------")?;
    writeln_3p(stats_file, ("Accounting bucket", selector.recorder().bucket()))?;
    writeln_3p(stats_file, ("Period", selector.period().unwrap_or("none")))?;
    writeln_3p(stats_file, ("Cuts string", &selector.configuration().cuts_string()[..]))?;
    writeln_3p(stats_file, ("QA level", &format!("{:?}", selector.recorder().level())[..]))?;
    writeln_3p(stats_file, "---------------------------------------------")?;
    writeln_3p(stats_file, ("Number of tracks", num_tracks))?;
    writeln_3p(stats_file, ("... rejected", num_tracks - num_accepted))?;
    writeln_3p(stats_file, ("... accepted", num_accepted))?;
    if num_tracks > 0 {
        let acceptance = num_accepted as Float / num_tracks as Float;
        writeln_3p(stats_file, ("Acceptance", acceptance))?;
    }
    writeln_3p(stats_file, "---------------------------------------------")?;
    for kind in CutKind::ALL {
        writeln_3p(stats_file, (kind.name(), statistics.fired(kind)))?;
    }
    writeln_3p(stats_file, "---------------------------------------------")?;
    for first in CutKind::ALL {
        for second in CutKind::ALL.iter().filter(|k| k.index() >= first.index()) {
            writeln!(
                stats_file,
                "{:>3}{:>3}{:>12}",
                first.index(),
                second.index(),
                statistics.co_fired(first, *second)
            )?;
        }
    }
    writeln_3p(stats_file, "---------------------------------------------")?;
    let elapsed_secs = elapsed_time.as_secs_f64() as Float;
    writeln_3p(stats_file, ("Elapsed time (s)", elapsed_secs))?;
    if num_tracks > 0 {
        let secs_per_track = elapsed_secs / num_tracks as Float;
        writeln_3p(stats_file, ("Elapsed time per track (s)", secs_per_track))?;
    }
    Ok(())
}

/// Text output facility for the statistics report
fn writeln_3p(file: &mut impl Write, data: impl Write3p) -> io::Result<()> {
    write!(file, " ")?;
    data.write(file)?;
    writeln!(file)
}

/// Trait implemented by things which can be printed in the report style
trait Write3p: Sized {
    /// Write down `self` to the output file using the report style
    fn write(self, file: &mut impl Write) -> io::Result<()>;
}

impl Write3p for &str {
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{}", self)
    }
}

impl Write3p for usize {
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{}", self)
    }
}

impl Write3p for u64 {
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{}", self)
    }
}

impl Write3p for Float {
    // Close approximation of printf's %g
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write_engineering(file, self, SIG_DIGITS)
    }
}

impl<T: Write3p> Write3p for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{:<31}: ", self.0)?;
        self.1.write(file)
    }
}

/// Write a floating-point number using "engineering" notation
///
/// Analogous to the %g format of the C printf function, this switches
/// between naive and scientific notation depending on the magnitude of the
/// number being printed.
///
fn write_engineering(writer: &mut impl Write, x: Float, sig_digits: usize) -> io::Result<()> {
    let mut precision = sig_digits - 1;
    if x == 0. {
        // Zero is special because you can't take its log
        write!(writer, "0")
    } else {
        let log_x = x.abs().log10();
        if log_x >= -3. && log_x <= (sig_digits as Float) {
            // Rust's precision counts digits after the decimal point, adjust
            // it to keep a constant number of significant digits
            precision = (precision as isize - log_x.trunc() as isize) as usize;
            if log_x < 0. {
                precision += 1
            }

            // No trailing zeros or decimal point in naive notation
            let str_with_zeros = format!("{:.1$}", x, precision);
            if str_with_zeros.contains('.') {
                write!(
                    writer,
                    "{}",
                    str_with_zeros.trim_end_matches('0').trim_end_matches('.')
                )
            } else {
                write!(writer, "{}", str_with_zeros)
            }
        } else {
            write!(writer, "{:.1$e}", x, precision)
        }
    }
}
