use anyhow::{bail, Context, Result};
use clap::Parser;
use heartbeat_explorer::config::{Args, Channel, Command, Selection};
use heartbeat_explorer::data_loading::load_signal_table;
use heartbeat_explorer::spectrum::SpectrumBin;
use heartbeat_explorer::{detrend, filtering, output, spectrum, SignalTable, TimeWindow};
use log::{debug, info};
use std::path::Path;

enum Plot {
    Series {
        x_label: &'static str,
        y_label: String,
        points: Vec<(f64, f64)>,
    },
    Spectrum(Vec<SpectrumBin>),
}

fn window_of(selection: &Selection) -> Result<Option<TimeWindow>> {
    Ok(TimeWindow::from_bounds(selection.start, selection.end)?)
}

fn run_show(table: &SignalTable, selection: &Selection) -> Result<Plot> {
    let series = table.select(selection.channel, window_of(selection)?);
    info!(
        "Selected {} samples of {}",
        series.len(),
        selection.channel.name()
    );
    Ok(Plot::Series {
        x_label: "time",
        y_label: selection.channel.name().to_string(),
        points: series.points().collect(),
    })
}

fn run_highpass(
    table: &SignalTable,
    selection: &Selection,
    cutoff_hz: f64,
    order: usize,
) -> Result<Plot> {
    // Filter the whole channel so the window does not see edge effects
    let full = table.channel(selection.channel).to_vec();
    let filtered = filtering::highpass(&full, cutoff_hz, order, table.sample_rate())
        .with_context(|| format!("Failed to high-pass {}", selection.channel.name()))?;

    let series = table.select_values(&filtered, window_of(selection)?)?;
    Ok(Plot::Series {
        x_label: "time",
        y_label: format!("{}_highpass", selection.channel.name()),
        points: series.points().collect(),
    })
}

fn run_fft(table: &SignalTable, selection: &Selection) -> Result<Plot> {
    let series = table.select(selection.channel, window_of(selection)?);
    let bins = spectrum::fft_magnitude(&series.values, table.sample_period())
        .with_context(|| format!("Failed to transform {}", selection.channel.name()))?;

    Ok(Plot::Spectrum(bins))
}

fn run_detrend(
    table: &SignalTable,
    selection: &Selection,
    cutoff_index: Option<usize>,
    cutoff_time: Option<f64>,
    replacement: f64,
) -> Result<Plot> {
    let series = table.select(selection.channel, window_of(selection)?);

    let cutoff = match (cutoff_index, cutoff_time) {
        (Some(idx), _) => idx,
        (None, Some(t)) => table.window_cutoff(&series, t)?,
        (None, None) => bail!("detrend needs --cutoff-index or --cutoff-time"),
    };
    debug!("Detrend cutoff at window index {}", cutoff);

    let values = detrend::detrend(&series.values, cutoff, replacement)
        .with_context(|| format!("Failed to detrend {}", selection.channel.name()))?;

    Ok(Plot::Series {
        x_label: "time",
        y_label: format!("{}_detrended", selection.channel.name()),
        points: series.times.iter().copied().zip(values).collect(),
    })
}

fn print_summary(table: &SignalTable) {
    println!(
        "{} samples, {:.3} s period, {:.1} s total",
        table.len(),
        table.sample_period(),
        table.duration()
    );
    for channel in Channel::ALL {
        let column = table.channel(channel);
        let min = column.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = column.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let mean = column.mean().unwrap_or(f64::NAN);
        println!(
            "  {:<10} min {:>12.3}  max {:>12.3}  mean {:>12.3}",
            channel.name(),
            min,
            max,
            mean
        );
    }
}

fn write_plot(plot: Plot, csv_output: Option<&Path>) -> Result<()> {
    let rows = match (plot, csv_output) {
        (
            Plot::Series {
                x_label,
                y_label,
                points,
            },
            Some(path),
        ) => output::write_series_csv(path, x_label, &y_label, points)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        (
            Plot::Series {
                x_label,
                y_label,
                points,
            },
            None,
        ) => output::write_series(std::io::stdout().lock(), x_label, &y_label, points)?,
        (Plot::Spectrum(bins), Some(path)) => output::write_records_csv(path, bins)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        (Plot::Spectrum(bins), None) => output::write_records(std::io::stdout().lock(), bins)?,
    };
    debug!("Wrote {} rows", rows);
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    let args = Args::parse();
    let table = load_signal_table(&args.input, args.sample_period)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let plot = match &args.command {
        Command::Show { selection } => run_show(&table, selection)?,
        Command::Highpass {
            selection,
            cutoff_hz,
            order,
        } => run_highpass(&table, selection, *cutoff_hz, *order)?,
        Command::Fft { selection } => run_fft(&table, selection)?,
        Command::Detrend {
            selection,
            cutoff_index,
            cutoff_time,
            replacement,
        } => run_detrend(&table, selection, *cutoff_index, *cutoff_time, *replacement)?,
        Command::Summary => {
            print_summary(&table);
            return Ok(());
        }
    };

    write_plot(plot, args.csv_output.as_deref())
}
