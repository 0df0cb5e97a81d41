use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Sample period of the recorded trace in seconds (40 Hz).
pub const DEFAULT_SAMPLE_PERIOD: f64 = 25e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Raw,       // 0: raw sensor value
    Processed, // 1: processed trace
    Bpm,       // 2: derived beats per minute
    Ibi,       // 3: derived inter-beat interval
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Raw,
        Channel::Processed,
        Channel::Bpm,
        Channel::Ibi,
    ];

    /// Column position inside the signal table.
    pub fn column(self) -> usize {
        match self {
            Channel::Raw => 0,
            Channel::Processed => 1,
            Channel::Bpm => 2,
            Channel::Ibi => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Raw => "raw",
            Channel::Processed => "processed",
            Channel::Bpm => "BPM",
            Channel::Ibi => "IBI",
        }
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Channel::Raw),
            "processed" => Ok(Channel::Processed),
            "bpm" | "BPM" => Ok(Channel::Bpm),
            "ibi" | "IBI" => Ok(Channel::Ibi),
            _ => Err(format!(
                "Invalid channel: {}. Use one of raw, processed, BPM or IBI",
                s
            )),
        }
    }
}

/// Explore a recorded heartbeat trace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Whitespace-delimited file with raw, processed, BPM and IBI columns
    #[arg(long, env = "HEARTBEAT_DATA", default_value = "heartbeat_data.dat")]
    pub input: PathBuf,

    /// Time between consecutive rows in seconds
    #[arg(long, default_value_t = DEFAULT_SAMPLE_PERIOD)]
    pub sample_period: f64,

    /// Write the resulting series to this CSV file instead of stdout
    #[arg(long)]
    pub csv_output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Channel and optional time window, in seconds, shared by most commands
#[derive(ClapArgs, Debug, Clone)]
pub struct Selection {
    /// Channel to analyse (raw, processed, BPM, IBI)
    #[arg(long, default_value = "processed")]
    pub channel: Channel,

    /// Window start in seconds (inclusive)
    #[arg(long)]
    pub start: Option<f64>,

    /// Window end in seconds (inclusive)
    #[arg(long)]
    pub end: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the selected channel against time
    Show {
        #[command(flatten)]
        selection: Selection,
    },

    /// Zero-phase Butterworth high-pass of the full channel, then windowed
    Highpass {
        #[command(flatten)]
        selection: Selection,

        /// Cut-off frequency in Hz
        #[arg(long, default_value = "0.001")]
        cutoff_hz: f64,

        /// Filter order
        #[arg(long, default_value = "4")]
        order: usize,
    },

    /// FFT magnitude of the selected window
    Fft {
        #[command(flatten)]
        selection: Selection,
    },

    /// Zero the head and remove a linear trend from the tail of the window
    Detrend {
        #[command(flatten)]
        selection: Selection,

        /// Cut-off as a sample index relative to the window start
        #[arg(long, conflicts_with = "cutoff_time")]
        cutoff_index: Option<usize>,

        /// Cut-off as an absolute time in seconds
        #[arg(long)]
        cutoff_time: Option<f64>,

        /// Value written over the samples before the cut-off
        #[arg(long, default_value = "0.0")]
        replacement: f64,
    },

    /// Per-channel sample counts and ranges
    Summary,
}
