use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "masterify", about = "Preset-driven audio mastering")]
pub struct Cli {
    /// Input audio files (WAV, MP3, FLAC, OGG, AAC)
    pub inputs: Vec<PathBuf>,

    /// Output file (single input only). Defaults to <stem>_mastered_<preset>.<format>
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Mastering preset
    #[arg(short, long, default_value = "masterify_v1")]
    pub preset: String,

    /// Output bitrate (e.g. 192k). Overrides the preset bitrate.
    #[arg(short, long)]
    pub bitrate: Option<String>,

    /// Title tag. Defaults to the input file name.
    #[arg(long)]
    pub title: Option<String>,

    /// Write a waveform digest of each output as JSON next to it
    #[arg(long)]
    pub waveform: bool,

    /// Number of points in the waveform digest
    #[arg(long, default_value_t = 1000)]
    pub waveform_points: usize,

    /// Reference track to match instead of running the stage chain
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Directory holding system reference tracks
    #[arg(long, default_value = "references")]
    pub references_dir: PathBuf,

    /// Output container when --output is not given
    #[arg(long, default_value = "mp3")]
    pub format: String,

    /// List available presets and exit
    #[arg(long)]
    pub list_presets: bool,

    /// Print a suggested preset for each input and exit
    #[arg(long)]
    pub suggest: bool,

    /// Download configured reference tracks and exit
    #[arg(long)]
    pub fetch_references: bool,

    /// Config file (defaults to masterify.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Files mastered in parallel (0 = one per core)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
