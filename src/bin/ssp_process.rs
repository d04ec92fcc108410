use clap::{Parser, ValueEnum};
use humantime::format_duration;
use log::info;
use ssprs_profile::formats::{
    reader_for_path, AsvpWriter, BsvpWriter, CsvWriter, FixedCallbacks, FormatWriter,
};
use ssprs_profile::profile::{Direction, ExtensionOutcome, Profile};
use ssprs_profile::settings::ProcessingSettings;
use std::process::ExitCode;
use std::time::Instant;
use std::{error::Error, path::Path, path::PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    about = "Reduce, extend and thin sound speed casts, then export them",
    long_about = None,
    version = env!("SSPRS_PROFILE_VERSION")
)]
struct Cli {
    /// Input cast file (.asvp or .bsvp)
    input: PathBuf,

    /// JSON file with processing settings
    #[clap(short, long)]
    settings: Option<PathBuf>,

    /// Cast direction to keep
    #[clap(short, long)]
    direction: Option<DirectionArg>,

    /// Thinning tolerance in m/s
    #[clap(short, long)]
    tolerance: Option<f64>,

    /// Deeper cast (.asvp or .bsvp) used to extend the input
    #[clap(short, long)]
    extend: Option<PathBuf>,

    /// Latitude used when the input carries no position
    #[clap(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Longitude used when the input carries no position
    #[clap(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Write the thinned cast as Kongsberg ASVP
    #[clap(long)]
    asvp: Option<PathBuf>,

    /// Append the processed cast to a binary archive
    #[clap(long)]
    bsvp: Option<PathBuf>,

    /// Write the valid processed samples as CSV
    #[clap(long)]
    csv: Option<PathBuf>,

    /// Fail on temperature, salinity or pressure outside the equation domains
    #[clap(long, action)]
    strict: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

fn load_settings(cli: &Cli) -> Result<ProcessingSettings, Box<dyn Error>> {
    let mut settings = match &cli.settings {
        Some(path) => ProcessingSettings::from_json_file(path)?,
        None => ProcessingSettings::default(),
    };
    if let Some(direction) = cli.direction {
        settings.ssp_up_or_down = direction.into();
    }
    if let Some(tolerance) = cli.tolerance {
        settings.thin_tolerance = tolerance;
    }
    if cli.strict {
        settings.strict_domain_checks = true;
    }
    settings.validate()?;
    Ok(settings)
}

/// `path` itself for a single cast, `stem_<idx>.ext` otherwise.
fn output_path(path: &Path, idx: usize, total: usize) -> PathBuf {
    if total < 2 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, idx, ext.to_string_lossy()),
        None => format!("{}_{}", stem, idx),
    };
    path.with_file_name(name)
}

fn load_extender(
    path: &Path,
    settings: &ProcessingSettings,
    callbacks: &mut FixedCallbacks,
) -> Result<Profile, Box<dyn Error>> {
    let profiles = reader_for_path(path)?.read(path, settings, callbacks)?;
    let mut extender = profiles
        .current()
        .ok_or_else(|| format!("{}: no casts found", path.display()))?
        .clone();
    extender.clone_data_to_proc()?;
    Ok(extender)
}

fn process(
    profile: &mut Profile,
    settings: &ProcessingSettings,
    extender: Option<&Profile>,
) -> Result<(), Box<dyn Error>> {
    profile.reduce_up_down(settings.ssp_up_or_down)?;
    profile.clone_data_to_proc()?;
    if let Some(extender) = extender {
        match profile.extend_profile(extender, settings.extension_source)? {
            ExtensionOutcome::Extended { added } => info!("Extension added {} samples", added),
            ExtensionOutcome::NoExtension => info!("Extension not applied"),
        }
    }
    profile.clone_proc_to_sis();
    profile.thin(settings.thin_tolerance)?;
    Ok(())
}

fn entrypoint() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let now = Instant::now();
    let settings = load_settings(&cli)?;
    let mut callbacks = FixedCallbacks {
        location: cli.latitude.zip(cli.longitude),
        date: None,
    };
    let mut profiles = reader_for_path(&cli.input)?.read(&cli.input, &settings, &mut callbacks)?;
    let extender = match &cli.extend {
        Some(path) => Some(load_extender(path, &settings, &mut callbacks)?),
        None => None,
    };

    let total = profiles.len();
    for (idx, profile) in profiles.iter_mut().enumerate() {
        process(profile, &settings, extender.as_ref())?;
        if let Some(path) = &cli.asvp {
            AsvpWriter.write(profile, &output_path(path, idx, total))?;
        }
        if let Some(path) = &cli.csv {
            CsvWriter.write(profile, &output_path(path, idx, total))?;
        }
        if let Some(path) = &cli.bsvp {
            BsvpWriter.write(profile, path)?;
        }
    }
    info!(
        "Processed {} casts in {}",
        total,
        format_duration(now.elapsed())
    );
    Ok(())
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
