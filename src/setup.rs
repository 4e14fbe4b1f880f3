use crate::partition::SnapMode;
use crate::projection::UtmZone;
use clap::{App, AppSettings, Arg};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "input.csv";
pub const DEFAULT_OUTPUT_NAME: &str = "output";
pub const DEFAULT_DIM_MAX: usize = 80;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("invalid --dim-max `{0}`: expected a non-negative integer")]
    DimMax(String),

    #[error("invalid --zone: {0}")]
    Zone(String),

    #[error("invalid --snap: {0}")]
    Snap(String),

    #[error("invalid --seed `{0}`: expected an unsigned integer")]
    Seed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    input: PathBuf,
    output_name: String,
    dim_max: usize,
    zone: Option<UtmZone>,
    snap: SnapMode,
    seed: Option<u64>,
    verbosity: u64,
}

impl Config {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(input: P, output_name: S, dim_max: usize) -> Config {
        Config {
            input: input.into(),
            output_name: output_name.into(),
            dim_max,
            zone: None,
            snap: SnapMode::default(),
            seed: None,
            verbosity: 0,
        }
    }

    pub fn with_zone(mut self, zone: UtmZone) -> Config {
        self.zone = Some(zone);
        self
    }

    pub fn with_snap(mut self, snap: SnapMode) -> Config {
        self.snap = snap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Config {
        self.seed = Some(seed);
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }
    pub fn output_name(&self) -> &str {
        &self.output_name
    }
    pub fn dim_max(&self) -> usize {
        self.dim_max
    }
    pub fn zone(&self) -> Option<UtmZone> {
        self.zone
    }
    pub fn snap(&self) -> SnapMode {
        self.snap
    }
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
    pub fn verbosity(&self) -> u64 {
        self.verbosity
    }

    // <prefix>_<maxdim>_positions.csv
    pub fn positions_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_{}_positions.csv", self.output_name, self.dim_max))
    }

    // <prefix>_<maxdim>_centers.csv
    pub fn centers_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_{}_centers.csv", self.output_name, self.dim_max))
    }

    pub fn from_args<I, T>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(args)?;

        let dim_max = matches.value_of("DIM_MAX").unwrap_or_default();
        let dim_max = dim_max.parse().map_err(|_| ConfigError::DimMax(dim_max.to_owned()))?;

        let zone = match matches.value_of("ZONE") {
            Some(z) => Some(z.parse().map_err(ConfigError::Zone)?),
            None => None,
        };

        let snap = match matches.value_of("SNAP") {
            Some(s) => s.parse().map_err(ConfigError::Snap)?,
            None => SnapMode::default(),
        };

        let seed = match matches.value_of("SEED") {
            Some(s) => Some(s.parse().map_err(|_| ConfigError::Seed(s.to_owned()))?),
            None => None,
        };

        Ok(Config {
            input: PathBuf::from(matches.value_of("CSV_INPUT").unwrap_or(DEFAULT_INPUT)),
            output_name: matches.value_of("OUTPUT_NAME").unwrap_or(DEFAULT_OUTPUT_NAME).to_owned(),
            dim_max,
            zone,
            snap,
            seed,
            verbosity: matches.occurrences_of("VERBOSE"),
        })
    }
}

fn app() -> App<'static, 'static> {
    App::new("gravpart")
        .version(crate_version!())
        .about("Groups geolocated entities into compact clusters of bounded size.")
        .setting(AppSettings::UnifiedHelpMessage)
        .arg(
            Arg::with_name("CSV_INPUT")
                .short("c")
                .long("csv-input")
                .takes_value(true)
                .default_value(DEFAULT_INPUT)
                .help("Input csv with a header line naming user_id, latitude and longitude"),
        )
        .arg(
            Arg::with_name("OUTPUT_NAME")
                .short("o")
                .long("output-name")
                .takes_value(true)
                .default_value(DEFAULT_OUTPUT_NAME)
                .help("Path prefix of the generated files"),
        )
        .arg(
            Arg::with_name("DIM_MAX")
                .short("d")
                .long("dim-max")
                .takes_value(true)
                .default_value("80")
                .help("Maximum number of locations in each group"),
        )
        .arg(
            Arg::with_name("ZONE")
                .short("z")
                .long("zone")
                .takes_value(true)
                .help("UTM zone to project into, e.g. 32T. Guessed from the first location if absent"),
        )
        .arg(
            Arg::with_name("SNAP")
                .short("s")
                .long("snap")
                .takes_value(true)
                .possible_values(&["first", "nearest"])
                .help("Representative of each group: its first member, or the member nearest its centroid"),
        )
        .arg(
            Arg::with_name("SEED")
                .long("seed")
                .takes_value(true)
                .help("Seed for reproducible group ids"),
        )
        .arg(
            Arg::with_name("VERBOSE")
                .short("v")
                .multiple(true)
                .help("More logging, repeat for even more"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        Config::from_args(std::iter::once("gravpart").chain(args.iter().cloned()))
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, Config::new(DEFAULT_INPUT, DEFAULT_OUTPUT_NAME, DEFAULT_DIM_MAX));
        assert_eq!(config.positions_path(), PathBuf::from("output_80_positions.csv"));
        assert_eq!(config.centers_path(), PathBuf::from("output_80_centers.csv"));
    }

    #[test]
    fn every_option() {
        let config = parse(&[
            "-c", "users.csv", "-o", "out/run", "-d", "25", "-z", "33T", "--snap", "nearest", "--seed", "9", "-vv",
        ])
        .unwrap();
        assert_eq!(config.input(), Path::new("users.csv"));
        assert_eq!(config.dim_max(), 25);
        assert_eq!(config.zone(), "33T".parse().ok());
        assert_eq!(config.snap(), SnapMode::Nearest);
        assert_eq!(config.seed(), Some(9));
        assert_eq!(config.verbosity(), 2);
        assert_eq!(config.positions_path(), PathBuf::from("out/run_25_positions.csv"));
        assert_eq!(config.centers_path(), PathBuf::from("out/run_25_centers.csv"));
    }

    #[test]
    fn long_flags() {
        let config = parse(&["--csv-input", "a.csv", "--output-name", "b", "--dim-max", "0"]).unwrap();
        assert_eq!(config.input(), Path::new("a.csv"));
        assert_eq!(config.output_name(), "b");
        assert_eq!(config.dim_max(), 0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(parse(&["-d", "2.5"]), Err(ConfigError::DimMax(_))));
        assert!(matches!(parse(&["-d", "many"]), Err(ConfigError::DimMax(_))));
        assert!(matches!(parse(&["-z", "99Q"]), Err(ConfigError::Zone(_))));
        assert!(matches!(parse(&["--seed", "x"]), Err(ConfigError::Seed(_))));
        assert!(matches!(parse(&["--snap", "medoid"]), Err(ConfigError::Cli(_))));
        assert!(matches!(parse(&["--bogus"]), Err(ConfigError::Cli(_))));
    }
}
