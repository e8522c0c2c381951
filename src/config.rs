use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::brush::BRUSH_SLOTS;
use crate::brush::DEFAULT_BRUSH_CAPACITY;
use crate::cell_set::DEFAULT_CAPACITY;
use crate::viewport::MAX_ZOOM;

/// Fixed capacities, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of cells alive at once
    pub active_cells: usize,

    /// Maximum number of cells a single brush holds
    pub brush_cells: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            active_cells: DEFAULT_CAPACITY,
            brush_cells: DEFAULT_BRUSH_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub limits: Limits,

    /// Frames per second. One generation is advanced per frame while running.
    pub fps: u32,

    /// Initial zoom, in view pixels per cell
    pub zoom: i32,

    pub max_zoom: i32,

    /// RLE pattern to load at startup
    pub pattern: Option<PathBuf>,

    /// Brush slot the pattern is loaded into
    pub pattern_slot: usize,

    /// File that receives the log. Nothing is logged without one.
    pub log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            fps: 10,
            zoom: 2,
            max_zoom: 32,
            pattern: None,
            pattern_slot: 1,
            log: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing value for {flag}")]
    MissingValue { flag: String },

    #[error("Invalid value \"{value}\" for {flag}")]
    InvalidNumber { flag: String, value: String },

    #[error("{flag} must be at least 1")]
    Zero { flag: String },

    #[error("{flag} must be at most {max}")]
    TooLarge { flag: String, max: i32 },

    #[error("Unknown flag {flag}")]
    UnknownFlag { flag: String },

    #[error("Only one pattern can be loaded, got {first:?} and {second:?}")]
    DuplicatePattern { first: PathBuf, second: PathBuf },

    #[error("Slot {slot} is out of range, there are {} slots", BRUSH_SLOTS)]
    SlotOutOfRange { slot: usize },
}

impl Config {
    /// Build a configuration from command line arguments, without the program name.
    ///
    /// ```text
    /// sparselife [--capacity N] [--brush-capacity N] [--fps N] [--zoom N] [--max-zoom N]
    ///            [--slot N] [--log PATH] [PATTERN.rle]
    /// ```
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--capacity" => config.limits.active_cells = positive(&arg, args.next())?,
                "--brush-capacity" => config.limits.brush_cells = positive(&arg, args.next())?,
                "--fps" => config.fps = positive(&arg, args.next())?,
                "--zoom" => config.zoom = zoom(&arg, args.next())?,
                "--max-zoom" => config.max_zoom = zoom(&arg, args.next())?,
                "--slot" => {
                    let slot = number(&arg, args.next())?;
                    if slot >= BRUSH_SLOTS {
                        return Err(ConfigError::SlotOutOfRange { slot });
                    }

                    config.pattern_slot = slot;
                }
                "--log" => {
                    let path = args.next().ok_or(ConfigError::MissingValue { flag: arg })?;
                    config.log = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => {
                    return Err(ConfigError::UnknownFlag { flag: arg });
                }
                _ => {
                    let path = PathBuf::from(arg);

                    if let Some(first) = config.pattern.take() {
                        return Err(ConfigError::DuplicatePattern {
                            first,
                            second: path,
                        });
                    }

                    config.pattern = Some(path);
                }
            }
        }

        config.zoom = config.zoom.min(config.max_zoom);

        Ok(config)
    }
}

fn number<T: FromStr>(flag: &str, value: Option<String>) -> Result<T, ConfigError> {
    let Some(value) = value else {
        return Err(ConfigError::MissingValue {
            flag: flag.to_string(),
        });
    };

    value.parse().map_err(|_| ConfigError::InvalidNumber {
        flag: flag.to_string(),
        value,
    })
}

/// Like `number`, rejecting anything below 1.
fn positive<T>(flag: &str, value: Option<String>) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + From<u8>,
{
    let n: T = number(flag, value)?;

    if n < T::from(1) {
        return Err(ConfigError::Zero {
            flag: flag.to_string(),
        });
    }

    Ok(n)
}

/// Like `positive`, rejecting anything past the viewport's zoom ceiling.
fn zoom(flag: &str, value: Option<String>) -> Result<i32, ConfigError> {
    let zoom = positive(flag, value)?;

    if zoom > MAX_ZOOM {
        return Err(ConfigError::TooLarge {
            flag: flag.to_string(),
            max: MAX_ZOOM,
        });
    }

    Ok(zoom)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Config;
    use super::ConfigError;
    use super::Limits;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        Config::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(
            config.limits,
            Limits {
                active_cells: 1024,
                brush_cells: 128
            }
        );
        assert_eq!(config.fps, 10);
        assert_eq!(config.pattern_slot, 1);
    }

    #[test]
    fn every_flag() {
        let config = parse(&[
            "--capacity",
            "4096",
            "--brush-capacity",
            "256",
            "--fps",
            "30",
            "--zoom",
            "4",
            "--max-zoom",
            "16",
            "--slot",
            "7",
            "--log",
            "life.log",
            "glider.rle",
        ])
        .unwrap();

        assert_eq!(config.limits.active_cells, 4096);
        assert_eq!(config.limits.brush_cells, 256);
        assert_eq!(config.fps, 30);
        assert_eq!(config.zoom, 4);
        assert_eq!(config.max_zoom, 16);
        assert_eq!(config.pattern_slot, 7);
        assert_eq!(config.log, Some(PathBuf::from("life.log")));
        assert_eq!(config.pattern, Some(PathBuf::from("glider.rle")));
    }

    #[test]
    fn zoom_is_clamped_to_max() {
        let config = parse(&["--zoom", "50", "--max-zoom", "8"]).unwrap();

        assert_eq!(config.zoom, 8);
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse(&["--fps"]),
            Err(ConfigError::MissingValue {
                flag: "--fps".into()
            })
        );
        assert_eq!(
            parse(&["--capacity", "lots"]),
            Err(ConfigError::InvalidNumber {
                flag: "--capacity".into(),
                value: "lots".into()
            })
        );
        assert_eq!(
            parse(&["--zoom", "0"]),
            Err(ConfigError::Zero {
                flag: "--zoom".into()
            })
        );
        assert_eq!(
            parse(&["--zoom", "-2"]),
            Err(ConfigError::Zero {
                flag: "--zoom".into()
            })
        );
        assert_eq!(
            parse(&["--slot", "10"]),
            Err(ConfigError::SlotOutOfRange { slot: 10 })
        );
        assert_eq!(
            parse(&["--wrap"]),
            Err(ConfigError::UnknownFlag {
                flag: "--wrap".into()
            })
        );
        assert!(matches!(
            parse(&["a.rle", "b.rle"]),
            Err(ConfigError::DuplicatePattern { .. })
        ));
    }

    #[test]
    fn zoom_is_capped_by_the_viewport() {
        assert_eq!(parse(&["--max-zoom", "256"]).unwrap().max_zoom, 256);
        assert_eq!(
            parse(&["--zoom", "100000", "--max-zoom", "100000"]),
            Err(ConfigError::TooLarge {
                flag: "--zoom".into(),
                max: 256
            })
        );
        assert_eq!(
            parse(&["--max-zoom", "257"]),
            Err(ConfigError::TooLarge {
                flag: "--max-zoom".into(),
                max: 256
            })
        );
    }

    #[test]
    fn slot_zero_is_allowed() {
        assert_eq!(parse(&["--slot", "0"]).unwrap().pattern_slot, 0);
    }
}
