//! Command-line options. Flags override the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(version, about = "Filter, pivot and chart spreadsheet sheets")]
pub struct Args {
    /// Config file (JSON). Defaults to ./sheet-report.json when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the cached tables
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Spreadsheet to convert from the Load Data tab
    #[arg(long)]
    pub workbook: Option<PathBuf>,

    /// Start with the dark theme
    #[arg(long)]
    pub dark: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(workbook) = &self.workbook {
            config.workbook = workbook.clone();
        }
        if self.dark {
            config.dark_mode = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from(["sheet-report", "--data-dir", "/tmp/cache", "--dark"]);
        let config = args.apply(AppConfig::default());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.workbook, PathBuf::from("workbook.xlsx"));
        assert!(config.dark_mode);
    }
}
