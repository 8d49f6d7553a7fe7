use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use saver_core::{ImageFormat, StorageMethod, Theme};

use crate::logging::LogDestination;

/// Saves style image grids from a captured gallery page as zip archives.
#[derive(Debug, Parser)]
#[command(name = "sref_saver", version, about)]
pub struct Cli {
    /// Preferences file (RON).
    #[arg(long, global = true, default_value = ".sref_saver.ron")]
    pub prefs: PathBuf,

    /// Staging store shared between `save` (prompt path) and `confirm`.
    #[arg(long, global = true, default_value = ".sref_saver_staging.json")]
    pub staging: PathBuf,

    /// Where log output goes.
    #[arg(long, global = true, value_enum, default_value = "terminal")]
    pub log: LogTarget,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inject save controls into a page snapshot and run every save.
    Save {
        /// HTML snapshot of the gallery page.
        page: PathBuf,

        /// Directory archives are delivered into.
        #[arg(long, default_value = "downloads")]
        out: PathBuf,
    },
    /// Claim a staged download via its helper URL and confirm it.
    Confirm {
        /// Helper page URL, e.g. `download.html?id=dl_...`.
        url: String,

        /// Directory archives are delivered into.
        #[arg(long, default_value = "downloads")]
        out: PathBuf,
    },
    /// Show stored preferences, changing any that are passed.
    Prefs {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        #[arg(long, value_enum)]
        storage: Option<StorageArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::System => Theme::System,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Original,
    Jpg,
    Png,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Original => ImageFormat::Original,
            FormatArg::Jpg => ImageFormat::Jpg,
            FormatArg::Png => ImageFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StorageArg {
    Auto,
    Prompt,
}

impl From<StorageArg> for StorageMethod {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Auto => StorageMethod::Auto,
            StorageArg::Prompt => StorageMethod::Prompt,
        }
    }
}
