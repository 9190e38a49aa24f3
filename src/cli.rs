use std::{io::IsTerminal, path::PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::get_version;

#[derive(Parser, Debug)]
#[command(rename_all = "kebab-case", version = get_version(), about)]
pub struct Opts {
    #[command(flatten)]
    pub root: RootOpts,

    #[command(subcommand)]
    pub sub_command: Option<SubCommand>,
}

impl Opts {
    pub fn get_matches() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    pub const fn log_level(&self) -> &'static str {
        // `validate` is quieter by one step; its own report goes to stdout.
        let (quiet_level, verbose_level) = match self.sub_command {
            Some(SubCommand::Validate) => {
                if self.root.verbose == 0 {
                    (self.root.quiet.saturating_add(1), self.root.verbose)
                } else {
                    (self.root.quiet, self.root.verbose - 1)
                }
            }
            None => (self.root.quiet, self.root.verbose),
        };
        match quiet_level {
            0 => match verbose_level {
                0 => "info",
                1 => "debug",
                2..=255 => "trace",
            },
            1 => "warn",
            2 => "error",
            3..=255 => "off",
        }
    }
}

#[derive(Parser, Debug)]
#[command(rename_all = "kebab-case")]
pub struct RootOpts {
    /// Read configuration from a TOML file.
    ///
    /// `$VAR`, `${VAR}`, `${VAR:-default}` and `${VAR:?message}` references
    /// are resolved from the environment before parsing.
    #[arg(
        id = "config",
        short = 'c',
        long = "config",
        env = "ALS_ANALYTICS_CONFIG",
        default_value = "/etc/als-analytics/als-analytics.toml"
    )]
    pub config_path: PathBuf,

    /// Number of worker threads (default is number of available cores)
    #[arg(short, long, env = "ALS_ANALYTICS_THREADS")]
    pub threads: Option<usize>,

    /// Enable more detailed internal logging. Repeat to increase level. Overridden by `--quiet`.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce detail of internal logging. Repeat to reduce further. Overrides `--verbose`.
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Set the logging format
    #[arg(long, default_value = "text", env = "ALS_ANALYTICS_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Control when ANSI terminal formatting is used.
    ///
    /// `auto` enables it when `stdout` is a terminal.
    #[arg(long, default_value = "auto", env = "ALS_ANALYTICS_COLOR")]
    pub color: Color,

    /// Seconds to wait for in-flight streams and buffered records on shutdown
    /// before aborting.
    #[arg(
        long,
        default_value = "60",
        env = "ALS_ANALYTICS_GRACEFUL_SHUTDOWN_LIMIT_SECS"
    )]
    pub graceful_shutdown_limit_secs: u64,
}

impl RootOpts {
    pub fn use_color(&self) -> bool {
        match self.color {
            Color::Auto => std::io::stdout().is_terminal(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
#[command(rename_all = "kebab-case")]
pub enum SubCommand {
    /// Validate the configuration, then exit.
    Validate,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Auto,
    Always,
    Never,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub fn handle_config_errors(errors: Vec<String>) -> exitcode::ExitCode {
    for error in errors {
        error!(message = "Configuration error.", %error);
    }

    exitcode::CONFIG
}
