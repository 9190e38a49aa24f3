use std::{path::PathBuf, pin::Pin, time::Duration};

use futures::{Stream, StreamExt};
use tokio::{
    runtime::{self, Runtime},
    sync::mpsc,
};

use crate::{
    cli::{handle_config_errors, LogFormat, Opts, SubCommand},
    config,
    internal_events::{AdapterQuit, AdapterStopped, AdapterStopping},
    signal::{self, SignalTo},
    topology::RunningTopology,
    trace,
};

pub struct ApplicationConfig {
    pub config_path: PathBuf,
    pub topology: RunningTopology,
    pub graceful_crash: mpsc::UnboundedReceiver<()>,
    pub signals: Pin<Box<dyn Stream<Item = SignalTo> + Send>>,
}

pub struct Application {
    graceful_shutdown_limit: Duration,
    pub config: ApplicationConfig,
    pub runtime: Runtime,
}

impl Application {
    pub fn prepare() -> Result<Self, exitcode::ExitCode> {
        let opts = Opts::get_matches().map_err(|error| {
            // Help and version requests end up here too.
            let _ = error.print();
            error.exit_code()
        })?;
        Self::prepare_from_opts(opts)
    }

    pub fn prepare_from_opts(opts: Opts) -> Result<Self, exitcode::ExitCode> {
        let level = std::env::var("LOG").unwrap_or_else(|_| match opts.log_level() {
            "off" => "off".to_owned(),
            level => [
                format!("als_analytics={level}"),
                format!("envoy_proto={level}"),
                format!("tonic={level}"),
            ]
            .join(","),
        });

        let root_opts = opts.root;
        let sub_command = opts.sub_command;

        let color = root_opts.use_color();
        let json = match root_opts.log_format {
            LogFormat::Text => false,
            LogFormat::Json => true,
        };

        trace::init(color, json, &level);

        if let Some(threads) = root_opts.threads {
            if threads < 1 {
                error!("The `threads` argument must be greater or equal to 1.");
                return Err(exitcode::CONFIG);
            }
        }

        let config_path = root_opts.config_path;
        info!(message = "Loading config.", path = ?config_path);
        let config = config::load_from_path(&config_path).map_err(handle_config_errors)?;

        if let Some(SubCommand::Validate) = sub_command {
            println!("Configuration {config_path:?} is valid.");
            return Err(exitcode::OK);
        }

        let runtime = {
            let mut builder = runtime::Builder::new_multi_thread();
            if let Some(threads) = root_opts.threads {
                builder.worker_threads(threads);
            }
            builder.enable_all().build().map_err(|error| {
                error!(message = "Unable to create async runtime.", %error);
                exitcode::OSERR
            })?
        };

        let config = runtime.block_on(async move {
            info!(message = "Log level is enabled.", level = ?level);

            let signals = signal::signals().map_err(|error| {
                error!(message = "Unable to listen for signals.", %error);
                exitcode::OSERR
            })?;

            let (topology, graceful_crash) =
                RunningTopology::start(&config).await.map_err(|error| {
                    error!(message = "Failed to start.", %error);
                    exitcode::CONFIG
                })?;

            Ok::<_, exitcode::ExitCode>(ApplicationConfig {
                config_path,
                topology,
                graceful_crash,
                signals: Box::pin(signals),
            })
        })?;

        Ok(Self {
            graceful_shutdown_limit: Duration::from_secs(root_opts.graceful_shutdown_limit_secs),
            config,
            runtime,
        })
    }

    pub fn run(self) -> exitcode::ExitCode {
        let limit = self.graceful_shutdown_limit;
        let ApplicationConfig {
            topology,
            mut graceful_crash,
            mut signals,
            ..
        } = self.config;

        self.runtime.block_on(async move {
            let (signal, code) = tokio::select! {
                Some(signal) = signals.next() => (signal, exitcode::OK),
                // The server stopped without being asked to.
                _ = graceful_crash.recv() => (SignalTo::Shutdown, exitcode::SOFTWARE),
            };

            match signal {
                SignalTo::Shutdown => {
                    emit!(AdapterStopping);
                    tokio::select! {
                        _ = topology.stop(limit) => emit!(AdapterStopped),
                        _ = signals.next() => emit!(AdapterQuit),
                    }
                }
                SignalTo::Quit => {
                    emit!(AdapterQuit);
                    drop(topology);
                }
            }

            code
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;
    use indoc::formatdoc;

    use super::*;

    fn write_config(dir: &Path, organization: &str) -> PathBuf {
        let path = dir.join("als-analytics.toml");
        let output = dir.join("records.jsonl");
        let text = formatdoc! {r#"
            [grpc]
            address = "127.0.0.1:0"

            [tenant]
            organization = "{organization}"
            environment = "test"

            [delivery]
            target = {{ type = "file", path = {output:?} }}
        "#};
        std::fs::write(&path, text).unwrap();
        path
    }

    fn opts(path: &Path, extra: &[&str]) -> Opts {
        let mut args = vec!["als-analytics", "--config", path.to_str().unwrap()];
        args.extend_from_slice(extra);
        Opts::try_parse_from(args).unwrap()
    }

    #[test]
    fn prepares_running_application() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "acme");

        let app = Application::prepare_from_opts(opts(&path, &["--threads", "1"]))
            .unwrap_or_else(|code| panic!("prepare failed with exit code {code}"));

        assert_eq!(app.config.config_path, path);
        let Application {
            runtime, config, ..
        } = app;
        runtime.block_on(config.topology.stop(Duration::from_secs(1)));
    }

    #[test]
    fn validate_exits_before_starting() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "acme");

        let result = Application::prepare_from_opts(opts(&path, &["validate"]));

        assert!(matches!(result, Err(code) if code == exitcode::OK));
    }

    #[test]
    fn invalid_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");

        let result = Application::prepare_from_opts(opts(&path, &[]));

        assert!(matches!(result, Err(code) if code == exitcode::CONFIG));
    }
}
