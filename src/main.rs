//! BeePi CLI entry point

use std::process::ExitCode;

use clap::Parser;

use beepi::cli::{
    app::{load_merged_config, run_convert, run_session, SessionOptions, EXIT_ERROR,
        EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
};
use beepi::domain::config::AppConfig;
use beepi::domain::recording::{default_experiment_name, Backend, CaptureSettings, SessionPlan};
use beepi::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Convert {
            dir,
            grayscale,
            fps,
            keep_original,
        }) => {
            init_logging(cli.debug, None);
            return run_convert(dir, grayscale, fps, keep_original).await;
        }
        None => {}
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        fps: cli.fps,
        width: cli.width,
        height: cli.height,
        camera_mode: cli.camera_mode,
        segment_length: cli.segment_length,
        session_length: cli.session_length,
        ir: if cli.ir { Some(true) } else { None },
        use_picamera: if cli.use_picamera { Some(true) } else { None },
        paths: None, // Paths come from the config file only
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // The debug run uses a short preconfigured plan and a fixed name
    let (experiment_name, plan) = if cli.debug {
        ("test".to_string(), SessionPlan::debug_plan())
    } else {
        let plan = match SessionPlan::new(
            config.segment_length_or_default(),
            config.session_length_or_default(),
        ) {
            Ok(plan) => plan,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        };
        (
            cli.experiment_name.unwrap_or_else(default_experiment_name),
            plan,
        )
    };

    let data_dir = config.data_dir_or_default();
    init_logging(cli.debug, Some(&data_dir.join("logs.txt")));

    let options = SessionOptions {
        experiment_name,
        settings: CaptureSettings::new(
            config.fps_or_default(),
            config.width_or_default(),
            config.height_or_default(),
            config.camera_mode_or_default(),
        ),
        plan,
        backend: Backend::from_flag(config.use_picamera_or_default()),
        ir: config.ir_or_default(),
        picam_dir: config.picam_dir_or_default(),
        data_dir,
        usb_dir: config.usb_dir_or_default(),
    };

    run_session(options).await
}
