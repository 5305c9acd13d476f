use clap::Parser;
use clinical_risk::config::PipelineConfig;
use clinical_risk::pipeline::Pipeline;
use clinical_risk::{cli, log, Args};
use tracing::{error, info};

fn main() {
    let args = Args::parse();

    let config = match PipelineConfig::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration Error: {}", err);
            std::process::exit(exitcode::CONFIG);
        }
    };

    log::init(config.log.clone());

    info!(
        msg = "Clinical risk pipeline",
        version = clinical_risk::VERSION,
        input = %config.input.path.display(),
    );

    let pipeline = match Pipeline::for_today(config) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!(msg = "Invalid risk rules", error = err.to_string());
            std::process::exit(err.exit_code());
        }
    };

    if let Err(err) = cli::run(args, pipeline) {
        error!(msg = "Clinical risk pipeline failed", error = err.to_string());
        std::process::exit(err.exit_code());
    }
}
