use anyhow::Context;
use clap::Parser;
use post_viewer::core::{ConfigProvider, PostSource};
use post_viewer::utils::error::ErrorCategory;
use post_viewer::utils::{logger, validation::Validate};
use post_viewer::{CliConfig, FixturePostSource, HttpPostSource, Settings, ViewerEngine, ViewerError};

async fn render<S: PostSource>(source: S, settings: &Settings) -> anyhow::Result<()> {
    let mut engine = ViewerEngine::new(source);
    let report = engine.run(settings).await?;
    tracing::debug!("Render report: {:?}", report);

    let html = engine.into_html();
    match settings.output_path() {
        Some(path) => {
            std::fs::write(path, &html)
                .map_err(ViewerError::from)
                .with_context(|| format!("writing page to {}", path))?;
            tracing::info!("📁 Page saved to: {}", path);
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ViewerError>().map(ViewerError::category) {
        Some(ErrorCategory::Configuration) => 1,
        Some(ErrorCategory::Io) => 3,
        _ => 2,
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();
    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(settings.log_format, settings.verbose);
    tracing::info!("Starting post-viewer");
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let result = match settings.fixtures_path() {
        Some(path) => match FixturePostSource::from_file(path) {
            Ok(source) => render(source, &settings).await,
            Err(e) => Err(anyhow::Error::new(e).context(format!("loading fixtures from {}", path))),
        },
        None => match HttpPostSource::from_config(&settings) {
            Ok(source) => render(source, &settings).await,
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        tracing::error!("❌ Render failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        if let Some(viewer_error) = e.downcast_ref::<ViewerError>() {
            eprintln!("💡 {}", viewer_error.recovery_suggestion());
        }
        std::process::exit(exit_code(&e));
    }
}
