//! # Label Forge
//!
//! Command-line label composer.

use clap::Parser;
use label_cli::{export_label, preview_label, CliArgs, Command, LabelConfig};
use label_renderer::scan_icons;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = LabelConfig::from(&args);
    tracing::debug!(?config, "Starting label-forge");

    match args.command {
        Command::Render { label, output } => {
            let catalog = config.catalog();
            let painter = config.painter();
            let now = chrono::Local::now().naive_local();
            let path = export_label(&config, &catalog, &label, &output, painter.as_ref(), now)?;
            println!("{}", path.display());
        }
        Command::Preview { label, out, max } => {
            let catalog = config.catalog();
            let painter = config.painter();
            let preview = preview_label(&config, &catalog, &label, &out, max, painter.as_ref())?;
            println!("{} ({}x{})", out.display(), preview.width, preview.height);
        }
        Command::Presets => {
            for preset in config.catalog().presets() {
                println!("{}", preset.display_label());
            }
        }
        Command::Icons => {
            let icons = scan_icons(&config.icons_dir);
            if icons.is_empty() {
                tracing::info!(dir = %config.icons_dir.display(), "No icons found");
            }
            for icon in icons {
                if let Some(name) = icon.file_name() {
                    println!("{}", name.to_string_lossy());
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,label_cli=info,label_core=info,label_renderer=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Use JSON format when RUST_LOG_FORMAT=json
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
