use mdpress::config::{PressConfig, base_path_from_config};
use mdpress::press::Press;

use crate::BuildArgs;

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    // Determine the config file path
    let config_path = args
        .config_file
        .clone()
        .unwrap_or_else(|| "press.yaml".into());
    let config_path = if config_path.is_relative() {
        std::env::current_dir()?.join(&config_path)
    } else {
        config_path
    };

    let config = PressConfig::load_from_arg(Some(config_path.as_path())).await?;

    // Resolve configured paths against the config file's directory
    let config = config.resolved_against(&base_path_from_config(&config_path));

    let press = Press::default_pipeline(config.press_context());
    let pressed = press.run(&config.content).await?;

    println!(
        "Pressed {} page(s) from {}",
        pressed.pages.len(),
        config.content.display()
    );

    // Rendering is downstream; the build's product is the manifest of
    // pages, context, and dependency chains.
    let manifest = serde_json::json!({
        "pages": pressed.pages,
        "context": pressed.context,
    });
    std::fs::write(&config.manifest, serde_json::to_string_pretty(&manifest)?)?;

    println!("Wrote manifest to {}", config.manifest.display());

    Ok(())
}
