use agenda_core::{config::Config, io, paths};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing agenda in: {}", root.display());

    let config_path = paths::config_path(root);
    let config = if config_path.exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load existing agenda.yaml")?
    } else {
        let config = Config::default();
        config.save(root).context("failed to write agenda.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        config
    };

    for dir in [&config.dirs.input, &config.dirs.output] {
        let p = root.join(dir);
        if p.is_dir() {
            println!("  exists:  {dir}/");
        } else {
            io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
            println!("  created: {dir}/");
        }
    }

    println!(
        "\nPlace last week's agenda and the reference documents in {}/ and run 'agenda check'.",
        config.dirs.input
    );
    Ok(())
}
