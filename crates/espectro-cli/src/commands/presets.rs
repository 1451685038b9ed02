//! List equalizer presets.

use clap::Args;

use espectro_config::{factory_presets, paths};

#[derive(Args)]
pub struct PresetsArgs {
    /// Show full gain tables, not just names
    #[arg(short, long)]
    verbose: bool,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    println!("Factory presets:");
    for preset in factory_presets() {
        let description = preset.description.as_deref().unwrap_or("");
        println!("  {:<14} {}", preset.name, description);
        if args.verbose {
            for (band, gain_db) in &preset.gains {
                println!("      {band:<10} {gain_db:+.1} dB");
            }
        }
    }

    let user_dir = paths::user_presets_dir();
    println!("\nUser presets ({}):", user_dir.display());
    match std::fs::read_dir(&user_dir) {
        Ok(entries) => {
            let mut found = false;
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "toml")
                    && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                {
                    println!("  {stem}");
                    found = true;
                }
            }
            if !found {
                println!("  (none)");
            }
        }
        Err(_) => println!("  (none)"),
    }

    Ok(())
}
