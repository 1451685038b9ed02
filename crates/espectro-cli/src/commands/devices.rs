//! List audio output devices.

use clap::Args;

use espectro_io::{default_output_device, list_output_devices};

#[derive(Args)]
pub struct DevicesArgs {}

pub fn run(_args: DevicesArgs) -> anyhow::Result<()> {
    let default = default_output_device()?;
    let devices = list_output_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found");
        return Ok(());
    }

    println!("Output devices:");
    for (i, device) in devices.iter().enumerate() {
        let marker = if default
            .as_ref()
            .is_some_and(|d| d.name == device.name)
        {
            "*"
        } else {
            " "
        };
        println!(
            " {marker} [{i}] {} ({} Hz)",
            device.name, device.default_sample_rate
        );
    }
    println!("\n(* = default; pass --output-device NAME or INDEX to play)");

    Ok(())
}
