use smartthings_ac::{Platform, PlatformConfig};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> smartthings_ac::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).expect("usage: discover <config.json> [--watch]");
    let watch = args.iter().any(|a| a == "--watch");

    let config = PlatformConfig::from_path(path)?;
    let mut platform = Platform::builder(config)
        .on_register(|record| {
            println!("registered {} ({})", record.display_name, record.uuid);
        })
        .on_update(|update| {
            println!(
                "  push {:?}.{} = {:?}",
                update.service, update.characteristic, update.value
            );
        })
        .build()?;

    let count = platform.discover_devices().await?;
    println!("{}: {count} air conditioner(s) bridged", platform.config().name);

    loop {
        for accessory in platform.accessories() {
            let info = accessory.information();
            println!("[{}] {} / {}", info.name, info.manufacturer, info.model);
            for spec in accessory.characteristics() {
                let value = accessory
                    .handle_get(spec.service, spec.characteristic)
                    .await?;
                println!(
                    "  {:?}.{}{} = {:?}",
                    spec.service,
                    spec.characteristic,
                    if spec.writable { " (rw)" } else { "" },
                    value
                );
            }
        }

        if !watch {
            break;
        }
        tokio::time::sleep(Duration::from_secs(30)).await;
    }

    Ok(())
}
