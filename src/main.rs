use assetscan::{lookup_scan, InventoryStore, LookupOutcome, Notification, NotificationLevel, RegistrationForm, ScanManager, CONFIG};
use log::{error, info, warn};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

fn log_notification(note: &Notification) {
    match note.level {
        NotificationLevel::Error => error!("{}", note.message),
        NotificationLevel::Warning => warn!("{}", note.message),
        _ => info!("{}", note.message),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    let default_filter = std::env::var("ASSETSCAN_LOG_LEVEL").unwrap_or("info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let (config, seed_path) = {
        let holder = CONFIG.read().map_err(|e| e.to_string())?;
        (holder.get_complete_config(), holder.seed_path())
    };

    let store = match seed_path {
        Some(path) => InventoryStore::load_seed(&path)?,
        None => {
            info!("No seed file configured, starting with an empty inventory");
            InventoryStore::new()
        }
    };

    let (raw_tx, raw_rx) = tokio::sync::mpsc::channel::<String>(config.scanner.queue_size.max(1));
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(config.scanner.queue_size.max(1));

    let mut scanner = ScanManager::new(event_tx);
    let scan_task = tokio::spawn(async move {
        scanner.start_thread(raw_rx).await;
    });

    /* Every stdin line is one decoded payload, as a camera callback would deliver it */
    let input_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if raw_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Reading scan input failed: {e:?}");
                    break;
                }
            }
        }
    });

    info!("Waiting for scans, one payload per line");
    let mut form = RegistrationForm::new();
    while let Some(event) = event_rx.recv().await {
        if config.scanner.print_results {
            println!("{}", serde_json::to_string(&event.result)?);
        }

        let note = if event.result.id().is_some() {
            let outcome = lookup_scan(&store, &event.result);
            if let LookupOutcome::Found(asset) = &outcome {
                info!("{} is {} ({})", asset.id, asset.status.to_string(), asset.category_id);
            }
            outcome.notification()
        } else {
            form.apply_scan(&event.result)
        };
        log_notification(&note);
    }

    let _ = input_task.await;
    let _ = scan_task.await;
    info!("Scan input closed, form ended with serial {:?} and MAC {:?}", form.serial_number, form.mac_address);
    Ok(())
}
