//! Crescendo Vesting Keeper
//!
//! Off-chain service that sweeps matured vesting releases to their
//! beneficiaries on a cadence and exports the resulting events.

mod config;
mod export;
mod queue;
mod schedule;

use anyhow::{Context, Result};
use config::Config;
use crescendo_common::{display_address, Clock, EventLog, InMemoryLedger, SystemClock};
use crescendo_treasury::VestingLedger;
use queue::ReleaseQueue;
use std::time::Duration;
use tokio::time;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Crescendo Vesting Keeper");

    // Load configuration
    let config = Config::load().unwrap_or_else(|_| {
        log::warn!("Failed to load config, using default local config");
        Config::default_local()
    });

    let treasury = config::parse_address(&config.treasury)
        .context("Bad treasury address in config")?;
    log::info!("Dust threshold: {} tokens", config.dust_threshold_tokens);

    // Seed the ledgers from config
    let mut token = InMemoryLedger::new(treasury);
    token.mint(&treasury, config::tokens_to_fixed(config.treasury_tokens));
    log::info!(
        "Treasury holding {} funded with {} tokens",
        display_address(token.treasury()),
        config.treasury_tokens
    );

    let mut events = EventLog::new();
    let mut vesting = VestingLedger::new();
    for seed in &config.grants {
        let beneficiary = config::parse_address(&seed.beneficiary)
            .context(format!("Bad grant beneficiary: {}", seed.beneficiary))?;
        vesting
            .grant(
                beneficiary,
                config::tokens_to_fixed(seed.amount_tokens),
                seed.start,
                seed.end,
                &mut events,
            )
            .map_err(|e| anyhow::anyhow!("Failed to seed grant for {}: {e}", seed.beneficiary))?;
    }
    log::info!("Seeded {} grants", config.grants.len());

    // Initialize release queue
    let mut queue = ReleaseQueue::new();
    let clock = SystemClock;

    log::info!("Keeper service started. Sweeping matured releases...");

    // Main event loop
    let mut interval = time::interval(Duration::from_secs(config.poll_interval_secs));

    loop {
        interval.tick().await;

        let now = clock.now();
        refresh_queue(&mut queue, &vesting, now, &config);

        // Sweep due releases
        if let Err(e) = process_releases(&mut queue, &mut vesting, &mut token, now, &config, &mut events)
        {
            log::error!("Error processing releases: {}", e);
        }

        // Export whatever the sweep produced
        match export::append_events(&config.export_path, &events.drain()) {
            Ok(0) => {}
            Ok(n) => log::debug!("Exported {} events", n),
            Err(e) => log::error!("Error exporting events: {}", e),
        }

        // Log queue status
        if !queue.is_empty() {
            log::debug!("Release queue size: {}", queue.len());

            if let Some(next) = queue.peek() {
                log::debug!("Next release due at {}", next.due);
            }
        }
    }
}

/// Rebuild the release projection for every beneficiary
fn refresh_queue(queue: &mut ReleaseQueue, vesting: &VestingLedger, now: u64, config: &Config) {
    let dust = config::tokens_to_fixed(config.dust_threshold_tokens);

    queue.clear();
    for beneficiary in vesting.beneficiaries() {
        let grants = vesting.grants_of(beneficiary);
        if let Some(release) = schedule::project_release(*beneficiary, grants, now, dust) {
            queue.push(release);
        }
    }
}

/// Claim releases already due, up to the batch bound
fn process_releases(
    queue: &mut ReleaseQueue,
    vesting: &mut VestingLedger,
    token: &mut InMemoryLedger,
    now: u64,
    config: &Config,
    events: &mut EventLog,
) -> Result<()> {
    let due = queue.get_due(now);

    if due.is_empty() {
        log::debug!("No releases due");
        return Ok(());
    }

    log::info!("Found {} releases due", due.len());

    // Process up to max batch size
    let batch_size = config.max_claims_per_batch.min(due.len());

    for release in due.iter().take(batch_size) {
        match vesting.claim(&release.beneficiary, now, token, events) {
            Ok(released) => {
                log::info!(
                    "Released {} to {} (projected {})",
                    released,
                    display_address(&release.beneficiary),
                    release.amount
                );

                // Re-projected on the next tick
                queue.remove(&release.beneficiary);
            }
            Err(e) => {
                log::error!(
                    "Failed to release for {}: {}",
                    display_address(&release.beneficiary),
                    e
                );
            }
        }
    }

    Ok(())
}
