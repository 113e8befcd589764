//! Walks one booking through the wizard end to end.
//!
//! Runs offline by default (sample vehicles and cards, bookings accepted in
//! memory). Set `PARKWISE_MODE=live` with `PARKWISE_API_URL` and
//! `PARKWISE_API_TOKEN` to drive the real booking API.

use anyhow::{Context, bail};
use chrono::Duration as ChronoDuration;
use parkwise_booking::wizard::{
    WizardAction, WizardEnvironment, WizardReducer, WizardState, WizardStatus,
};
use parkwise_booking::{Config, environment_for, fixtures};
use parkwise_core::environment::{Clock, SystemClock};
use parkwise_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type WizardStore = Store<WizardState, WizardAction, WizardEnvironment, WizardReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parkwise_booking=info,parkwise_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env().context("loading configuration")?;
    tracing::info!(mode = %config.mode, api = %config.api.base_url, "Starting booking demo");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let env = environment_for(&config, Arc::clone(&clock));
    let store: WizardStore = Store::new(WizardState::new(), WizardReducer::new(), env);

    let space = fixtures::downtown_garage();
    println!("=== Booking {} ({}/hr) ===\n", space.title, space.hourly_rate);

    store.send(WizardAction::Start { space }).await?;

    // Step 1: tomorrow, 09:00 to 18:00 UTC
    let tomorrow = (clock.now() + ChronoDuration::days(1)).date_naive();
    let check_in = tomorrow
        .and_hms_opt(9, 0, 0)
        .context("building check-in time")?
        .and_utc();
    let check_out = check_in + ChronoDuration::hours(9);

    store.send(WizardAction::Continue).await?;
    print_warning(&store).await;

    store
        .send(WizardAction::SetInterval {
            check_in,
            check_out,
        })
        .await?;
    if let Some(Ok(quote)) = store.state(WizardState::quote).await {
        println!("Step 1: {check_in} -> {check_out}");
        println!(
            "  {:.2} h  subtotal {}  fee {} ({})  tax {} ({})  total {}",
            quote.hours,
            quote.subtotal,
            quote.service_fee,
            quote.service_fee_rate,
            quote.tax,
            quote.tax_rate,
            quote.total
        );
    }

    // Steps 2 and 3: lists load on entry and the defaults are preselected
    advance(&store).await?;
    let vehicle = store
        .state(|s| s.draft().and_then(|d| d.vehicle.clone()))
        .await;
    match vehicle {
        Some(vehicle) => println!("Step 2: vehicle {vehicle}"),
        None => bail!("no vehicle available to book with"),
    }

    advance(&store).await?;
    let card = store
        .state(|s| s.draft().and_then(|d| d.payment_method.clone()))
        .await;
    match card {
        Some(card) => println!("Step 3: paying with {card}"),
        None => bail!("no payment method available to book with"),
    }

    store.send(WizardAction::Continue).await?;
    println!("Step 4: confirm\n");

    let outcome = store
        .send_and_wait_for(
            WizardAction::Submit,
            WizardAction::is_submission_outcome,
            config.api.request_timeout() + Duration::from_secs(1),
        )
        .await
        .context("waiting for the booking result")?;
    tracing::debug!(outcome = outcome.name(), "Submission finished");

    let status = store.state(|s| s.status.clone()).await;
    store.shutdown(Duration::from_secs(5)).await?;

    match status {
        WizardStatus::Submitted { booking } => {
            println!(
                "Booked {} ({:?}): {} charged to {}",
                booking.id, booking.status, booking.total_amount, booking.payment_method_id
            );
            Ok(())
        },
        WizardStatus::Failed { error } => bail!("booking failed: {error}"),
        other => bail!("unexpected wizard state: {other:?}"),
    }
}

/// Continues one step and waits for the list that step loads
async fn advance(store: &WizardStore) -> anyhow::Result<()> {
    let mut handle = store.send(WizardAction::Continue).await?;
    handle
        .wait_with_timeout(Duration::from_secs(15))
        .await
        .context("loading account records")?;
    print_warning(store).await;
    Ok(())
}

async fn print_warning(store: &WizardStore) {
    if let Some(warning) = store.state(|s| s.warning.clone()).await {
        println!("  ! {warning}");
    }
}
