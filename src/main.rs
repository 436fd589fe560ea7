//! fanout demonstration harness.
//!
//! Attaches a few subscribers to a publisher, notifies them, detaches one,
//! and notifies again.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fanout::config::FanoutConfig;
use fanout::domain::{Publisher, SharedListener, SpecialSubscriber, Subscriber, Transcript};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = FanoutConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    tracing::info!(policy = ?config.detach_policy, "starting fanout demo");

    let transcript = if config.echo_stdout {
        Transcript::echoing()
    } else {
        Transcript::new()
    };

    let mut publisher = Publisher::with_config(&config);
    publisher.set_on_start(|_: &()| tracing::info!("notification pass starting"));
    publisher.set_on_finish(|_: &()| tracing::info!("notification pass finished"));

    let subscriber_1: SharedListener<()> =
        Arc::new(Subscriber::new("subscriber_1", transcript.clone()));
    let subscriber_2: SharedListener<()> =
        Arc::new(Subscriber::new("subscriber_2", transcript.clone()));
    let subscriber_3: SharedListener<()> =
        Arc::new(Subscriber::new("subscriber_3", transcript.clone()));
    let special: SharedListener<()> =
        Arc::new(SpecialSubscriber::new("special_sub", transcript.clone()));

    for listener in [&subscriber_1, &subscriber_2, &subscriber_3, &special] {
        publisher.attach(listener);
    }

    let notified = publisher.notify(&())?;
    tracing::info!(notified, "first pass done");

    publisher.detach(&subscriber_2)?;
    let notified = publisher.notify(&())?;
    tracing::info!(notified, "second pass done");

    if !config.echo_stdout {
        for line in transcript.lines() {
            tracing::info!(%line, "transcript");
        }
    }

    Ok(())
}
