use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        args::SimulateArgs,
        formatting::{format_header, format_seconds, format_state},
    },
    config::Config,
    services::playback::{
        EngineState, IntentStore, MediaRef, PlaybackEngine, SimulatedElement,
        SimulatedElementConfig, SourceResolver,
    },
};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);
const SETTLE_POLL: Duration = Duration::from_millis(10);

/// Selects each path in turn against a simulated element and reports what
/// the engine did with it.
///
/// # Example Usage
///
/// ```bash
/// listenparty simulate --duration 30 /uploads/a.mp3 /cdn-uploads/b.mp3
/// listenparty simulate --reject-play /uploads/a.mp3
/// ```
pub struct SimulateCommand {
    config: Arc<Config>,
    args: SimulateArgs,
}

impl SimulateCommand {
    /// Creates a new SimulateCommand
    pub fn new(config: Arc<Config>, args: SimulateArgs) -> Self {
        Self { config, args }
    }

    fn element_config(&self) -> SimulatedElementConfig {
        SimulatedElementConfig {
            load_latency: Duration::from_millis(self.args.load_latency),
            media_duration: self.args.duration,
            reject_play: self
                .args
                .reject_play
                .then(|| "autoplay blocked by simulated policy".to_string()),
            fail_on: self.args.fail_on.clone(),
            ..SimulatedElementConfig::default()
        }
    }
}

#[async_trait]
impl Command for SimulateCommand {
    /// # Errors
    ///
    /// * `CliError::InvalidArguments` - If the duration is negative or not a number
    /// * `CliError::PlaybackError` - If the engine stops before the run completes
    async fn execute(&self) -> CommandResult {
        if !(self.args.duration.is_finite() && self.args.duration >= 0.0) {
            return Err(CliError::InvalidArguments(format!(
                "Duration must be a non-negative number of seconds, got {}",
                self.args.duration
            )));
        }

        let store = IntentStore::new(self.config.player.initial_volume());
        let (element, events) = SimulatedElement::new(self.element_config());
        let engine = PlaybackEngine::spawn(
            store.clone(),
            Arc::new(element),
            events,
            SourceResolver::new(self.config.resolver.clone()),
            &self.config.player,
        );

        let play_for = Duration::from_millis(self.args.play_for);
        let mut lines = vec![format_header("Simulation")];

        for (index, path) in self.args.paths.iter().enumerate() {
            let item = MediaRef::new(format!("item-{}", index + 1), path.as_str());

            store.select(item.clone());
            store.set_playing(true);
            settle(&engine, &store, &item).await;
            sleep(play_for).await;

            let intent = store.snapshot();
            lines.push(format!(
                "{:>3}. {}  {}  {} / {}  {}",
                index + 1,
                path,
                format_state(&engine.state()),
                format_seconds(intent.position_seconds),
                format_seconds(intent.duration_seconds),
                if intent.is_playing { "wants play" } else { "wants pause" },
            ));
        }

        engine
            .shutdown()
            .await
            .map_err(|e| CliError::PlaybackError(e.to_string()))?;

        Ok(lines.join("\n"))
    }
}

/// Waits until the engine has finished reacting to selecting `item`.
async fn settle(engine: &PlaybackEngine, store: &IntentStore, item: &MediaRef) {
    let deadline = Instant::now() + SETTLE_TIMEOUT;

    while Instant::now() < deadline {
        let state = engine.state();
        let current = state.item().is_some_and(|bound| bound.same_item(item));

        let settled = current
            && match state {
                EngineState::Playing(_) | EngineState::Error(_, _) => true,
                EngineState::Ready(_) => !store.snapshot().is_playing,
                EngineState::Idle | EngineState::Loading(_) => false,
            };

        if settled {
            return;
        }
        sleep(SETTLE_POLL).await;
    }

    debug!(item = %item.id, "Engine did not settle before timeout");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(paths: &[&str]) -> SimulateArgs {
        SimulateArgs {
            duration: 30.0,
            load_latency: 10,
            play_for: 0,
            reject_play: false,
            fail_on: Vec::new(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn plays_each_item() {
        let command = SimulateCommand::new(
            Arc::new(Config::default()),
            args(&["/uploads/a.mp3", "/uploads/b.mp3"]),
        );

        let output = command.execute().await.unwrap();

        assert_eq!(output.lines().filter(|l| l.contains("playing(item-")).count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_play_reports_paused() {
        let command = SimulateCommand::new(
            Arc::new(Config::default()),
            SimulateArgs {
                reject_play: true,
                ..args(&["/uploads/a.mp3"])
            },
        );

        let output = command.execute().await.unwrap();

        assert!(output.contains("ready(item-1)"));
        assert!(output.contains("wants pause"));
    }

    #[tokio::test]
    async fn negative_duration_is_rejected() {
        let command = SimulateCommand::new(
            Arc::new(Config::default()),
            SimulateArgs {
                duration: -1.0,
                ..args(&["/a.mp3"])
            },
        );

        assert!(matches!(
            command.execute().await,
            Err(CliError::InvalidArguments(_))
        ));
    }
}
