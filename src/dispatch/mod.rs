//! Dispatch loop.
//!
//! Polls a channel for its latest message, runs it through the auto-reply
//! engine and answers when rooms can be granted. A grant only takes effect
//! once the reply is sent: a failed send leaves the state untouched so the
//! next poll offers the same request again. The new vacancy counter is saved
//! after the grant is committed.
//! Wakes on a fixed interval and exits when the shutdown watch flips.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::autoreply::{AutoReplyEngine, Decision, DispatchState, MatchContext};
use crate::channels::{ChannelError, DynChannel, MessageContent};
use crate::config::VacancyStore;

/// Errors raised by a single dispatch tick
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Drives one channel through the auto-reply engine
pub struct Dispatcher {
    engine: Arc<AutoReplyEngine>,
    channel: DynChannel,
    store: Arc<dyn VacancyStore>,
    state: DispatchState,
}

impl Dispatcher {
    pub fn new(
        engine: Arc<AutoReplyEngine>,
        channel: DynChannel,
        store: Arc<dyn VacancyStore>,
        state: DispatchState,
    ) -> Self {
        Self {
            engine,
            channel,
            store,
            state,
        }
    }

    /// Current dispatch state
    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Run one poll iteration. Returns `None` when no message is visible.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Result<Option<Decision>, DispatchError> {
        let chat_name = self.engine.get_config().chat_group_name;

        let current = self.channel.current_chat().await?;
        if current.as_deref() != Some(chat_name.as_str()) {
            info!(
                current = current.as_deref().unwrap_or("<none>"),
                chat = %chat_name,
                "Not in the configured chat, re-selecting"
            );
            self.channel.select_chat(&chat_name).await?;
        }

        let text = match self.channel.fetch_latest_message().await? {
            Some(text) => text,
            None => return Ok(None),
        };

        let ctx = MatchContext::new(text, now);
        let decision = self.engine.process_message(&mut self.state, &ctx);

        match &decision {
            Decision::Duplicate => {}
            Decision::CriteriaUnmet | Decision::NoRoomsRequested => {
                debug!(decision = %decision, digest = %ctx.digest(), "Not responding");
            }
            Decision::RateLimited => {
                info!("Response limit reached, waiting for the next window");
            }
            Decision::InsufficientRooms { requested, vacant } => {
                warn!(requested, vacant, "Insufficient vacant rooms, not responding");
            }
            Decision::Reply {
                text,
                requested,
                ..
            } => {
                self.channel
                    .send_message(MessageContent::Text(text.clone()))
                    .await?;
                let remaining = self.engine.commit_reply(&mut self.state, &ctx, *requested);
                info!(requested, remaining, "Responded to room request");

                if let Err(e) = self.store.save_vacancy(remaining) {
                    error!(error = %e, remaining, "Failed to persist vacancy counter");
                }
            }
        }

        Ok(Some(decision))
    }

    /// Poll every `interval` until `shutdown` becomes true. Returns the final state.
    pub async fn run(
        mut self,
        interval: std::time::Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> DispatchState {
        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            channel = %self.channel.info().id,
            vacant = self.state.vacant_rooms(),
            "Dispatcher started"
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        warn!("Shutdown sender dropped, stopping");
                        break;
                    }
                }
            }

            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.tick(Utc::now()).await {
                error!(error = %e, "Dispatch tick failed");
            }
        }

        info!(vacant = self.state.vacant_rooms(), "Dispatcher stopped");
        self.state
    }
}
