use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::chart::{self, Trend};
use crate::client::{FetchFailure, RemoteClient};
use crate::models::{PredictionRecord, PredictionResult, StudentProfile};
use crate::progress::{self, ArcGeometry};
use crate::status::{self, Category};

pub const FALLBACK_ERROR: &str =
    "Failed to load dashboard data. Please complete your profile first.";

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardViewState {
    Loading,
    Error(String),
    Ready {
        profile: StudentProfile,
        history: Vec<PredictionRecord>,
        prediction: PredictionResult,
    },
}

impl DashboardViewState {
    pub fn summary(&self) -> Option<DashboardSummary> {
        match self {
            DashboardViewState::Ready {
                profile,
                history,
                prediction,
            } => Some(DashboardSummary::derive(profile, history, prediction)),
            DashboardViewState::Loading | DashboardViewState::Error(_) => None,
        }
    }
}

/// Server message when there is a non-empty one, otherwise the fixed text.
pub fn resolve_message(failure: &FetchFailure) -> String {
    failure
        .server_message()
        .filter(|message| !message.is_empty())
        .unwrap_or(FALLBACK_ERROR)
        .to_string()
}

struct Holder {
    generation: u64,
    state: DashboardViewState,
}

/// Runs load cycles against a [`RemoteClient`] and owns the single view
/// state. A newer `load` supersedes older ones; a superseded cycle never
/// writes its outcome.
pub struct Dashboard<C> {
    client: C,
    holder: Mutex<Holder>,
}

impl<C: RemoteClient> Dashboard<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            holder: Mutex::new(Holder {
                generation: 0,
                state: DashboardViewState::Loading,
            }),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DashboardViewState {
        self.lock().state.clone()
    }

    /// Runs one cycle and returns the state current when it finishes.
    pub async fn load(&self) -> DashboardViewState {
        let generation = {
            let mut holder = self.lock();
            holder.generation += 1;
            holder.state = DashboardViewState::Loading;
            holder.generation
        };
        info!(generation, "dashboard load started");

        let next = match self.fetch_all().await {
            Ok((profile, history, prediction)) => DashboardViewState::Ready {
                profile,
                history,
                prediction,
            },
            Err(failure) => {
                warn!(generation, error = %failure, "dashboard load failed");
                DashboardViewState::Error(resolve_message(&failure))
            }
        };

        let mut holder = self.lock();
        if holder.generation != generation {
            debug!(
                generation,
                latest = holder.generation,
                "dropping result of superseded load"
            );
            return holder.state.clone();
        }
        let ready = matches!(next, DashboardViewState::Ready { .. });
        info!(generation, ready, "dashboard load settled");
        holder.state = next.clone();
        next
    }

    /// Waits for the next tick, then runs a full cycle. A cycle slower than
    /// the period pushes the following tick back rather than being cut short.
    pub async fn reload_on(&self, ticker: &mut Interval) -> DashboardViewState {
        ticker.tick().await;
        self.load().await
    }

    async fn fetch_all(
        &self,
    ) -> Result<(StudentProfile, Vec<PredictionRecord>, PredictionResult), FetchFailure> {
        let (profile, history) =
            tokio::try_join!(self.client.fetch_profile(), self.client.fetch_history())?;
        let prediction = self.client.request_prediction().await?;
        Ok((profile, history, prediction))
    }

    fn lock(&self) -> MutexGuard<'_, Holder> {
        self.holder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn reload_ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Everything the dashboard displays, derived from a `Ready` state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub email: Option<String>,
    pub percentage: f64,
    pub arc: ArcGeometry,
    pub label: Option<String>,
    pub category: Category,
    pub profile: StudentProfile,
    pub explanations: Vec<String>,
    pub recommendations: Vec<String>,
    pub trend: Trend,
}

impl DashboardSummary {
    pub fn derive(
        profile: &StudentProfile,
        history: &[PredictionRecord],
        prediction: &PredictionResult,
    ) -> Self {
        let percentage = (prediction.probability * 100.0).round();
        Self {
            email: profile.email().map(str::to_string),
            percentage,
            arc: progress::compute_arc(percentage),
            label: prediction.label.clone(),
            category: status::classify(prediction.label.as_deref()),
            profile: profile.clone(),
            explanations: prediction.explanations.clone(),
            recommendations: prediction.recommendations.clone(),
            trend: chart::trend(chart::build_series(history)),
        }
    }
}
