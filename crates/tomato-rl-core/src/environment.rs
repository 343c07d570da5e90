//! Environment traits and types

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Action, ActionSpace, Observation, ObservationSpace, Reward};

/// Result of a single environment step
#[derive(Debug, Clone, Serialize)]
pub struct Step<O, I> {
    /// Observation from the environment
    pub observation: O,
    /// Reward signal
    pub reward: Reward,
    /// Whether the task was completed on this step
    pub terminated: bool,
    /// Whether the episode was cut off by the horizon
    pub truncated: bool,
    /// Additional info from the environment
    pub info: I,
}

impl<O, I> Step<O, I> {
    /// Whether the episode has ended, by termination or truncation
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: String,
    /// Total reward
    pub total_reward: f64,
    /// Number of steps
    pub steps: usize,
    /// Whether the episode ended by completing the task
    pub terminated: bool,
    /// Whether the episode was truncated
    pub truncated: bool,
    /// Start time
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// End time
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl Episode {
    fn start() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            total_reward: 0.0,
            steps: 0,
            terminated: false,
            truncated: false,
            start_time: chrono::Utc::now(),
            end_time: None,
        }
    }

    /// Whether the episode has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Core environment trait.
///
/// Environments are synchronous state machines: `reset` and `step` run to
/// completion before returning and every instance owns its state
/// exclusively. Parallel rollouts use independent instances.
pub trait Environment: Send {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;
    /// Per-step info record
    type Info: Clone + Send;
    /// Observation space type
    type ObservationSpace: ObservationSpace<Observation = Self::Observation>;
    /// Action space type
    type ActionSpace: ActionSpace<Action = Self::Action>;

    /// Get the observation space
    fn observation_space(&self) -> Self::ObservationSpace;

    /// Get the action space
    fn action_space(&self) -> Self::ActionSpace;

    /// Reset the environment and return the initial observation
    fn reset(&mut self) -> crate::Result<Self::Observation>;

    /// Take a step in the environment
    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation, Self::Info>>;

    /// Render the environment as text
    fn render(&self) -> crate::Result<String> {
        Ok(String::new())
    }
}

/// Wrapper for environments that tracks episodes
pub struct TrackedEnvironment<E> {
    /// Inner environment
    env: E,
    /// Current episode
    episode: Option<Episode>,
}

impl<E> TrackedEnvironment<E> {
    /// Create a new tracked environment
    pub fn new(env: E) -> Self {
        Self { env, episode: None }
    }

    /// Read-only access to the wrapped environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Unwrap the inner environment
    pub fn into_inner(self) -> E {
        self.env
    }

    /// Get current episode info
    pub fn episode(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }
}

impl<E> Environment for TrackedEnvironment<E>
where
    E: Environment,
{
    type Observation = E::Observation;
    type Action = E::Action;
    type Info = E::Info;
    type ObservationSpace = E::ObservationSpace;
    type ActionSpace = E::ActionSpace;

    fn observation_space(&self) -> Self::ObservationSpace {
        self.env.observation_space()
    }

    fn action_space(&self) -> Self::ActionSpace {
        self.env.action_space()
    }

    fn reset(&mut self) -> crate::Result<Self::Observation> {
        // End current episode if exists
        if let Some(ref mut episode) = self.episode {
            if episode.end_time.is_none() {
                episode.end_time = Some(chrono::Utc::now());
            }
        }

        let episode = Episode::start();
        debug!(episode_id = %episode.id, "starting episode");
        self.episode = Some(episode);

        self.env.reset()
    }

    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation, Self::Info>> {
        let step = self.env.step(action)?;

        if let Some(ref mut episode) = self.episode {
            episode.total_reward += step.reward.0;
            episode.steps += 1;

            if step.is_done() && episode.end_time.is_none() {
                episode.terminated = step.terminated;
                episode.truncated = step.truncated;
                episode.end_time = Some(chrono::Utc::now());
                debug!(
                    episode_id = %episode.id,
                    steps = episode.steps,
                    total_reward = episode.total_reward,
                    terminated = episode.terminated,
                    truncated = episode.truncated,
                    "episode finished"
                );
            }
        }

        Ok(step)
    }

    fn render(&self) -> crate::Result<String> {
        self.env.render()
    }
}
