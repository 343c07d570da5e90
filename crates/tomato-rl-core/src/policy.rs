//! Policy abstractions for action selection

use async_trait::async_trait;

use crate::{Action, Observation};

/// Core policy trait for selecting actions.
///
/// Policies are asynchronous so that they can be backed by an external
/// model server; the environments they drive are not.
#[async_trait]
pub trait Policy: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;

    /// Select an action given an observation
    async fn act(&self, observation: &Self::Observation) -> crate::Result<Self::Action>;

    /// Called before the first action of every episode
    async fn begin_episode(&self) -> crate::Result<()> {
        Ok(())
    }

    /// Human-readable policy name used in reports
    fn name(&self) -> &str {
        "policy"
    }
}

#[async_trait]
impl<P> Policy for Box<P>
where
    P: Policy + ?Sized,
{
    type Observation = P::Observation;
    type Action = P::Action;

    async fn act(&self, observation: &Self::Observation) -> crate::Result<Self::Action> {
        (**self).act(observation).await
    }

    async fn begin_episode(&self) -> crate::Result<()> {
        (**self).begin_episode().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
