use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};

use super::{Notification, Subject};

#[async_trait]
pub trait EventService {
    async fn publish(&self, subject: &Subject<'_>, noti: &Notification) -> super::Result<()>;
}

#[derive(Clone)]
pub struct NatsEventService {
    pubsub: async_nats::Client,
}

impl NatsEventService {
    pub fn new(pubsub: async_nats::Client) -> Self {
        Self { pubsub }
    }
}

#[async_trait]
impl EventService for NatsEventService {
    async fn publish(&self, subject: &Subject<'_>, noti: &Notification) -> super::Result<()> {
        if !subject.is_valid() {
            return Err(super::Error::InvalidSubject(subject.to_string()));
        }

        let payload = serde_json::to_vec(noti)?;
        self.pubsub.publish(subject, payload.into()).await?;
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct Failure {
    pub subject: String,
    pub reason: String,
}

/// Outcome of a fan-out. Every subject ends up in exactly one of the lists.
#[derive(Debug, Default, PartialEq)]
pub struct Delivery {
    pub delivered: Vec<String>,
    pub failed: Vec<Failure>,
}

/// Publishes the same notification to every subject concurrently.
///
/// A failing subject never prevents delivery to the others and never fails
/// the fan-out itself; failures are logged and reported in [`Delivery`].
pub async fn fan_out(
    event_service: &(dyn EventService + Send + Sync),
    subjects: &[Subject<'_>],
    noti: &Notification,
) -> Delivery {
    let results = join_all(subjects.iter().map(|subject| async move {
        (subject.to_string(), event_service.publish(subject, noti).await)
    }))
    .await;

    let mut delivery = Delivery::default();
    for (subject, result) in results {
        match result {
            Ok(()) => delivery.delivered.push(subject),
            Err(e) => {
                warn!("failed to publish {} to {subject}: {e}", noti.name());
                delivery.failed.push(Failure {
                    subject,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        "{} delivered to {}/{} subject(s)",
        noti.name(),
        delivery.delivered.len(),
        subjects.len()
    );

    delivery
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// Records every accepted publish; subjects listed in `failing_for`
    /// are rejected.
    #[derive(Default)]
    pub struct RecordingEventService {
        published: Mutex<Vec<(String, Notification)>>,
        failing_for: HashSet<String>,
    }

    impl RecordingEventService {
        pub fn failing_for(subjects: &[&str]) -> Self {
            Self {
                failing_for: subjects.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn published(&self) -> Vec<(String, Notification)> {
            self.published.lock().unwrap().clone()
        }

        pub fn subjects(&self) -> Vec<String> {
            self.published().into_iter().map(|(s, _)| s).collect()
        }
    }

    #[async_trait]
    impl EventService for RecordingEventService {
        async fn publish(
            &self,
            subject: &Subject<'_>,
            noti: &Notification,
        ) -> super::super::Result<()> {
            let subject = subject.to_string();
            if self.failing_for.contains(&subject) {
                return Err(super::super::Error::InvalidSubject(subject));
            }

            self.published.lock().unwrap().push((subject, noti.clone()));
            Ok(())
        }
    }
}
