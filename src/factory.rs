//! Connection factory stub.
//!
//! A real client factory negotiates a connection and then reports that the
//! client is ready. Here the client exists immediately, and "ready" fires on
//! the next scheduler tick so code written against an asynchronous connect
//! sequence runs unmodified.

use tokio::sync::oneshot;
use tracing::debug;

use crate::client::Client;
use crate::config::Config;

#[derive(Debug)]
pub struct Factory {
    client: Client,
    signal: oneshot::Receiver<bool>,
    ready: Option<bool>,
}

impl Factory {
    /// Builds the client and schedules the ready signal.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, because the ready signal is
    /// sent from a spawned task.
    pub fn new(config: Config) -> Self {
        let client = Client::new(config);
        let (tx, signal) = oneshot::channel();
        let db = client.database();
        tokio::spawn(async move {
            debug!(db, "client ready");
            let _ = tx.send(true);
        });
        Self {
            client,
            signal,
            ready: None,
        }
    }

    /// Creates a factory and waits for its ready signal.
    pub async fn connect(config: Config) -> Client {
        let mut factory = Self::new(config);
        factory.ready().await;
        factory.into_client()
    }

    /// Resolves once the ready signal has fired. The signal is delivered once;
    /// later calls return the same result without waiting. Resolves to `false`
    /// if the runtime dropped the signalling task before it ran.
    pub async fn ready(&mut self) -> bool {
        if let Some(ready) = self.ready {
            return ready;
        }
        let ready = (&mut self.signal).await.unwrap_or(false);
        self.ready = Some(ready);
        ready
    }

    /// The factory's client. Usable before the ready signal fires.
    pub fn client(&mut self) -> &mut Client {
        &mut self.client
    }

    pub fn into_client(self) -> Client {
        self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn new_outside_a_runtime_panics() {
        let _ = Factory::new(Config::default());
    }

    #[tokio::test]
    async fn ready_resolves_true() {
        let mut factory = Factory::new(Config::default());
        assert!(factory.ready().await);
    }

    #[tokio::test]
    async fn ready_is_not_signalled_synchronously() {
        let mut factory = Factory::new(Config::default());
        // The spawned task has not had a tick yet on a current-thread runtime.
        assert!(factory.signal.try_recv().is_err());
        assert!(factory.ready().await);
    }

    #[tokio::test]
    async fn ready_fires_once_and_is_cached() {
        let mut factory = Factory::new(Config::default());
        assert!(factory.ready().await);
        assert!(factory.ready().await);
    }

    #[tokio::test]
    async fn client_usable_before_ready() {
        let mut factory = Factory::new(Config::default());
        factory.client().set("k", "v").await.unwrap();
        assert!(factory.ready().await);
        assert_eq!(factory.client().get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn connect_passes_config_through() {
        let mut client = Factory::connect(Config::default().with_database(2).with_password("pw")).await;
        assert_eq!(client.database(), 2);
        assert_eq!(client.config().password.as_deref(), Some("pw"));
        client.sadd("s", "m").await.unwrap();
        assert!(client.sismember("s", "m").await.unwrap());
    }

    #[tokio::test]
    async fn factories_hand_out_independent_clients() {
        let mut a = Factory::connect(Config::default()).await;
        let mut b = Factory::connect(Config::default()).await;
        a.set("k", "v").await.unwrap();
        assert_eq!(b.exists("k").await.unwrap(), 0);
    }
}
