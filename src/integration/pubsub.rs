use std::env;

use log::warn;

use crate::event;

#[derive(Clone)]
pub struct Config {
    host: String,
    port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 4222,
        }
    }
}

impl Config {
    pub fn env() -> Option<Self> {
        let Ok(host) = env::var("NATS_HOST") else {
            warn!("NATS_HOST is not set, falling back to defaults");
            return None;
        };

        match env::var("NATS_PORT")
            .unwrap_or_else(|_| "4222".to_string())
            .parse()
        {
            Ok(port) => Some(Self { host, port }),
            Err(e) => {
                warn!("invalid NATS_PORT: {e}");
                None
            }
        }
    }

    pub async fn connect(&self) -> async_nats::Client {
        match async_nats::connect(&format!("{}:{}", self.host, self.port)).await {
            Ok(client) => client,
            Err(e) => panic!("Failed to connect to NATS: {e}"),
        }
    }
}

impl async_nats::subject::ToSubject for &event::Subject<'_> {
    fn to_subject(&self) -> async_nats::Subject {
        self.to_string().into()
    }
}
