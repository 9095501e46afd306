use std::env;
use std::fmt;

use log::error;
use redis::AsyncCommands;

use crate::integration::{self, Result};

#[derive(Clone)]
pub struct Config {
    host: String,
    port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 6379,
        }
    }
}

impl Config {
    pub fn env() -> Result<Self> {
        let host = env::var("REDIS_HOST")?;
        let port = env::var("REDIS_PORT")?.parse()?;
        Ok(Self { host, port })
    }

    pub async fn connect(&self) -> Result<Redis> {
        let con = redis::Client::open(format!("redis://{}:{}", &self.host, &self.port))?
            .get_connection_manager()
            .await
            .map_err(integration::Error::from)?;

        Ok(Redis { con })
    }
}

pub async fn init(config: &Config) -> Redis {
    match config.connect().await {
        Ok(redis) => redis,
        Err(e) => panic!("Failed to connect to Redis: {e}"),
    }
}

pub enum Key<'a> {
    Session(&'a str),
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Session(sid) => write!(f, "session:{sid}"),
        }
    }
}

#[derive(Clone)]
pub struct Redis {
    con: redis::aio::ConnectionManager,
}

impl Redis {
    pub async fn get<T>(&self, key: Key<'_>) -> Option<T>
    where
        T: redis::FromRedisValue + Send + 'static,
    {
        let mut con = self.con.clone();
        match con.get::<_, Option<T>>(key.to_string()).await {
            Ok(value) => value,
            Err(e) => {
                error!("failed to read cache entry: {e:?}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn should_format_session_key() {
        assert_eq!(Key::Session("abc").to_string(), "session:abc");
    }
}
