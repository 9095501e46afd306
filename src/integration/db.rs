use std::env;
use std::time::Duration;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::info;

use crate::integration::{self, Result};

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Clone)]
pub struct Config {
    host: String,
    port: u16,
    user: String,
    password: String,
    db: String,
    pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 5432,
            user: String::from("postgres"),
            password: String::from("postgres"),
            db: String::from("messenger"),
            pool_size: 10,
        }
    }
}

impl Config {
    pub fn env() -> Result<Self> {
        let host = env::var("PG_HOST")?;
        let port = env::var("PG_PORT")?.parse()?;
        let user = env::var("PG_USER")?;
        let password = env::var("PG_PASSWORD")?;
        let db = env::var("PG_DB")?;
        let pool_size = env::var("PG_POOL_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;

        Ok(Self {
            host,
            port,
            user,
            password,
            db,
            pool_size,
        })
    }

    fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.db
        )
    }

    pub fn connect(&self) -> Result<Pool> {
        let manager = ConnectionManager::<PgConnection>::new(self.url());
        let pool = r2d2::Pool::builder()
            .max_size(self.pool_size)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        Ok(pool)
    }
}

pub fn init(config: &Config) -> Pool {
    let pool = match config.connect() {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to connect to Postgres: {e}"),
    };

    if let Err(e) = migrate(&pool) {
        panic!("Failed to migrate Postgres: {e}");
    }

    pool
}

pub fn migrate(pool: &Pool) -> Result<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| integration::Error::Migration(e.to_string()))?;

    info!("applied {} pending migration(s)", applied.len());
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use testcontainers_modules::postgres::Postgres;
    use testcontainers_modules::testcontainers::ContainerAsync;
    use testcontainers_modules::testcontainers::runners::AsyncRunner;

    use super::{Config, Pool};

    pub struct TestContainer {
        _pg: ContainerAsync<Postgres>,
        pub pool: Pool,
    }

    impl TestContainer {
        pub async fn init() -> Self {
            let pg = Postgres::default().start().await.unwrap();

            let config = Config {
                host: pg.get_host().await.unwrap().to_string(),
                port: pg.get_host_port_ipv4(5432).await.unwrap(),
                db: String::from("postgres"),
                ..Config::default()
            };

            let pool = config.connect().unwrap();
            super::migrate(&pool).unwrap();

            Self { _pg: pg, pool }
        }
    }
}
