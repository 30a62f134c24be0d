use tokio::sync::OnceCell;

static APP: OnceCell<AppConfig> = OnceCell::const_new();

const DEFAULT_PORT: u16 = 5000;

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub graphiql: bool,
}

impl AppConfig {
    fn new() -> anyhow::Result<Self> {
        let port = resolve_port(std::env::var("PORT").ok());

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|err| anyhow::anyhow!("cannot read `DATABASE_URL`: {err}"))?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|err| anyhow::anyhow!("cannot read `JWT_SECRET`: {err}"))?;

        let graphiql = std::env::var("GRAPHIQL")
            .map(|value| value == "true" || value == "1")
            .unwrap_or(false);

        Ok(AppConfig {
            port,
            database_url,
            jwt_secret,
            graphiql,
        })
    }

    pub async fn get() -> anyhow::Result<AppConfig> {
        APP.get_or_try_init(|| async { AppConfig::new() })
            .await
            .map(Clone::clone)
    }
}

fn resolve_port(raw: Option<String>) -> u16 {
    let Some(raw) = raw else {
        tracing::warn!("cannot read `PORT`, defaulting to {DEFAULT_PORT}");

        return DEFAULT_PORT;
    };

    raw.parse().unwrap_or_else(|err| {
        tracing::error!("cannot parse `PORT` ({err}), defaulting to {DEFAULT_PORT}");

        DEFAULT_PORT
    })
}
