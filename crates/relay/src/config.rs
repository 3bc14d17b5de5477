/// Relay configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against the
/// dashboard. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bind address for both listeners (default: `0.0.0.0`).
    pub host: String,
    /// TCP port the vehicle DAQ streams telemetry to (default: `12000`).
    pub ingest_port: u16,
    /// WebSocket port dashboard subscribers connect to (default: `8080`).
    pub subscriber_port: u16,
}

impl RelayConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default   |
    /// |-------------------|-----------|
    /// | `HOST`            | `0.0.0.0` |
    /// | `INGEST_PORT`     | `12000`   |
    /// | `SUBSCRIBER_PORT` | `8080`    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let ingest_port: u16 = std::env::var("INGEST_PORT")
            .unwrap_or_else(|_| "12000".into())
            .parse()
            .expect("INGEST_PORT must be a valid u16");

        let subscriber_port: u16 = std::env::var("SUBSCRIBER_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("SUBSCRIBER_PORT must be a valid u16");

        Self {
            host,
            ingest_port,
            subscriber_port,
        }
    }
}
