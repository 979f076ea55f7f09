use anyhow::Context;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_AUTH_USER: &str = "task_master";
const DEFAULT_AUTH_PASSWORD: &str = "MasterOfTasks";

/// Server configuration, read once from the environment at startup. The
/// persistence file path is the core's concern (`TASK_MASTER_STORE_PATH`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub auth_user: String,
    pub auth_password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env_or("TASK_MASTER_HOST", DEFAULT_HOST);
        let port = match std::env::var("TASK_MASTER_PORT") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .with_context(|| format!("TASK_MASTER_PORT is not a port number: {raw}"))?,
            _ => DEFAULT_PORT,
        };
        let auth_user = env_or("TASK_MASTER_AUTH_USER", DEFAULT_AUTH_USER);
        let auth_password = env_or("TASK_MASTER_AUTH_PASSWORD", DEFAULT_AUTH_PASSWORD);

        Ok(Self {
            host,
            port,
            auth_user,
            auth_password,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}
