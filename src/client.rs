use std::env;

use clickhouse::Client;

fn read_env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Build a ClickHouse client from `HIERFLAT_URL`, `HIERFLAT_USER`,
/// `HIERFLAT_PASSWORD` and `HIERFLAT_DATABASE`, typically loaded from a
/// `.env` file beforehand. Returns `None` when any key is missing.
pub fn try_client_from_env() -> Option<Client> {
    let url = read_env_var("HIERFLAT_URL")?;
    let user = read_env_var("HIERFLAT_USER")?;
    let password = read_env_var("HIERFLAT_PASSWORD")?;
    let database = read_env_var("HIERFLAT_DATABASE")?;

    log::info!("Connecting to: {}...", url);
    Some(
        Client::default()
            .with_url(url)
            .with_user(user)
            .with_password(password)
            .with_database(database)
            // Return NULL for unmatched LEFT JOIN columns. The text lookup
            // joins depend on this: an unmatched level must yield NULL, not
            // an empty string.
            .with_option("join_use_nulls", "1"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_keys() {
        for key in [
            "HIERFLAT_URL",
            "HIERFLAT_USER",
            "HIERFLAT_PASSWORD",
            "HIERFLAT_DATABASE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn missing_keys_yield_no_client() {
        clear_keys();
        env::set_var("HIERFLAT_URL", "http://localhost:8123");
        assert!(try_client_from_env().is_none());
        clear_keys();
    }

    #[test]
    #[serial]
    fn full_environment_yields_client() {
        clear_keys();
        env::set_var("HIERFLAT_URL", "http://localhost:8123");
        env::set_var("HIERFLAT_USER", "default");
        env::set_var("HIERFLAT_PASSWORD", "");
        env::set_var("HIERFLAT_DATABASE", "sapbw");
        assert!(try_client_from_env().is_some());
        clear_keys();
    }
}
