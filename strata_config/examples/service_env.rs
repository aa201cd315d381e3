//! Example service bootstrap layering baked-in defaults, an optional
//! settings file, and the process environment.
//!
//! Run it plain for the defaults, or override a key first:
//!
//! ```sh
//! STRATA_DEMO_SERVICE__PORT=9000 cargo run --example service_env
//! ```

use std::io::{self, Write};

use strata_config::{Config, Dict, EnvLoader, JsonFile, Loader, StrataResult, Value};

/// Baked-in fallbacks used when no other source supplies a key.
struct Defaults;

impl Loader for Defaults {
    fn load(&self) -> StrataResult<Dict> {
        Ok(Dict::from([(
            "service".to_owned(),
            Value::from(Dict::from([
                ("host".to_owned(), Value::from("127.0.0.1")),
                ("port".to_owned(), Value::from(8080_i64)),
                ("timeout".to_owned(), Value::from(2.5_f64)),
            ])),
        )]))
    }
}

#[derive(Debug, Default)]
struct Settings {
    host: String,
    port: i64,
    timeout: f64,
}

/// Resolves every setting in one atomic batch: either all fields fill or
/// the error names the first key that could not be resolved.
fn load_settings(config: &Config) -> StrataResult<Settings> {
    let mut settings = Settings::default();
    config.bind(|binder| {
        binder.bind_string(&mut settings.host, "service:host");
        binder.bind_int(&mut settings.port, "service:port");
        binder.bind_float(&mut settings.timeout, "service:timeout");
    })?;
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    let mut config = Config::new();
    config.add(Defaults);
    config.add(JsonFile::optional("service.json"));
    config.add(EnvLoader::prefixed("STRATA_DEMO_"));
    config.load()?;

    let settings = load_settings(&config)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "listening on {}:{}", settings.host, settings.port)?;
    writeln!(stdout, "request timeout: {}s", settings.timeout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, ensure};

    #[test]
    #[expect(
        clippy::float_cmp,
        reason = "fixture values are exactly representable; lookups perform no arithmetic"
    )]
    fn defaults_satisfy_every_binding() -> Result<()> {
        let mut config = Config::new();
        config.add(Defaults);
        config.load().context("load baked-in defaults")?;

        let settings = load_settings(&config).context("bind settings")?;
        ensure!(
            settings.host == "127.0.0.1",
            "unexpected host {}",
            settings.host
        );
        ensure!(settings.port == 8080, "unexpected port {}", settings.port);
        ensure!(
            settings.timeout == 2.5,
            "unexpected timeout {}",
            settings.timeout
        );
        Ok(())
    }
}
