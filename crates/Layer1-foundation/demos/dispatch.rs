//! 이벤트 레지스트리 데모
//!
//! `RUST_LOG=trace cargo run -p eventreg-foundation --example dispatch`

use eventreg_foundation::{args, EventRegistry, Listener, RegistryConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let registry = Arc::new(EventRegistry::with_config(
        RegistryConfig::new().name("demo").trace_dispatch(true),
    ));

    // 가변 인자 리스너
    registry.on(
        "log",
        Listener::variadic(|level: String, codes: Vec<i32>| -> anyhow::Result<()> {
            println!("[{}] codes={:?}", level, codes);
            Ok(())
        })
        .with_name("printer"),
    )?;

    // 리스너 안에서 같은 레지스트리로 재발행
    let inner = registry.clone();
    registry.on(
        "user.saved",
        Listener::new(move |id: u64| -> anyhow::Result<()> {
            inner.emit("log", &args!["INFO".to_string(), id as i32])?;
            Ok(())
        })
        .with_name("audit"),
    )?;

    registry.on(
        "user.saved",
        Listener::new(|id: u64| -> anyhow::Result<()> {
            if id == 0 {
                anyhow::bail!("user id 0 is reserved");
            }
            Ok(())
        })
        .with_name("guard"),
    )?;

    registry.emit("user.saved", &args![42u64])?;

    if let Err(e) = registry.emit("user.saved", &args![0u64]) {
        println!("dispatch stopped: {}", e);
    }

    if let Err(e) = registry.emit("user.saved", &args!["42".to_string()]) {
        println!("misuse detected: {}", e);
    }

    println!("events: {:?}", registry.names());
    println!("stats: {}", serde_json::to_string(&registry.stats())?);

    registry.clear();
    Ok(())
}
