//! Resolve `credhub-ref` entries in `VCAP_SERVICES`
//!
//! ```text
//! CREDHUB_SERVER=https://credhub.service.cf.internal:8844 \
//! CREDHUB_CLIENT=... CREDHUB_SECRET=... \
//! cargo run --example interpolate_vcap
//! ```

use credhub_sdk::{collect_references, ClientBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let vcap = std::env::var("VCAP_SERVICES").unwrap_or_else(|_| {
        r#"{"p-config-server":[{"credentials":{"credhub-ref":"/c/demo/config"},"name":"config"}]}"#
            .to_string()
    });

    let document: serde_json::Value = serde_json::from_str(&vcap)?;
    for reference in collect_references(&document) {
        println!("{} -> {}", reference.pointer, reference.name);
    }

    let client = ClientBuilder::new(std::env::var("CREDHUB_SERVER")?)
        .client_credentials(
            std::env::var("CREDHUB_CLIENT")?,
            std::env::var("CREDHUB_SECRET")?,
        )
        .build()?;

    let resolved = client.interpolate_credentials(&vcap).await?;
    println!("{}", resolved);

    Ok(())
}
