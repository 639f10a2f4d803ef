//! Basic usage example for the CredHub SDK

use credhub_sdk::{
    Client, ClientBuilder, Credential, CredentialType, CredentialValue, OverwriteMode, Permission,
    UserValue, VersionSelection,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = create_client()?;

    println!("=== Example 1: Server ===");
    server_example(&client).await?;

    println!("\n=== Example 2: Set and read back ===");
    set_example(&client).await?;

    println!("\n=== Example 3: Generate and regenerate ===");
    generate_example(&client).await?;

    println!("\n=== Example 4: Versions ===");
    versions_example(&client).await?;

    println!("\n=== Example 5: Permissions ===");
    permissions_example(&client).await?;

    println!("\n=== Example 6: Find and delete ===");
    cleanup_example(&client).await?;

    Ok(())
}

fn create_client() -> Result<Client, Box<dyn std::error::Error>> {
    // Get configuration from environment
    let base_url = std::env::var("CREDHUB_SERVER")
        .unwrap_or_else(|_| "https://credhub.example.com:8844".to_string());
    let client_id =
        std::env::var("CREDHUB_CLIENT").unwrap_or_else(|_| "credhub_client".to_string());
    let client_secret =
        std::env::var("CREDHUB_SECRET").unwrap_or_else(|_| "demo-secret".to_string());
    let skip_tls = std::env::var("CREDHUB_SKIP_TLS_VALIDATION").is_ok();

    let client = ClientBuilder::new(base_url)
        .client_credentials(client_id, client_secret)
        .skip_tls_verify(skip_tls)
        .user_agent_extra("demos/1.0")
        .build()?;

    Ok(client)
}

async fn server_example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    let info = client.info().await?;
    println!("Auth server: {}", info.auth_server.url);

    let version = client.server_version().await?;
    println!("CredHub version: {}", version.version);

    Ok(())
}

async fn set_example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    let cred = Credential::new(
        "/demo/db-user",
        CredentialValue::User(UserValue {
            username: "admin".to_string(),
            password: "change-me".to_string(),
            password_hash: String::new(),
        }),
    );

    let stored = client.set(&cred, OverwriteMode::Converge, &[]).await?;
    println!("Stored {} version {}", stored.name, stored.id);

    let latest = client.get_latest_by_name("/demo/db-user").await?;
    let user = latest.as_user()?;
    println!("Username: {}", user.username);

    Ok(())
}

async fn generate_example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    let generated = client
        .generate(
            "/demo/api-password",
            CredentialType::Password,
            json!({"length": 40, "exclude_special": true}),
        )
        .await?;
    println!("Generated version {}", generated.id);

    let regenerated = client.regenerate("/demo/api-password").await?;
    println!("Regenerated version {}", regenerated.id);

    Ok(())
}

async fn versions_example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    let versions = client
        .get_by_name("/demo/api-password", VersionSelection::MostRecent(2))
        .await?;

    for v in &versions {
        println!("{} created at {}", v.id, v.created);
    }

    Ok(())
}

async fn permissions_example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    let reader = Permission::new("mtls-app:5532f504-bb3f-4d26-9bd4-c6f9b5b1f7d5", ["read"]);
    let permissions = client.add_permissions("/demo/db-user", &[reader]).await?;
    println!("{} grants on /demo/db-user", permissions.len());

    client
        .delete_permissions("/demo/db-user", "mtls-app:5532f504-bb3f-4d26-9bd4-c6f9b5b1f7d5")
        .await?;

    Ok(())
}

async fn cleanup_example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    for summary in client.find_by_path("/demo").await? {
        println!("Deleting {}", summary.name);
        client.delete(&summary.name).await?;
    }

    Ok(())
}
