//! `smalltalk serve` - Start the HTTP chat gateway.

use smalltalk_config::AppConfig;

pub async fn run(
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("SmallTalk Gateway");
    println!("   Listening:   http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Reply:       {}", config.reply.backend);
    println!("   Profiles:    {}", config.profiles.source);
    println!("   Max dialogs: {}", config.storage.max_dialogs);
    if config.gateway.secure_cookie {
        println!("   Cookie:      Secure (set [gateway] secure_cookie = false for plain http)");
    }

    smalltalk_gateway::start(config).await?;

    Ok(())
}
