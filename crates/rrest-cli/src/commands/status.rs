//! `rrest status`: query a running gateway and its ledger peer.

use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use super::{read_reply, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the gateway.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct ConnectedResponse {
    connected: bool,
}

#[derive(Deserialize)]
struct ServerStatusResponse {
    rippled_server_url: String,
    rippled_server_status: Value,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    println!("Querying gateway status at {}...", args.endpoint);
    println!();

    let client = reqwest::Client::new();
    let connected = match client
        .get(format!("{}/v1/server/connected", args.endpoint))
        .send()
        .await
    {
        Ok(resp) => read_reply::<ConnectedResponse>(resp).await?.connected,
        Err(e) => {
            println!("Could not reach gateway at {}", args.endpoint);
            println!("  Error: {}", e);
            println!();
            println!("Is the gateway running? Start it with: rrest-node");
            return Ok(());
        }
    };

    println!("Gateway Status:");
    println!("  Endpoint:  {}", args.endpoint);
    println!("  Connected: {}", connected);

    if !connected {
        return Ok(());
    }

    let resp = client
        .get(format!("{}/v1/server", args.endpoint))
        .send()
        .await?;
    let server: ServerStatusResponse = read_reply(resp).await?;
    let info = &server.rippled_server_status;
    println!("  Peer:      {}", server.rippled_server_url);
    println!("  State:     {}", field(info, "server_state"));
    println!("  Version:   {}", field(info, "build_version"));
    println!("  Ledgers:   {}", field(info, "complete_ledgers"));

    Ok(())
}

fn field<'a>(info: &'a Value, name: &str) -> &'a str {
    info.get(name).and_then(Value::as_str).unwrap_or("-")
}
