use anyhow::Context;
use bridge_client::{BridgeClient, SendOptions};
use bridge_core::ActionId;

use crate::output::print_json;

pub fn run(
    endpoint: &str,
    action: &str,
    payload: Option<&str>,
    method: &str,
    query: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let action = ActionId::new(action)?;

    let mut opts = SendOptions::new().method(method);
    if let Some(raw) = payload {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("--payload is not valid JSON")?;
        opts = opts.payload(value);
    }
    for pair in query {
        let (k, v) = parse_query_pair(pair)?;
        opts = opts.query(k, v);
    }

    let client = BridgeClient::new(endpoint);
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(client.send(&action, opts));

    if json {
        print_json(&result)?;
    } else if result.ok {
        let data = result.data.clone().unwrap_or_default();
        println!("{} → {} ({})", action, result.path.as_deref().unwrap_or("?"), result.status);
        println!("{}", serde_json::to_string_pretty(&data)?);
    }

    if !result.ok {
        anyhow::bail!(
            "{} (status {})",
            result.error.as_deref().unwrap_or("request failed"),
            result.status
        );
    }
    Ok(())
}

fn parse_query_pair(pair: &str) -> anyhow::Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k, v)),
        _ => anyhow::bail!("invalid --query '{pair}': expected KEY=VALUE"),
    }
}
