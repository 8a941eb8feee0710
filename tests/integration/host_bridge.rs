//! JSON-lines bridge driving a live manager, including fired-alarm events.

use fae_alarm::alarm::time::make_instant;
use fae_alarm::host::run_bridge;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::helpers::fixture_at;

async fn read_json_line<R: tokio::io::AsyncBufRead + Unpin>(reader: &mut R) -> Value {
    let mut line = String::new();
    let n = tokio::time::timeout(std::time::Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("bridge output timed out")
        .expect("read bridge output");
    assert!(n > 0, "bridge closed its output early");
    serde_json::from_str(&line).expect("bridge writes JSON lines")
}

#[tokio::test]
async fn bridge_dispatches_calls_and_forwards_events() {
    let t = make_instant(2025, 6, 1, 10, 0, 0);
    let mut f = fixture_at(t);
    let events = std::mem::replace(&mut f.events, tokio::sync::mpsc::unbounded_channel().1);
    let registry = std::mem::replace(
        &mut f.registry,
        fae_alarm::ToolRegistry::new(fae_alarm::ToolMode::ReadOnly),
    );

    let (mut input, bridge_in) = tokio::io::duplex(4096);
    let (bridge_out, output) = tokio::io::duplex(4096);
    let bridge = tokio::spawn(run_bridge(
        BufReader::new(bridge_in),
        bridge_out,
        registry,
        events,
    ));
    let mut output = BufReader::new(output);

    input
        .write_all(b"{\"id\":\"r1\",\"tool\":\"self.alarm.add\",\"arguments\":{\"type\":\"interval\",\"hour\":0,\"minute\":0,\"interval\":5,\"label\":\"tea\"}}\n")
        .await
        .unwrap();
    let added = read_json_line(&mut output).await;
    assert_eq!(added, json!({"id": "r1", "ok": true, "result": 1}));

    input
        .write_all(b"{\"tool\":\"self.alarm.add\",\"arguments\":{\"type\":\"daily\",\"hour\":25,\"minute\":0}}\n")
        .await
        .unwrap();
    let rejected = read_json_line(&mut output).await;
    assert_eq!(rejected["ok"], false);
    assert_eq!(rejected["error"]["code"], "TOOL_VALIDATION");

    assert!(f.fire_at(t + 5));
    let kinds: Vec<Value> = [
        read_json_line(&mut output).await,
        read_json_line(&mut output).await,
        read_json_line(&mut output).await,
    ]
    .into_iter()
    .map(|line| line["event"]["kind"].clone())
    .collect();
    assert_eq!(
        kinds,
        vec![json!("play_sound"), json!("show_message"), json!("follow_up")]
    );

    input
        .write_all(b"{\"tool\":\"self.alarm.next\"}\n")
        .await
        .unwrap();
    let next = read_json_line(&mut output).await;
    assert_eq!(next["result"]["time"], t + 10);

    drop(input);
    bridge.await.unwrap().unwrap();
}
