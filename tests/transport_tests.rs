//! Tests for the framed stdio transport, run over in-memory pipes

use serde_json::{json, Value};
use tokio::io::{
    duplex, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream,
};

async fn send(writer: &mut (impl AsyncWrite + Unpin), message: Value) {
    let body = message.to_string();
    let frame = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
    writer.write_all(frame.as_bytes()).await.unwrap();
}

async fn receive(reader: &mut BufReader<DuplexStream>) -> Value {
    let mut length = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Content-Length: ") {
            length = value.parse().unwrap();
        }
    }

    let mut body = vec![0; length];
    reader.read_exact(&mut body).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read messages until the response to request `id` arrives
async fn response(reader: &mut BufReader<DuplexStream>, id: u64) -> Value {
    loop {
        let message = receive(reader).await;
        if message["id"] == id {
            return message;
        }
    }
}

#[tokio::test]
async fn test_pipelined_messages_are_handled_in_order() {
    let (mut client_tx, server_rx) = duplex(1 << 16);
    let (server_tx, client_rx) = duplex(1 << 16);
    let mut reader = BufReader::new(client_rx);

    let client = async move {
        let initialize = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {"capabilities": {}}
        });
        send(&mut client_tx, initialize).await;
        let initialized = response(&mut reader, 1).await;
        assert_eq!(initialized["result"]["serverInfo"]["name"], "chtl-ls");

        // Everything below is written before any of it is answered
        let uri = "file:///index.chtl";
        for message in [
            json!({"jsonrpc": "2.0", "method": "initialized", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "textDocument/didOpen", "params": {
                "textDocument": {
                    "uri": uri,
                    "languageId": "chtl",
                    "version": 1,
                    "text": "div {  }"
                }
            }}),
            json!({"jsonrpc": "2.0", "method": "textDocument/didChange", "params": {
                "textDocument": {"uri": uri, "version": 2},
                "contentChanges": [{"text": "div { script {  } }"}]
            }}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "textDocument/completion", "params": {
                "textDocument": {"uri": uri},
                "position": {"line": 0, "character": 15}
            }}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "shutdown"}),
            json!({"jsonrpc": "2.0", "method": "exit"}),
        ] {
            send(&mut client_tx, message).await;
        }
        drop(client_tx);

        let completion = response(&mut reader, 2).await;
        let labels: Vec<&str> = completion["result"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["label"].as_str().unwrap())
            .collect();
        assert!(labels.contains(&"listen"));
        assert!(!labels.contains(&"span"));

        let shutdown = response(&mut reader, 3).await;
        assert!(shutdown.get("error").is_none());
    };

    let (clean, ()) = tokio::join!(chtl_ls::serve(server_rx, server_tx), client);
    assert!(clean);
}

#[tokio::test]
async fn test_exit_without_shutdown_is_unclean() {
    let (mut client_tx, server_rx) = duplex(1 << 16);
    let (server_tx, _client_rx) = duplex(1 << 16);

    send(&mut client_tx, json!({"jsonrpc": "2.0", "method": "exit"})).await;
    drop(client_tx);

    assert!(!chtl_ls::serve(server_rx, server_tx).await);
}
