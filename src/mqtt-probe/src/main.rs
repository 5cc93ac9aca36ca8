//! Diagnostic subscriber: dumps everything published under the dummy BLE
//! topic to stdout until interrupted.

use std::time::Duration;

use chrono::Local;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};

const BROKER_HOST: &str = "localhost";
const BROKER_PORT: u16 = 1883;
const USERNAME: &str = "testuser";
const PASSWORD: &str = "testpass";
const TOPIC: &str = "ble/dummy/+";

#[tokio::main]
async fn main() {
    let mut options = MqttOptions::new("mqtt-probe", BROKER_HOST, BROKER_PORT);
    options.set_credentials(USERNAME, PASSWORD);
    options.set_keep_alive(Duration::from_secs(60));

    let (client, mut event_loop) = AsyncClient::new(options, 16);
    println!("Press Ctrl+C to stop");

    loop {
        match event_loop.poll().await {
            // Subscribing on every ConnAck keeps the subscription alive
            // across reconnects of a clean session.
            Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                println!("Connected to MQTT broker at {BROKER_HOST}:{BROKER_PORT}");
                match client.subscribe(TOPIC, QoS::AtMostOnce).await {
                    Ok(()) => println!("Subscribed to topic: {TOPIC}"),
                    Err(e) => eprintln!("Subscribe error: {e}"),
                }
            }
            Ok(Event::Incoming(Incoming::Publish(publish))) => {
                print_message(&publish.topic, &publish.payload);
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Connection error: {e}");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

fn print_message(topic: &str, payload: &[u8]) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let payload = String::from_utf8_lossy(payload);

    println!("[{timestamp}] Topic: {topic}");
    println!("[{timestamp}] Message: {payload}");
    match serde_json::from_str::<serde_json::Value>(&payload) {
        Ok(value) => println!("[{timestamp}] Parsed JSON: {value}"),
        Err(_) => println!("[{timestamp}] Raw message (not JSON): {payload}"),
    }
    println!("{}", "-".repeat(50));
}
