// SPDX-License-Identifier: MPL-2.0

//! Yeti status example.
//!
//! Connects to a Yeti, prints its system information and state, and
//! optionally switches an output.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example yeti_status -- <device_ip> [output] [on|off]
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Show status
//! cargo run --example yeti_status -- 192.168.1.50
//!
//! # Turn the AC inverter off, with request logging
//! RUST_LOG=goalzero_lib=debug cargo run --example yeti_status -- 192.168.1.50 ac off
//! ```

use std::env;

use goalzero_lib::types::{Output, PowerState};
use goalzero_lib::{DeviceState, Yeti};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <device_ip> [ac|usb|12v] [on|off]", args[0]);
        std::process::exit(1);
    }

    let yeti = Yeti::builder(&args[1]).build().await?;

    let sysinfo = yeti.sysinfo();
    println!("Device: {}", sysinfo.name().unwrap_or("unknown"));
    println!("Model:  {}", sysinfo.model().unwrap_or("unknown"));
    println!("MAC:    {}", sysinfo.mac_address().unwrap_or("unknown"));
    println!();
    print_state(&yeti.state());

    if let (Some(output), Some(state)) = (args.get(2), args.get(3)) {
        let output: Output = output.parse()?;
        let state: PowerState = state.parse()?;

        println!();
        println!("Switching {output} {state}...");
        yeti.set_output(output, state).await?;
        yeti.fetch_state().await?;
        print_state(&yeti.state());
    }

    Ok(())
}

fn print_state(state: &DeviceState) {
    if let Some(soc) = state.soc_percent() {
        println!("Charge:      {soc}%");
    }
    if let Some(wh) = state.wh_stored() {
        println!("Stored:      {wh} Wh");
    }
    if let (Some(input), Some(output)) = (state.watts_in(), state.watts_out()) {
        println!("Power:       {input} W in / {output} W out");
    }
    if let Some(minutes) = state.time_to_empty_full() {
        println!("Time left:   {minutes} min");
    }
    for output in Output::ALL {
        if let Some(port) = state.output(output) {
            println!("{:<12} {port}", format!("{output}:"));
        }
    }
}
