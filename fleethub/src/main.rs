/*
 * Copyright © 2026, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “FLEET” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![allow(unused)]

//! the telemetry hub server: plays recorded vehicle tracks back to websocket subscribers.
//! Runs out of the box with an embedded demo fleet, use `--data` for a real dataset and
//! `--config` to change socket address, tick interval or end-of-track behavior.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use serde::{Deserialize,Serialize};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleet_server::{Gateway,GatewayConfig,DEFAULT_CHANNEL_BOUNDS};
use fleet_sim::TrackStore;
use fleet_sim::config::{load_ron_config,SimConfig};
use fleet_sim::hub::VehicleHub;

/// canned demo dataset so the hub runs without any setup
const DEFAULT_FLEET: &str = include_str!("fleet.json");

#[derive(Parser, Debug)]
#[command(version, about, long_about = "vehicle telemetry playback hub")]
pub struct Args {
    /// optional RON config path (see configs/hub.ron)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// optional JSON track dataset path (embedded demo fleet otherwise)
    #[arg(short,long)]
    pub data: Option<PathBuf>,
}

#[derive(Debug,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub gateway: GatewayConfig,
    pub sim: SimConfig,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env()) // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let config: HubConfig = match &args.config {
        Some(path) => load_ron_config( path)?,
        None => HubConfig::default()
    };

    let store = Arc::new( match &args.data {
        Some(path) => TrackStore::from_json_file( path)?,
        None => TrackStore::from_json( DEFAULT_FLEET)?
    });
    info!("loaded {} vehicle tracks: {:?}", store.len(), store.plate_strings());

    let (event_tx, event_rx) = mpsc::channel( DEFAULT_CHANNEL_BOUNDS);
    let (mut gateway, hgate) = Gateway::new( config.gateway, event_tx);
    let sock_addr = gateway.bind().await?;
    info!("serving ws://{}/ws", sock_addr);

    let hub = VehicleHub::new( store, config.sim, hgate.clone(), event_rx);

    let gateway_task = tokio::spawn( gateway.run());
    let hub_task = tokio::spawn( hub.run());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    hgate.shutdown().await?;

    gateway_task.await??;
    hub_task.await??;

    Ok(())
}
