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

//! console client for the telemetry hub: lists the fleet, follows one vehicle and prints
//! trip statistics when done (ctrl-c or --max-frames reached).
//!
//! examples:
//! ```
//! fleetwatch
//! fleetwatch DXB-CX-36357 --max-frames 20
//! fleetwatch DXB-CX-36357 --geocode "https://api.mapbox.com/geocoding/v5/mapbox.places/{lng},{lat}.json?access_token=..."
//! ```

use std::time::Duration;

use anyhow::{anyhow,Result};
use clap::Parser;
use futures::{SinkExt,StreamExt};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle, time::timeout};
use tokio_tungstenite::{
    connect_async, MaybeTlsStream, WebSocketStream,
    tungstenite::{protocol::Message, client::IntoClientRequest}
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fleet_common::trip::TripStats;
use fleet_sim::Waypoint;
use fleet_sim::protocol::{ClientRequest,ServerEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Parser, Debug)]
#[command(version, about, long_about = "follow vehicles served by a telemetry hub")]
pub struct Args {
    /// hub websocket url
    #[arg(short,long, default_value = "ws://127.0.0.1:9012/ws")]
    pub url: String,

    /// stop after this many received frames (0 = until ctrl-c)
    #[arg(short,long, default_value_t = 0)]
    pub max_frames: usize,

    /// reverse geocoding url template with {lat} and {lng} placeholders
    #[arg(short,long)]
    pub geocode: Option<String>,

    /// plate of the vehicle to follow (just list the fleet if omitted)
    pub plate: Option<String>,
}

/// runs the address lookups off the frame loop. Each new position supersedes a lookup
/// that is still in flight - we would only print a stale address anyway
struct Geocoder {
    template: String,
    client: reqwest::Client,
    pending: Option<JoinHandle<()>>,
    loc_tx: mpsc::Sender<String>,
}

impl Geocoder {
    fn new (template: String, loc_tx: mpsc::Sender<String>)->Self {
        Geocoder { template, client: reqwest::Client::new(), pending: None, loc_tx }
    }

    fn lookup (&mut self, lat: f64, lng: f64) {
        if let Some(jh) = self.pending.take() {
            jh.abort(); // superseded
        }

        let url = self.template.replace( "{lat}", &lat.to_string()).replace( "{lng}", &lng.to_string());
        let client = self.client.clone();
        let loc_tx = self.loc_tx.clone();

        self.pending = Some( tokio::spawn( async move {
            let location = reverse_geocode( &client, &url).await;
            let _ = loc_tx.send( location).await;
        }));
    }
}

/// resolve a position to a place name, mapbox response schema. Geocoding is cosmetic -
/// every failure mode just yields the placeholder
async fn reverse_geocode (client: &reqwest::Client, url: &str)->String {
    match client.get( url).send().await {
        Ok(response) => {
            match response.json::<serde_json::Value>().await {
                Ok(json) => json["features"][0]["place_name"].as_str().unwrap_or( "unknown location").to_string(),
                Err(e) => {
                    debug!("geocoder response not usable: {e}");
                    "unknown location".to_string()
                }
            }
        }
        Err(e) => {
            debug!("geocoder not reachable: {e}");
            "unknown location".to_string()
        }
    }
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env()) // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let request = args.url.as_str().into_client_request()?;
    let (mut ws, _response) = connect_async( request).await?;
    println!("connected to {}", args.url);

    send_request( &mut ws, &ClientRequest::GetVehicles).await?;
    if let Some(plate) = &args.plate {
        send_request( &mut ws, &ClientRequest::SubscribeToVehicle { plate: plate.clone() }).await?;
    }

    let (loc_tx, mut loc_rx) = mpsc::channel( 8);
    let mut geocoder = args.geocode.clone().map( |template| Geocoder::new( template, loc_tx));
    let mut location = String::new();
    let mut points: Vec<Waypoint> = Vec::new();

    loop {
        tokio::select! {
            maybe_msg = ws.next() => {
                let Some(msg) = maybe_msg else { break }; // hub went away

                match msg? {
                    msg @ Message::Text(_) => {
                        match ServerEvent::from_json( msg.to_text()?)? {
                            ServerEvent::VehiclesList(plates) => {
                                println!("available vehicles: {plates:?}");
                                if args.plate.is_none() { break }
                            }
                            ServerEvent::VehicleData { plate, data } => {
                                if let Some(geocoder) = &mut geocoder {
                                    geocoder.lookup( data.lat, data.lng);
                                }
                                if location.is_empty() {
                                    println!("{plate}: {data}");
                                } else {
                                    println!("{plate}: {data} @ {location}");
                                }

                                points.push( data);
                                if args.max_frames > 0 && points.len() >= args.max_frames { break }
                            }
                            ServerEvent::Unsubscribed { plate } => {
                                println!("unsubscribed from {plate}");
                                break
                            }
                            ServerEvent::Error { message } => {
                                return Err( anyhow!("hub error: {message}"))
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {} // ping/pong etc.
                }
            }
            Some(loc) = loc_rx.recv() => {
                location = loc;
            }
            _ = tokio::signal::ctrl_c() => break
        }
    }

    if let Some(plate) = &args.plate {
        // best effort - the hub drops our subscriptions on disconnect anyway
        let _ = send_request( &mut ws, &ClientRequest::UnsubscribeFromVehicle { plate: plate.clone() }).await;
        let _ = timeout( Duration::from_secs(2), await_unsubscribed( &mut ws)).await;

        let stats = TripStats::of( &points);
        println!();
        println!("trip of {plate}: {} frames, avg speed {} km/h, mileage {} km",
                 stats.n_points, stats.formatted_avg_speed(), stats.formatted_mileage());
    }

    Ok(())
}

async fn send_request (ws: &mut WsStream, request: &ClientRequest)->Result<()> {
    let json = request.to_json()?;
    Ok( ws.send( Message::text( json)).await?)
}

async fn await_unsubscribed (ws: &mut WsStream)->Result<()> {
    while let Some(msg) = ws.next().await {
        if let msg @ Message::Text(_) = msg? {
            if let ServerEvent::Unsubscribed {..} = ServerEvent::from_json( msg.to_text()?)? {
                return Ok(())
            }
        }
    }
    Ok(())
}
