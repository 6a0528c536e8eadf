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

use std::{net::SocketAddr, sync::Arc};

use tokio::sync::mpsc;
use tracing::{debug,info,warn};

use fleet_server::{ConnectionEvent,GatewayHandle,DEFAULT_CHANNEL_BOUNDS};

use crate::TrackStore;
use crate::config::SimConfig;
use crate::errors::{FleetSimResult, unknown_vehicle};
use crate::protocol::{ClientRequest,ServerEvent};
use crate::registry::SubscriptionRegistry;
use crate::service::{SimTick,SimulationService};

/// the domain task of the telemetry service. All connection events and playback ticks are
/// funneled through its run loop, so registry and cursors are mutated from a single place
/// and subscribers of the same plate always observe the same frame sequence
pub struct VehicleHub {
    pub store: Arc<TrackStore>,
    pub registry: SubscriptionRegistry,
    pub service: SimulationService,
    hgate: GatewayHandle,
    event_rx: mpsc::Receiver<ConnectionEvent>,
    tick_rx: mpsc::Receiver<SimTick>,
}

impl VehicleHub {

    pub fn new (store: Arc<TrackStore>, config: SimConfig, hgate: GatewayHandle, event_rx: mpsc::Receiver<ConnectionEvent>)->Self {
        let (tick_tx, tick_rx) = mpsc::channel( DEFAULT_CHANNEL_BOUNDS);
        let service = SimulationService::new( store.clone(), config, tick_tx);

        VehicleHub {
            store,
            registry: SubscriptionRegistry::new(),
            service,
            hgate,
            event_rx,
            tick_rx,
        }
    }

    /// process connection events and playback ticks until the gateway goes away. Handler
    /// errors are logged but do not terminate the loop - a dead peer socket must not take
    /// the service down
    pub async fn run (mut self)->FleetSimResult<()> {
        loop {
            tokio::select! {
                maybe_event = self.event_rx.recv() => {
                    match maybe_event {
                        Some(event) => {
                            if let Err(e) = self.handle_connection_event( event).await {
                                warn!("connection event handler failed: {e}");
                            }
                        }
                        None => break // gateway terminated, nothing to serve anymore
                    }
                }
                maybe_tick = self.tick_rx.recv() => {
                    if let Some(tick) = maybe_tick {
                        if let Err(e) = self.handle_tick( tick).await {
                            warn!("tick handler failed: {e}");
                        }
                    }
                }
            }
        }

        self.service.stop_all();
        info!("vehicle hub terminated");
        Ok(())
    }

    pub async fn handle_connection_event (&mut self, event: ConnectionEvent)->FleetSimResult<()> {
        match event {
            ConnectionEvent::Opened { remote_addr } => {
                debug!("consumer connected: {remote_addr}");
                Ok(())
            }
            ConnectionEvent::Msg { remote_addr, text } => {
                match ClientRequest::from_json( &text) {
                    Ok(request) => self.handle_request( remote_addr, request).await,
                    Err(e) => { // only the requester gets the error, everybody else is unaffected
                        warn!("malformed request from {remote_addr}: {e}");
                        self.send_event( remote_addr, &ServerEvent::Error { message: format!("malformed request: {e}") }).await
                    }
                }
            }
            ConnectionEvent::Closed { remote_addr } => {
                debug!("consumer disconnected: {remote_addr}");
                self.on_disconnect( remote_addr).await
            }
        }
    }

    pub async fn handle_request (&mut self, remote_addr: SocketAddr, request: ClientRequest)->FleetSimResult<()> {
        match request {
            ClientRequest::GetVehicles => {
                let event = ServerEvent::VehiclesList( self.service.list_vehicles());
                self.send_event( remote_addr, &event).await
            }

            ClientRequest::SubscribeToVehicle { plate } => {
                let Some(plate) = self.store.plate_of( &plate) else {
                    return self.send_event( remote_addr, &ServerEvent::Error { message: unknown_vehicle( &plate).to_string() }).await
                };

                if self.registry.subscribe( remote_addr, plate.clone()) { // first subscriber starts playback
                    self.service.start_simulation( &plate);
                }
                Ok(()) // no ack - the subscriber learns of success from the arriving data
            }

            ClientRequest::UnsubscribeFromVehicle { plate } => {
                if !self.service.is_valid_plate( &plate) {
                    return self.send_event( remote_addr, &ServerEvent::Error { message: unknown_vehicle( &plate).to_string() }).await
                }

                if self.registry.unsubscribe( remote_addr, &plate) { // last subscriber stops playback
                    self.service.stop_simulation( &plate);
                }
                self.send_event( remote_addr, &ServerEvent::Unsubscribed { plate }).await
            }
        }
    }

    /// tear down everything the closed connection was subscribed to. Plates that lost their
    /// last subscriber stop playing immediately
    pub async fn on_disconnect (&mut self, remote_addr: SocketAddr)->FleetSimResult<()> {
        for plate in self.registry.remove_connection( remote_addr) {
            self.service.stop_simulation( &plate);
        }
        Ok(())
    }

    /// advance the cursor of the ticked plate and fan the emitted waypoint out to all of its
    /// subscribers. The frame is serialized once so concurrent subscribers get byte-identical
    /// streams. Ticks of plates without a cursor are stale remnants of a stopped simulation
    /// and are dropped here
    pub async fn handle_tick (&mut self, tick: SimTick)->FleetSimResult<()> {
        let Some((plate, waypoint)) = self.service.emit_next_data_point( &tick.plate) else {
            return Ok(()) // simulation was stopped after this tick got queued
        };

        let subscribers: Vec<SocketAddr> = match self.registry.subscribers_of( &plate) {
            Some(conns) => conns.iter().copied().collect(),
            None => return Ok(())
        };

        let event = ServerEvent::VehicleData { plate: plate.to_string(), data: waypoint };
        let data = event.to_json()?;

        for remote_addr in subscribers {
            if let Err(e) = self.hgate.send_ws( remote_addr, data.clone()).await {
                warn!("failed to queue frame for {remote_addr}: {e}");
            }
        }
        Ok(())
    }

    async fn send_event (&self, remote_addr: SocketAddr, event: &ServerEvent)->FleetSimResult<()> {
        let data = event.to_json()?;
        self.hgate.send_ws( remote_addr, data).await?;
        Ok(())
    }
}
