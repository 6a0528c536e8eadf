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

use std::{collections::HashMap, sync::Arc};

use tokio::{sync::mpsc, task::AbortHandle, time};
use tracing::{debug,trace,warn};

use crate::{TrackStore,Waypoint};
use crate::config::{EndOfTrackPolicy,SimConfig};

/// message posted by playback timer tasks into the hub tick channel
#[derive(Debug,Clone)]
pub struct SimTick {
    pub plate: Arc<str>,
}

/// mutable per-vehicle playback state. Exists from the first subscribe to the last
/// unsubscribe of its plate (or until the end-of-track policy tears it down)
#[derive(Debug)]
pub struct PlaybackCursor {
    pub plate: Arc<str>,
    pub current_index: usize,
    timer: AbortHandle,
}

/// owns the playback cursors and their timers over a read-only track store. The timer
/// tasks only post `SimTick` messages - every cursor mutation happens in the hub task
/// that drives this service, so emission stays single-threaded and a cancelled cursor
/// can never emit again
pub struct SimulationService {
    store: Arc<TrackStore>,
    config: SimConfig,
    cursors: HashMap<Arc<str>,PlaybackCursor>,
    tick_tx: mpsc::Sender<SimTick>,
}

impl SimulationService {

    pub fn new (store: Arc<TrackStore>, config: SimConfig, tick_tx: mpsc::Sender<SimTick>)->Self {
        SimulationService {
            store,
            config,
            cursors: HashMap::new(),
            tick_tx,
        }
    }

    /// all known plates in sorted order. Constant per store lifetime
    pub fn list_vehicles (&self)->Vec<String> {
        self.store.plate_strings()
    }

    pub fn is_valid_plate (&self, plate: &str)->bool {
        self.store.contains_plate( plate)
    }

    pub fn is_running (&self, plate: &str)->bool {
        self.cursors.contains_key( plate)
    }

    pub fn n_running (&self)->usize {
        self.cursors.len()
    }

    pub fn cursor_index (&self, plate: &str)->Option<usize> {
        self.cursors.get( plate).map( |c| c.current_index)
    }

    /// idempotent - an existing cursor (and its timer) is left untouched. Unknown plates
    /// never get a cursor. Returns true if a new cursor was created
    pub fn start_simulation (&mut self, plate: &str)->bool {
        if self.cursors.contains_key( plate) {
            return false // keep playing where we are
        }
        let Some(plate) = self.store.plate_of( plate) else {
            warn!("ignoring simulation start for unknown vehicle {plate}");
            return false
        };

        let timer = self.spawn_playback_timer( plate.clone());
        debug!("simulation started for {plate}");
        self.cursors.insert( plate.clone(), PlaybackCursor { plate, current_index: 0, timer });
        true
    }

    /// cancel the playback timer and drop the cursor. Synchronous and idempotent - a tick
    /// that is already queued finds no cursor anymore and is discarded by the caller
    pub fn stop_simulation (&mut self, plate: &str)->bool {
        if let Some(cursor) = self.cursors.remove( plate) {
            cursor.timer.abort();
            debug!("simulation stopped for {}", cursor.plate);
            true
        } else {
            false
        }
    }

    pub fn stop_all (&mut self) {
        for (_,cursor) in self.cursors.drain() {
            cursor.timer.abort();
        }
    }

    /// timer-invoked: take the waypoint at the current index, then advance it according
    /// to the end-of-track policy. Returns None if no cursor exists for the plate, which
    /// is how stale ticks of a cancelled simulation die
    pub fn emit_next_data_point (&mut self, plate: &str)->Option<(Arc<str>,Waypoint)> {
        let cursor = self.cursors.get_mut( plate)?;

        let track_len = self.store.track_len( &cursor.plate);
        let waypoint = self.store.waypoint( &cursor.plate, cursor.current_index)?.clone();
        let plate = cursor.plate.clone();

        let mut stop_after = false;
        let next = cursor.current_index + 1;
        if next < track_len {
            cursor.current_index = next;
        } else {
            match self.config.end_of_track {
                EndOfTrackPolicy::Loop => cursor.current_index = 0,
                EndOfTrackPolicy::HoldLast => {} // stay parked on the last waypoint
                EndOfTrackPolicy::Stop => stop_after = true,
            }
        }

        if stop_after {
            self.stop_simulation( &plate);
        }
        Some( (plate, waypoint))
    }

    /// spawn the recurring tick task for one plate. Note the tick channel is fed with
    /// try_send so a saturated hub drops ticks instead of queueing a backlog, and that
    /// the first tick fires one full period after the start - emission is never
    /// synchronous with the subscribe that triggered it
    fn spawn_playback_timer (&self, plate: Arc<str>)->AbortHandle {
        let tick_tx = self.tick_tx.clone();
        let tick_interval = self.config.tick_interval;

        let jh = tokio::spawn( async move {
            let mut interval = time::interval( tick_interval);
            interval.tick().await; // consume the immediate first tick

            loop {
                interval.tick().await;
                match tick_tx.try_send( SimTick { plate: plate.clone() }) {
                    Ok(_) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => trace!("dropped tick for {plate}"),
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        });

        jh.abort_handle()
    }
}
