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

//! the telemetry simulation core: vehicle track data model and store, subscription
//! registry, playback service and the hub task that serializes all of it. Recorded (or
//! synthesized) waypoint sequences are played back per vehicle and fanned out to the
//! consumers that subscribed to the plate.

use std::{collections::HashMap, fmt, fs, path::Path, sync::Arc};

use chrono::{DateTime,Utc};
use serde::{Deserialize,Serialize};

use fleet_common::angle::normalize_360;
use fleet_common::datetime::short_rfc3339;
use fleet_common::geo::{latlon,LatLon};
use fleet_common::trip::TelemetryPoint;

pub mod config;
pub mod protocol;
pub mod registry;
pub mod service;
pub mod hub;

pub mod errors;
use errors::{FleetSimError, FleetSimResult, invalid_data};

/* #region data model ****************************************************************************************/

/// discrete vehicle motion state as reported by the upstream recorder
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum VehicleStatus {
    Moving,
    Stopped,
    Idle,

    /// catch-all so that unrecognized status strings in a dataset degrade instead of
    /// failing the whole load
    #[serde(other)]
    Unknown,
}

impl fmt::Display for VehicleStatus {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleStatus::Moving => write!(f, "moving"),
            VehicleStatus::Stopped => write!(f, "stopped"),
            VehicleStatus::Idle => write!(f, "idle"),
            VehicleStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// one telemetry sample of a vehicle track. Value type, no identity of its own
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    /// heading in degrees, normalized into [0,360) on load
    pub angle: f64,
    /// ground speed in km/h
    pub speed: f64,
    pub status: VehicleStatus,
    pub timestamp: DateTime<Utc>,
}

impl Waypoint {
    pub fn position (&self)->LatLon {
        latlon( self.lat, self.lng)
    }
}

impl TelemetryPoint for Waypoint {
    fn position (&self)->LatLon { latlon( self.lat, self.lng) }
    fn speed_kmh (&self)->f64 { self.speed }
}

impl fmt::Display for Waypoint {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.5},{:.5}) {:.0}deg {:.1}km/h {}",
               short_rfc3339( &self.timestamp), self.lat, self.lng, self.angle, self.speed, self.status)
    }
}

/// the recorded waypoint sequence of one vehicle, identified by its plate.
/// Immutable once it entered a TrackStore
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct VehicleTrack {
    pub plate: String,
    pub waypoints: Vec<Waypoint>,
}

impl VehicleTrack {
    pub fn new (plate: impl ToString, waypoints: Vec<Waypoint>)->Self {
        VehicleTrack { plate: plate.to_string(), waypoints }
    }

    pub fn len (&self)->usize {
        self.waypoints.len()
    }

    pub fn is_empty (&self)->bool {
        self.waypoints.is_empty()
    }

    fn validate (&self)->FleetSimResult<()> {
        if self.plate.trim().is_empty() {
            return Err( invalid_data("empty plate"));
        }
        if self.waypoints.is_empty() {
            return Err( invalid_data( format!("track {} has no waypoints", self.plate)));
        }

        for (i,wp) in self.waypoints.iter().enumerate() {
            if !wp.lat.is_finite() || wp.lat < -90.0 || wp.lat > 90.0 {
                return Err( invalid_data( format!("track {} waypoint {} has bad latitude {}", self.plate, i, wp.lat)));
            }
            if !wp.lng.is_finite() || wp.lng < -180.0 || wp.lng > 180.0 {
                return Err( invalid_data( format!("track {} waypoint {} has bad longitude {}", self.plate, i, wp.lng)));
            }
            if !wp.speed.is_finite() || wp.speed < 0.0 {
                return Err( invalid_data( format!("track {} waypoint {} has bad speed {}", self.plate, i, wp.speed)));
            }
            if !wp.angle.is_finite() {
                return Err( invalid_data( format!("track {} waypoint {} has bad heading {}", self.plate, i, wp.angle)));
            }
        }
        Ok(())
    }
}

/* #endregion data model */

/* #region track store ***************************************************************************************/

/// read-only map of vehicle tracks keyed by plate. Built and validated once at startup,
/// never mutated during simulation. Plates are interned as `Arc<str>` so cursors, registry
/// entries and tick messages share one allocation per vehicle
#[derive(Debug,Clone)]
pub struct TrackStore {
    tracks: HashMap<Arc<str>,VehicleTrack>,
    plates: Vec<Arc<str>>, // sorted, for deterministic listings
}

impl TrackStore {

    pub fn new (tracks: Vec<VehicleTrack>)->FleetSimResult<Self> {
        let mut map: HashMap<Arc<str>,VehicleTrack> = HashMap::with_capacity( tracks.len());

        for mut track in tracks {
            track.validate()?;
            for wp in track.waypoints.iter_mut() {
                wp.angle = normalize_360( wp.angle);
            }

            let plate: Arc<str> = Arc::from( track.plate.as_str());
            if map.insert( plate.clone(), track).is_some() {
                return Err( invalid_data( format!("duplicate plate {plate}")));
            }
        }

        let mut plates: Vec<Arc<str>> = map.keys().cloned().collect();
        plates.sort();

        Ok( TrackStore { tracks: map, plates })
    }

    /// build a store from a JSON array of `{plate, waypoints[]}` records
    pub fn from_json (input: &str)->FleetSimResult<Self> {
        let tracks: Vec<VehicleTrack> = serde_json::from_str( input)?;
        Self::new( tracks)
    }

    pub fn from_json_file (path: impl AsRef<Path>)->FleetSimResult<Self> {
        let input = fs::read_to_string( path.as_ref())?;
        Self::from_json( &input)
    }

    pub fn len (&self)->usize {
        self.tracks.len()
    }

    pub fn is_empty (&self)->bool {
        self.tracks.is_empty()
    }

    pub fn contains_plate (&self, plate: &str)->bool {
        self.tracks.contains_key( plate)
    }

    /// the interned plate key, if the plate is known
    pub fn plate_of (&self, plate: &str)->Option<Arc<str>> {
        self.tracks.get_key_value( plate).map( |(k,_)| k.clone())
    }

    pub fn get (&self, plate: &str)->Option<&VehicleTrack> {
        self.tracks.get( plate)
    }

    /// all known plates in sorted order
    pub fn plates (&self)->&[Arc<str>] {
        &self.plates
    }

    pub fn plate_strings (&self)->Vec<String> {
        self.plates.iter().map( |p| p.to_string()).collect()
    }

    pub fn track_len (&self, plate: &str)->usize {
        self.tracks.get( plate).map_or( 0, |t| t.len())
    }

    pub fn waypoint (&self, plate: &str, index: usize)->Option<&Waypoint> {
        self.tracks.get( plate).and_then( |t| t.waypoints.get( index))
    }
}

/* #endregion track store */
