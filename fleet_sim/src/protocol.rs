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

//! the tagged message schema spoken over the websocket. Frames are JSON objects
//! `{"event": <name>, "data": <payload>}` with the `data` member absent for payload-less
//! requests. Unknown event names and malformed payloads are rejected at parse time,
//! before anything reaches the simulation core.

use serde::{Deserialize,Serialize};

use crate::Waypoint;
use crate::errors::FleetSimResult;

/// requests a consumer can send
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(tag="event", content="data", rename_all="camelCase")]
pub enum ClientRequest {
    GetVehicles,
    SubscribeToVehicle { plate: String },
    UnsubscribeFromVehicle { plate: String },
}

impl ClientRequest {
    pub fn from_json (input: &str)->FleetSimResult<Self> {
        Ok( serde_json::from_str( input)?)
    }

    pub fn to_json (&self)->FleetSimResult<String> {
        Ok( serde_json::to_string( self)?)
    }
}

/// events the service pushes to consumers
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(tag="event", content="data", rename_all="camelCase")]
pub enum ServerEvent {
    /// full known plate list, answering a `getVehicles` request
    VehiclesList( Vec<String>),

    /// one emitted telemetry point of a subscribed vehicle
    VehicleData { plate: String, data: Waypoint },

    /// confirms that the sender is no longer subscribed to the plate
    Unsubscribed { plate: String },

    /// the preceding request failed (e.g. unknown plate). Scoped to the requester
    Error { message: String },
}

impl ServerEvent {
    pub fn from_json (input: &str)->FleetSimResult<Self> {
        Ok( serde_json::from_str( input)?)
    }

    pub fn to_json (&self)->FleetSimResult<String> {
        Ok( serde_json::to_string( self)?)
    }
}
