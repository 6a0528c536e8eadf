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

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize,Serialize,de::DeserializeOwned};

use fleet_common::datetime::secs;
use crate::errors::FleetSimResult;

/// what playback does once the cursor moved past the last waypoint of a track
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
#[serde(rename_all="snake_case")]
pub enum EndOfTrackPolicy {
    /// wrap around to the first waypoint and keep playing (the default)
    #[default]
    Loop,

    /// keep re-emitting the last waypoint so the vehicle stays parked at its final position
    HoldLast,

    /// tear down cursor and timer. Subscriptions stay registered, an explicit
    /// unsubscribe still acks
    Stop,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct SimConfig {
    /// emission period of the per-vehicle playback timers
    pub tick_interval: Duration,
    pub end_of_track: EndOfTrackPolicy,
}

impl Default for SimConfig {
    fn default()->Self {
        SimConfig {
            tick_interval: secs(1),
            end_of_track: EndOfTrackPolicy::default(),
        }
    }
}

/// load a RON config of type C from an explicit path
pub fn load_ron_config<C: DeserializeOwned> (path: impl AsRef<Path>)->FleetSimResult<C> {
    let input = fs::read_to_string( path.as_ref())?;
    Ok( ron::from_str( &input)?)
}
