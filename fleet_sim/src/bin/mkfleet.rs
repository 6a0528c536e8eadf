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

use std::{fs::File, io::Write, path::PathBuf};

use anyhow::Result;
use chrono::{Duration,Timelike,Utc};
use clap::Parser;
use rand::Rng;

use fleet_common::{angle::normalize_360, geo::{destination,latlon,LatLon}};
use fleet_sim::{VehicleStatus,VehicleTrack,Waypoint,TrackStore};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "generate a synthetic vehicle track dataset")]
pub struct Args {
    /// number of vehicles to generate
    #[arg(short,long, default_value_t = 3)]
    pub n_vehicles: usize,

    /// waypoints per vehicle track
    #[arg(short='w',long, default_value_t = 60)]
    pub n_waypoints: usize,

    /// latitude of the fleet operating area center
    #[arg(long, default_value_t = 25.2048)]
    pub lat: f64,

    /// longitude of the fleet operating area center
    #[arg(long, default_value_t = 55.2708)]
    pub lon: f64,

    /// seconds between consecutive track points
    #[arg(short,long, default_value_t = 1)]
    pub step_secs: i64,

    /// produce formatted output
    #[arg(short,long)]
    pub pretty: bool,

    /// optional path where to store output (stdout otherwise)
    #[arg(short,long)]
    pub output: Option<PathBuf>,
}

fn main()->Result<()> {
    let args = Args::parse();
    let mut rng = rand::rng();

    let mut tracks: Vec<VehicleTrack> = Vec::with_capacity( args.n_vehicles);
    for i in 0..args.n_vehicles {
        let plate = format!( "DXB-CX-{}", 36357 + 7*i);
        tracks.push( generate_track( &mut rng, plate, &args));
    }

    TrackStore::new( tracks.clone())?; // reject a dataset the service would not load

    let json = if args.pretty {
        serde_json::to_string_pretty( &tracks)?
    } else {
        serde_json::to_string( &tracks)?
    };

    if let Some(path) = &args.output {
        let mut file = File::create( path)?;
        file.write_all( json.as_bytes())?;
        println!( "wrote {} tracks with {} waypoints each to {:?}", args.n_vehicles, args.n_waypoints, path);
    } else {
        println!( "{json}");
    }

    Ok(())
}

/// vehicles drive a randomized loop around the operating area: per step we advance along
/// the current heading by speed * step time, then turn by roughly 360/n_waypoints degrees
/// so the track closes on itself and looped playback has no position jump
fn generate_track (rng: &mut impl Rng, plate: String, args: &Args)->VehicleTrack {
    let mut pos = latlon( args.lat + rng.random_range( -0.02..0.02), args.lon + rng.random_range( -0.02..0.02));
    let mut heading = rng.random_range( 0.0..360.0);
    let turn_per_step = 360.0 / (args.n_waypoints as f64);

    let start = Utc::now().with_nanosecond(0).unwrap();
    let mut waypoints: Vec<Waypoint> = Vec::with_capacity( args.n_waypoints);

    for k in 0..args.n_waypoints {
        let (speed, status) = if rng.random_range( 0..12) == 0 {
            (0.0, if rng.random_bool( 0.5) { VehicleStatus::Stopped } else { VehicleStatus::Idle })
        } else {
            (rng.random_range( 20.0..70.0_f64).round(), VehicleStatus::Moving)
        };

        waypoints.push( Waypoint {
            lat: pos.lat_deg,
            lng: pos.lon_deg,
            angle: heading,
            speed,
            status,
            timestamp: start + Duration::seconds( args.step_secs * (k as i64)),
        });

        let dist_km = speed * (args.step_secs as f64) / 3600.0;
        pos = destination( &pos, heading, dist_km);
        heading = normalize_360( heading + turn_per_step + rng.random_range( -4.0..4.0));
    }

    VehicleTrack::new( plate, waypoints)
}
