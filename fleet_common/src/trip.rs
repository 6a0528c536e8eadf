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

//! trip statistics over received telemetry points. The stat functions are generic in the
//! point type so that consumers can feed their own sample structs without conversion.

use std::fmt;

use crate::geo::{LatLon,haversine_distance_km};

/// abstraction for anything that has a position and a ground speed
pub trait TelemetryPoint {
    fn position (&self)->LatLon;
    fn speed_kmh (&self)->f64;
}

/// arithmetic mean of point speeds in km/h. An empty trip has average speed 0
pub fn average_speed_kmh<T: TelemetryPoint> (points: &[T]) -> f64 {
    if points.is_empty() {
        0.0
    } else {
        points.iter().map( |p| p.speed_kmh()).sum::<f64>() / points.len() as f64
    }
}

/// accumulated great circle distance over consecutive points in km.
/// Less than two points means nothing was traveled yet
pub fn trip_mileage_km<T: TelemetryPoint> (points: &[T]) -> f64 {
    if points.len() < 2 {
        0.0
    } else {
        points.windows(2).map( |w| haversine_distance_km( &w[0].position(), &w[1].position())).sum()
    }
}

/// aggregate trip statistics as displayed by consumers.
/// Average speed is shown with one decimal ("15.0"), mileage with two ("1.11")
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TripStats {
    pub n_points: usize,
    pub avg_speed_kmh: f64,
    pub mileage_km: f64,
}

impl TripStats {
    pub fn of<T: TelemetryPoint> (points: &[T])->Self {
        TripStats {
            n_points: points.len(),
            avg_speed_kmh: average_speed_kmh( points),
            mileage_km: trip_mileage_km( points),
        }
    }

    pub fn formatted_avg_speed (&self)->String {
        format!("{:.1}", self.avg_speed_kmh)
    }

    pub fn formatted_mileage (&self)->String {
        format!("{:.2}", self.mileage_km)
    }
}

impl fmt::Display for TripStats {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} points, avg speed {:.1} km/h, mileage {:.2} km", self.n_points, self.avg_speed_kmh, self.mileage_km)
    }
}
