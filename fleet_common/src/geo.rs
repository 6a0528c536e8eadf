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

//! spherical-earth geodetic helpers. All distances are in kilometers, all angles in degrees.
//! Spherical approximation is good enough for trip odometry and track synthesis - we don't
//! do ellipsoidal (Vincenty) math here.

use std::fmt;
use serde::{Deserialize,Serialize};

use crate::{sin,cos,asin,atan2,sqrt,pow2,rad,deg};
use crate::angle::{normalize_180,normalize_360};

/// mean earth radius in kilometers, consistent through FLEET applications.
/// Note that const floats are still not stabilized so derived values are computed at runtime
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

/// a plain WGS84 position in degrees
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct LatLon {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl fmt::Display for LatLon {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5},{:.5})", self.lat_deg, self.lon_deg)
    }
}

#[inline]
pub fn latlon (lat_deg: f64, lon_deg: f64)->LatLon {
    LatLon { lat_deg, lon_deg }
}

/// great circle distance between two points in kilometers (Haversine formula)
pub fn haversine_distance_km (p1: &LatLon, p2: &LatLon) -> f64 {
    let dlat = rad( p2.lat_deg - p1.lat_deg);
    let dlon = rad( p2.lon_deg - p1.lon_deg);

    let a = pow2( sin( dlat / 2.0)) + cos( rad(p1.lat_deg)) * cos( rad(p2.lat_deg)) * pow2( sin( dlon / 2.0));
    let c = 2.0 * atan2( sqrt(a), sqrt(1.0 - a));

    MEAN_EARTH_RADIUS_KM * c
}

/// initial great circle bearing from `p1` towards `p2`, normalized into [0,360)
pub fn bearing_deg (p1: &LatLon, p2: &LatLon) -> f64 {
    let lat1 = rad( p1.lat_deg);
    let lat2 = rad( p2.lat_deg);
    let dlon = rad( p2.lon_deg - p1.lon_deg);

    let y = sin(dlon) * cos(lat2);
    let x = cos(lat1) * sin(lat2) - sin(lat1) * cos(lat2) * cos(dlon);

    normalize_360( deg( atan2( y, x)))
}

/// position reached from `p` when moving `dist_km` along the given initial bearing
pub fn destination (p: &LatLon, bearing_deg: f64, dist_km: f64) -> LatLon {
    let br = rad( bearing_deg);
    let d = dist_km / MEAN_EARTH_RADIUS_KM;
    let lat1 = rad( p.lat_deg);
    let lon1 = rad( p.lon_deg);

    let lat2 = asin( sin(lat1) * cos(d) + cos(lat1) * sin(d) * cos(br));
    let lon2 = lon1 + atan2( sin(br) * sin(d) * cos(lat1), cos(d) - sin(lat1) * sin(lat2));

    LatLon { lat_deg: deg(lat2), lon_deg: normalize_180( deg(lon2)) }
}
