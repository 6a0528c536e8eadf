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

use std::time::Duration;
use chrono::{DateTime,Utc,SecondsFormat};

#[inline]
pub fn utc_now ()->DateTime<Utc> {
    Utc::now()
}

/// RFC 3339 / ISO-8601 with second granularity and 'Z' suffix ("2026-03-01T12:00:00Z")
#[inline]
pub fn short_rfc3339 (date: &DateTime<Utc>)->String {
    date.to_rfc3339_opts( SecondsFormat::Secs, true)
}

//--- Duration ctor shorthands

#[inline]
pub fn millis (n: u64)->Duration { Duration::from_millis(n) }

#[inline]
pub fn secs (n: u64)->Duration { Duration::from_secs(n) }

#[inline]
pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }

#[inline]
pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }
