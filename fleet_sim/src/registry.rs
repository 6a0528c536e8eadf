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

use std::collections::{HashMap,HashSet};
use std::net::SocketAddr;
use std::sync::Arc;

/// many-to-many relation between consumer connections and vehicle plates, indexed both
/// ways. This is a pure relation table - plate validation and simulation start/stop are
/// driven by the hub, which owns registry and service and keeps them consistent.
///
/// The boolean/list returns of the mutators tell the caller whether a first-subscriber or
/// last-subscriber transition happened, which is what gates timer start/stop
#[derive(Debug,Default)]
pub struct SubscriptionRegistry {
    by_plate: HashMap<Arc<str>,HashSet<SocketAddr>>,
    by_conn: HashMap<SocketAddr,HashSet<Arc<str>>>,
}

impl SubscriptionRegistry {

    pub fn new ()->Self {
        SubscriptionRegistry { by_plate: HashMap::new(), by_conn: HashMap::new() }
    }

    /// record (conn,plate). Returns true if plate had no subscribers before,
    /// i.e. the caller has to start the simulation. Re-subscribing is a no-op
    pub fn subscribe (&mut self, conn: SocketAddr, plate: Arc<str>)->bool {
        self.by_conn.entry( conn).or_default().insert( plate.clone());

        let subs = self.by_plate.entry( plate).or_default();
        let first = subs.is_empty();
        subs.insert( conn);
        first
    }

    /// remove (conn,plate) if present, no-op otherwise. Returns true if plate now has no
    /// subscribers left, i.e. the caller has to stop the simulation
    pub fn unsubscribe (&mut self, conn: SocketAddr, plate: &str)->bool {
        if let Some(plates) = self.by_conn.get_mut( &conn) {
            plates.remove( plate);
            if plates.is_empty() {
                self.by_conn.remove( &conn);
            }
        }

        if let Some(subs) = self.by_plate.get_mut( plate) {
            subs.remove( &conn);
            if subs.is_empty() {
                self.by_plate.remove( plate);
                return true
            }
        }
        false
    }

    /// remove all relations of conn (connection loss or explicit close). Returns the
    /// plates that now have no subscribers left, i.e. whose simulation has to stop
    pub fn remove_connection (&mut self, conn: SocketAddr)->Vec<Arc<str>> {
        let mut orphaned = Vec::new();

        if let Some(plates) = self.by_conn.remove( &conn) {
            for plate in plates {
                if let Some(subs) = self.by_plate.get_mut( &plate) {
                    subs.remove( &conn);
                    if subs.is_empty() {
                        self.by_plate.remove( &plate);
                        orphaned.push( plate);
                    }
                }
            }
        }
        orphaned
    }

    /// the connections currently subscribed to plate, used by the emission path
    pub fn subscribers_of (&self, plate: &str)->Option<&HashSet<SocketAddr>> {
        self.by_plate.get( plate)
    }

    pub fn has_subscribers (&self, plate: &str)->bool {
        self.by_plate.contains_key( plate)
    }

    pub fn n_subscribers (&self, plate: &str)->usize {
        self.by_plate.get( plate).map_or( 0, |subs| subs.len())
    }

    pub fn is_subscribed (&self, conn: &SocketAddr, plate: &str)->bool {
        self.by_plate.get( plate).is_some_and( |subs| subs.contains( conn))
    }

    /// the plates conn is subscribed to
    pub fn plates_of (&self, conn: &SocketAddr)->Option<&HashSet<Arc<str>>> {
        self.by_conn.get( conn)
    }

    pub fn n_connections (&self)->usize {
        self.by_conn.len()
    }

    pub fn is_empty (&self)->bool {
        self.by_plate.is_empty() && self.by_conn.is_empty()
    }
}
