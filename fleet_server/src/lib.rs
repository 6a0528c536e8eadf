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

//! protocol-agnostic websocket transport layer: owns the listening socket and the set of
//! live connections, forwards raw inbound text frames to the pluggable domain task and
//! executes its outbound send commands. Payload semantics live upstream.

use std::net::SocketAddr;

use serde::{Deserialize,Serialize};

pub mod ws;
pub use ws::{ConnectionEvent, Gateway, GatewayCmd, GatewayHandle, WsConnection};

pub mod errors;
pub use errors::{FleetServerError, FleetServerResult, connect_error, op_failed};

/// bounds for the gateway command and connection event channels
pub const DEFAULT_CHANNEL_BOUNDS: usize = 64;

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct GatewayConfig {
    pub sock_addr: SocketAddr,
}

impl GatewayConfig {
    pub fn url (&self) -> String {
        format!("ws://{}/ws", self.sock_addr)
    }
}

impl Default for GatewayConfig {
    fn default()->Self {
        GatewayConfig { sock_addr: SocketAddr::from(([0,0,0,0], 9012)) }
    }
}
