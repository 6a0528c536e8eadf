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

use std::{collections::HashMap, net::SocketAddr};

use axum::{
    extract::{connect_info::ConnectInfo, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::{SplitSink, StreamExt}};
use tokio::{net::TcpListener, sync::mpsc, task::JoinHandle};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::{DEFAULT_CHANNEL_BOUNDS, GatewayConfig};
use crate::errors::{FleetServerResult, connect_error, op_failed};

/* #region connection events and commands ********************************************************************/

/// what the gateway reports to the domain task that plugs into it. Inbound frames are
/// forwarded verbatim - the gateway does not know the payload schema
#[derive(Debug,Clone)]
pub enum ConnectionEvent {
    Opened { remote_addr: SocketAddr },
    Msg { remote_addr: SocketAddr, text: String },
    Closed { remote_addr: SocketAddr },
}

/// commands processed by the gateway run loop
pub enum GatewayCmd {
    AddConnection { remote_addr: SocketAddr, ws: WebSocket },
    SendWs { remote_addr: SocketAddr, data: String },
    BroadcastWs { data: String },
    RemoveConnection { remote_addr: SocketAddr },
    Shutdown,
}

/// cheaply clonable sender side of the gateway command channel
#[derive(Clone)]
pub struct GatewayHandle {
    tx: mpsc::Sender<GatewayCmd>,
}

impl GatewayHandle {
    /// wrap an existing command channel sender. Normally obtained from `Gateway::new`, but
    /// domain tasks can also feed a plain channel here and drain the commands themselves
    pub fn new (tx: mpsc::Sender<GatewayCmd>)->Self {
        GatewayHandle { tx }
    }

    /// queue one serialized frame for delivery to a single connection
    pub async fn send_ws (&self, remote_addr: SocketAddr, data: String)->FleetServerResult<()> {
        self.tx.send( GatewayCmd::SendWs{remote_addr, data}).await.map_err(|_| op_failed("gateway task terminated"))
    }

    /// queue one serialized frame for delivery to every open connection
    pub async fn broadcast_ws (&self, data: String)->FleetServerResult<()> {
        self.tx.send( GatewayCmd::BroadcastWs{data}).await.map_err(|_| op_failed("gateway task terminated"))
    }

    /// drop the connection state for `remote_addr` (the socket itself is closed by dropping its sink)
    pub async fn remove_connection (&self, remote_addr: SocketAddr)->FleetServerResult<()> {
        self.tx.send( GatewayCmd::RemoveConnection{remote_addr}).await.map_err(|_| op_failed("gateway task terminated"))
    }

    /// terminate the gateway run loop, the server task and all receiver tasks
    pub async fn shutdown (&self)->FleetServerResult<()> {
        self.tx.send( GatewayCmd::Shutdown).await.map_err(|_| op_failed("gateway task terminated"))
    }

    async fn add_connection (&self, remote_addr: SocketAddr, ws: WebSocket)->FleetServerResult<()> {
        self.tx.send( GatewayCmd::AddConnection{remote_addr, ws}).await.map_err(|_| op_failed("gateway task terminated"))
    }
}

/* #endregion connection events and commands */

/* #region gateway *******************************************************************************************/

/// struct to keep track of active websocket connections
pub struct WsConnection {
    pub remote_addr: SocketAddr,
    pub ws_sender: SplitSink<WebSocket,Message>, // used to send through the websocket
    pub ws_receiver_task: JoinHandle<()>, // the task that (async) reads from the websocket
}

impl WsConnection {
    // note this should not be used if we send batches to the same connection (use feed() or send_all() in this case)
    pub async fn send (&mut self, msg: String)->FleetServerResult<()> {
        Ok( self.ws_sender.send( Message::text(msg)).await? )
    }
}

/// the transport endpoint: a http server upgrading `GET /ws` requests plus a run loop that
/// owns the connection map and processes `GatewayCmd`s. Inbound frames and connection
/// open/close are reported through the `ConnectionEvent` channel passed to `new`
pub struct Gateway {
    config: GatewayConfig,
    connections: HashMap<SocketAddr,WsConnection>, // updated when processing AddConnection/RemoveConnection
    cmd_rx: mpsc::Receiver<GatewayCmd>,
    hgate: GatewayHandle, // for the upgrade handler and receiver tasks
    event_tx: mpsc::Sender<ConnectionEvent>,
    listener: Option<TcpListener>, // pre-bound by bind(), otherwise bound lazily in run()
    server_task: Option<JoinHandle<()>>,
}

impl Gateway {

    pub fn new (config: GatewayConfig, event_tx: mpsc::Sender<ConnectionEvent>)->(Self, GatewayHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel( DEFAULT_CHANNEL_BOUNDS);
        let hgate = GatewayHandle { tx: cmd_tx };

        let gateway = Gateway {
            config,
            connections: HashMap::new(),
            cmd_rx,
            hgate: hgate.clone(),
            event_tx,
            listener: None,
            server_task: None,
        };
        (gateway, hgate)
    }

    /// bind the listening socket ahead of `run`. This is how callers learn the effective address
    /// when the configured port is 0 (ephemeral)
    pub async fn bind (&mut self)->FleetServerResult<SocketAddr> {
        let listener = TcpListener::bind( self.config.sock_addr).await?;
        let local_addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(local_addr)
    }

    /// the gateway task body: spawns the http server and processes commands until `Shutdown`
    pub async fn run (mut self)->FleetServerResult<()> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => TcpListener::bind( self.config.sock_addr).await?
        };
        info!("serving ws://{}/ws", listener.local_addr()?);

        let router = self.build_router().into_make_service_with_connect_info::<SocketAddr>();
        self.server_task = Some( tokio::spawn( async move {
            if let Err(e) = axum::serve( listener, router).await {
                warn!("server task failed: {e}");
            }
        }));

        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                GatewayCmd::AddConnection{remote_addr, ws} => {
                    if let Err(e) = self.add_connection( remote_addr, ws).await {
                        warn!("failed to add connection {remote_addr}: {e}");
                    }
                }
                GatewayCmd::SendWs{remote_addr, data} => {
                    self.send_ws_msg( remote_addr, data).await;
                }
                GatewayCmd::BroadcastWs{data} => {
                    self.broadcast_ws_msg( data).await;
                }
                GatewayCmd::RemoveConnection{remote_addr} => {
                    self.remove_connection( remote_addr);
                }
                GatewayCmd::Shutdown => break,
            }
        }

        self.stop_server();
        Ok(())
    }

    fn build_router (&self)->Router {
        let hgate = self.hgate.clone();

        Router::new()
            .route( "/ws", get( move |ws: WebSocketUpgrade, ci: ConnectInfo<SocketAddr>| { ws_handler( ws, ci, hgate) }))
            .layer( TraceLayer::new_for_http())
    }

    /// called when processing an AddConnection command
    async fn add_connection (&mut self, remote_addr: SocketAddr, ws: WebSocket)->FleetServerResult<()> {
        let (ws_sender, mut ws_receiver) = ws.split();

        // the Opened event has to reach the domain task before anything the receiver forwards
        self.event_tx.send( ConnectionEvent::Opened{remote_addr}).await
            .map_err(|_| connect_error("connection event channel closed"))?;

        let ws_receiver_task = {
            let hgate = self.hgate.clone();
            let event_tx = self.event_tx.clone();

            tokio::spawn( async move {
                while let Some(Ok(msg)) = ws_receiver.next().await {
                    match msg {
                        Message::Text(text) => {
                            if !text.is_empty() {
                                if event_tx.send( ConnectionEvent::Msg{ remote_addr, text: text.to_string()}).await.is_err() {
                                    break
                                }
                            }
                        }
                        Message::Close(_) => break,
                        _ => {} // binary frames are not part of the protocol, ping/pong is answered by axum
                    }
                }
                let _ = event_tx.send( ConnectionEvent::Closed{remote_addr}).await;
                let _ = hgate.remove_connection( remote_addr).await;
            })
        };

        info!("new connection from {remote_addr}");
        self.connections.insert( remote_addr, WsConnection{ remote_addr, ws_sender, ws_receiver_task});
        Ok(())
    }

    /// called when processing a SendWs command. A send failure is not escalated - the
    /// receiver half of a dead socket terminates and triggers the removal path
    async fn send_ws_msg (&mut self, remote_addr: SocketAddr, data: String) {
        if let Some(conn) = self.connections.get_mut( &remote_addr) {
            if let Err(e) = conn.send( data).await {
                warn!("failed to send to {remote_addr}: {e}");
            }
        } else {
            debug!("dropping frame for unknown connection {remote_addr}");
        }
    }

    /// called when processing a BroadcastWs command
    async fn broadcast_ws_msg (&mut self, data: String) {
        let msg = Message::text( data);
        for conn in self.connections.values_mut() {
            if let Err(e) = conn.ws_sender.send( msg.clone()).await {
                warn!("failed to send to {}: {e}", conn.remote_addr);
            }
        }
    }

    fn remove_connection (&mut self, remote_addr: SocketAddr) {
        if let Some(conn) = self.connections.remove( &remote_addr) {
            conn.ws_receiver_task.abort(); // no-op if the task already ran to completion
            info!("connection {remote_addr} closed");
        }
    }

    fn stop_server (&mut self) {
        for (_,conn) in self.connections.drain() {
            conn.ws_receiver_task.abort();
        }
        if let Some(jh) = self.server_task.take() {
            jh.abort();
        }
    }
}

async fn ws_handler (ws: WebSocketUpgrade, ConnectInfo(remote_addr): ConnectInfo<SocketAddr>, hgate: GatewayHandle)->Response {
    ws.on_upgrade( move |socket| handle_socket( socket, remote_addr, hgate)).into_response()
}

async fn handle_socket (ws: WebSocket, remote_addr: SocketAddr, hgate: GatewayHandle) {
    let _ = hgate.add_connection( remote_addr, ws).await;
}

/* #endregion gateway */
