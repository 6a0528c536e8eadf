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

// hub invariant tests. None of these run a gateway - the hub gets a hand-made command
// channel instead, so the tests can look at every frame it would have pushed to a peer.
// run with: cargo test --test test_hub -- --nocapture

#![allow(unused)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tokio::time::timeout;

use fleet_server::{ConnectionEvent,GatewayCmd,GatewayHandle};
use fleet_sim::{TrackStore,VehicleStatus};
use fleet_sim::config::{EndOfTrackPolicy,SimConfig};
use fleet_sim::hub::VehicleHub;
use fleet_sim::protocol::{ClientRequest,ServerEvent};
use fleet_sim::service::SimTick;

const P1: &str = "DXB-CX-36357"; // 4 waypoints
const P2: &str = "DXB-CX-36364"; // 2 waypoints

const DATASET: &str = r#"[
    { "plate": "DXB-CX-36357",
      "waypoints": [
        { "lat": 25.19000, "lng": 55.26000, "angle": 90.0, "speed": 40.0, "status": "moving",  "timestamp": "2026-08-26T08:00:00Z" },
        { "lat": 25.19000, "lng": 55.26100, "angle": 90.0, "speed": 45.0, "status": "moving",  "timestamp": "2026-08-26T08:00:01Z" },
        { "lat": 25.19000, "lng": 55.26200, "angle": 90.0, "speed": 50.0, "status": "moving",  "timestamp": "2026-08-26T08:00:02Z" },
        { "lat": 25.19000, "lng": 55.26300, "angle": 90.0, "speed":  0.0, "status": "stopped", "timestamp": "2026-08-26T08:00:03Z" }
      ]
    },
    { "plate": "DXB-CX-36364",
      "waypoints": [
        { "lat": 25.21000, "lng": 55.28000, "angle": 180.0, "speed": 30.0, "status": "moving", "timestamp": "2026-08-26T08:00:00Z" },
        { "lat": 25.20900, "lng": 55.28000, "angle": 180.0, "speed": 35.0, "status": "moving", "timestamp": "2026-08-26T08:00:01Z" }
      ]
    }
]"#;

fn conn (port: u16)->SocketAddr {
    SocketAddr::from( ([127,0,0,1], port))
}

fn make_hub (config: SimConfig)->(VehicleHub, mpsc::Receiver<GatewayCmd>, mpsc::Sender<ConnectionEvent>) {
    let store = Arc::new( TrackStore::from_json( DATASET).expect("failed to load test dataset"));
    let (cmd_tx, cmd_rx) = mpsc::channel( 64);
    let (event_tx, event_rx) = mpsc::channel( 64);

    let hub = VehicleHub::new( store, config, GatewayHandle::new( cmd_tx), event_rx);
    (hub, cmd_rx, event_tx)
}

/// pop the next queued frame, if any
fn next_frame (cmd_rx: &mut mpsc::Receiver<GatewayCmd>)->Option<(SocketAddr,ServerEvent)> {
    match cmd_rx.try_recv() {
        Ok(GatewayCmd::SendWs { remote_addr, data }) => {
            Some( (remote_addr, ServerEvent::from_json( &data).expect("unparseable frame")))
        }
        _ => None
    }
}

fn assert_no_frames (cmd_rx: &mut mpsc::Receiver<GatewayCmd>) {
    assert!( cmd_rx.try_recv().is_err(), "unexpected queued frame");
}

async fn tick (hub: &mut VehicleHub, plate: &str) {
    let tick = SimTick { plate: hub.store.plate_of( plate).unwrap() };
    hub.handle_tick( tick).await.expect("tick handler failed");
}

#[tokio::test]
async fn test_get_vehicles() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let c1 = conn(40001);

    hub.handle_request( c1, ClientRequest::GetVehicles).await.unwrap();

    let (addr, event) = next_frame( &mut cmd_rx).expect("no vehiclesList frame");
    assert_eq!( addr, c1);
    assert_eq!( event, ServerEvent::VehiclesList( vec![P1.to_string(), P2.to_string()]));
    assert_no_frames( &mut cmd_rx);
}

#[tokio::test]
async fn test_subscribe_starts_one_cursor() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let (c1, c2) = (conn(40001), conn(40002));

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();
    assert!( hub.service.is_running( P1));
    assert_eq!( hub.service.cursor_index( P1), Some(0));
    assert!( hub.registry.is_subscribed( &c1, P1));
    assert_no_frames( &mut cmd_rx); // no ack, data arrives with the first timer tick

    // second subscriber joins the running playback instead of restarting it
    tick( &mut hub, P1).await;
    hub.handle_request( c2, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();
    assert_eq!( hub.service.n_running(), 1);
    assert_eq!( hub.service.cursor_index( P1), Some(1));
    assert_eq!( hub.registry.n_subscribers( P1), 2);
}

#[tokio::test]
async fn test_subscribe_unknown_plate() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let c1 = conn(40001);

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: "DXB-CX-99999".to_string() }).await.unwrap();

    let (addr, event) = next_frame( &mut cmd_rx).expect("no error frame");
    assert_eq!( addr, c1);
    match event {
        ServerEvent::Error { message } => {
            println!("got error frame: {message}");
            assert!( message.contains( "unknown vehicle"));
        }
        other => panic!("expected error frame, got {other:?}")
    }

    assert_eq!( hub.service.n_running(), 0); // no cursor was created
    assert!( hub.registry.is_empty());
}

#[tokio::test]
async fn test_malformed_request() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let c1 = conn(40001);

    let event = ConnectionEvent::Msg { remote_addr: c1, text: "{\"event\":\"launchMissiles\"}".to_string() };
    hub.handle_connection_event( event).await.unwrap();

    let (addr, event) = next_frame( &mut cmd_rx).expect("no error frame");
    assert_eq!( addr, c1);
    assert!( matches!( event, ServerEvent::Error { .. }));
    assert_eq!( hub.service.n_running(), 0);
}

#[tokio::test]
async fn test_emission_order_and_loop() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default()); // default wraps around
    let c1 = conn(40001);

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();

    for _ in 0..5 { tick( &mut hub, P1).await; }

    // 4 waypoints emitted in track order, then the wrap-around starts over
    let expected: Vec<usize> = vec![0, 1, 2, 3, 0];
    for i in expected {
        let (addr, event) = next_frame( &mut cmd_rx).expect("missing data frame");
        assert_eq!( addr, c1);
        match event {
            ServerEvent::VehicleData { plate, data } => {
                assert_eq!( plate, P1);
                assert_eq!( &data, hub.store.waypoint( P1, i).unwrap());
            }
            other => panic!("expected vehicleData frame, got {other:?}")
        }
    }
    assert_no_frames( &mut cmd_rx);
    assert!( hub.service.is_running( P1));
}

#[tokio::test]
async fn test_fanout_is_identical() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let (c1, c2) = (conn(40001), conn(40002));

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();
    hub.handle_request( c2, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();

    tick( &mut hub, P1).await;

    // both subscribers get the same serialized frame, in one tick
    let mut addrs: Vec<SocketAddr> = Vec::new();
    let mut payloads: Vec<String> = Vec::new();
    for _ in 0..2 {
        match cmd_rx.try_recv() {
            Ok(GatewayCmd::SendWs { remote_addr, data }) => {
                addrs.push( remote_addr);
                payloads.push( data);
            }
            other => panic!("expected queued frame")
        }
    }
    assert_no_frames( &mut cmd_rx);

    addrs.sort();
    assert_eq!( addrs, vec![c1, c2]);
    assert_eq!( payloads[0], payloads[1]);
    println!("fanned out: {}", payloads[0]);
}

#[tokio::test]
async fn test_unsubscribe_stops_at_last() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let (c1, c2) = (conn(40001), conn(40002));

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();
    hub.handle_request( c2, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();

    hub.handle_request( c1, ClientRequest::UnsubscribeFromVehicle { plate: P1.to_string() }).await.unwrap();
    let (addr, event) = next_frame( &mut cmd_rx).expect("no ack frame");
    assert_eq!( addr, c1);
    assert_eq!( event, ServerEvent::Unsubscribed { plate: P1.to_string() });
    assert!( hub.service.is_running( P1)); // c2 is still listening

    hub.handle_request( c2, ClientRequest::UnsubscribeFromVehicle { plate: P1.to_string() }).await.unwrap();
    let (_, event) = next_frame( &mut cmd_rx).expect("no ack frame");
    assert_eq!( event, ServerEvent::Unsubscribed { plate: P1.to_string() });
    assert!( !hub.service.is_running( P1)); // last one turned the playback off
    assert!( hub.registry.is_empty());
}

#[tokio::test]
async fn test_unsubscribe_edge_cases() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let c1 = conn(40001);

    // unknown plate is an error
    hub.handle_request( c1, ClientRequest::UnsubscribeFromVehicle { plate: "DXB-CX-99999".to_string() }).await.unwrap();
    let (_, event) = next_frame( &mut cmd_rx).expect("no error frame");
    assert!( matches!( event, ServerEvent::Error { .. }));

    // known plate without a subscription still acks
    hub.handle_request( c1, ClientRequest::UnsubscribeFromVehicle { plate: P1.to_string() }).await.unwrap();
    let (_, event) = next_frame( &mut cmd_rx).expect("no ack frame");
    assert_eq!( event, ServerEvent::Unsubscribed { plate: P1.to_string() });
    assert_eq!( hub.service.n_running(), 0);
}

#[tokio::test]
async fn test_disconnect_stops_orphaned_plates() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let (c1, c2) = (conn(40001), conn(40002));

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();
    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P2.to_string() }).await.unwrap();
    hub.handle_request( c2, ClientRequest::SubscribeToVehicle { plate: P2.to_string() }).await.unwrap();
    assert_eq!( hub.service.n_running(), 2);

    hub.handle_connection_event( ConnectionEvent::Closed { remote_addr: c1 }).await.unwrap();
    assert!( !hub.service.is_running( P1)); // c1 was its only subscriber
    assert!( hub.service.is_running( P2)); // c2 keeps it alive
    assert_no_frames( &mut cmd_rx); // disconnect cleanup is silent

    hub.handle_connection_event( ConnectionEvent::Closed { remote_addr: c2 }).await.unwrap();
    assert_eq!( hub.service.n_running(), 0);
    assert!( hub.registry.is_empty());
}

#[tokio::test]
async fn test_stale_tick_is_discarded() {
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( SimConfig::default());
    let c1 = conn(40001);

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P1.to_string() }).await.unwrap();
    let stale = SimTick { plate: hub.store.plate_of( P1).unwrap() };

    hub.handle_request( c1, ClientRequest::UnsubscribeFromVehicle { plate: P1.to_string() }).await.unwrap();
    let _ = next_frame( &mut cmd_rx); // drop the ack

    // the tick was queued before the stop - it must not emit anything now
    hub.handle_tick( stale).await.unwrap();
    assert_no_frames( &mut cmd_rx);
}

#[tokio::test]
async fn test_end_of_track_hold_last() {
    let config = SimConfig { end_of_track: EndOfTrackPolicy::HoldLast, ..SimConfig::default() };
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( config);
    let c1 = conn(40001);

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P2.to_string() }).await.unwrap();
    for _ in 0..4 { tick( &mut hub, P2).await; }

    // 2 waypoints, then the vehicle stays parked on the last one
    for i in [0usize, 1, 1, 1] {
        let (_, event) = next_frame( &mut cmd_rx).expect("missing data frame");
        match event {
            ServerEvent::VehicleData { data, .. } => assert_eq!( &data, hub.store.waypoint( P2, i).unwrap()),
            other => panic!("expected vehicleData frame, got {other:?}")
        }
    }
    assert!( hub.service.is_running( P2));
}

#[tokio::test]
async fn test_end_of_track_stop() {
    let config = SimConfig { end_of_track: EndOfTrackPolicy::Stop, ..SimConfig::default() };
    let (mut hub, mut cmd_rx, _event_tx) = make_hub( config);
    let c1 = conn(40001);

    hub.handle_request( c1, ClientRequest::SubscribeToVehicle { plate: P2.to_string() }).await.unwrap();
    for _ in 0..3 { tick( &mut hub, P2).await; }

    // both waypoints emitted, then the playback tore itself down
    for i in [0usize, 1] {
        let (_, event) = next_frame( &mut cmd_rx).expect("missing data frame");
        match event {
            ServerEvent::VehicleData { data, .. } => assert_eq!( &data, hub.store.waypoint( P2, i).unwrap()),
            other => panic!("expected vehicleData frame, got {other:?}")
        }
    }
    assert_no_frames( &mut cmd_rx); // third tick found no cursor
    assert!( !hub.service.is_running( P2));
    assert!( hub.registry.is_subscribed( &c1, P2)); // the subscription itself stays
}

// end-to-end run loop with virtual time: subscribe over the event channel, let the playback
// timer fire, unsubscribe, and check that the frame sequence ends with the ack
#[tokio::test(start_paused = true)]
async fn test_run_loop_streams() {
    let (hub, mut cmd_rx, event_tx) = make_hub( SimConfig::default());
    let expected = TrackStore::from_json( DATASET).unwrap(); // hub moves into its task
    let c1 = conn(40001);

    let hub_task = tokio::spawn( hub.run());

    event_tx.send( ConnectionEvent::Opened { remote_addr: c1 }).await.unwrap();
    let subscribe = ClientRequest::SubscribeToVehicle { plate: P1.to_string() }.to_json().unwrap();
    event_tx.send( ConnectionEvent::Msg { remote_addr: c1, text: subscribe }).await.unwrap();

    // the paused clock fast-forwards through the 1s timer periods
    let mut frames: Vec<ServerEvent> = Vec::new();
    while frames.len() < 3 {
        match timeout( Duration::from_secs(5), cmd_rx.recv()).await.expect("no frame within timeout") {
            Some(GatewayCmd::SendWs { remote_addr, data }) => {
                assert_eq!( remote_addr, c1);
                frames.push( ServerEvent::from_json( &data).unwrap());
            }
            _ => panic!("gateway command channel closed")
        }
    }

    for (i,frame) in frames.iter().enumerate() {
        println!("frame {i}: {frame:?}");
        match frame {
            ServerEvent::VehicleData { plate, data } => {
                assert_eq!( plate, P1);
                assert_eq!( data, expected.waypoint( P1, i).unwrap()); // track order, no gaps
            }
            other => panic!("expected vehicleData frame, got {other:?}")
        }
    }

    let unsubscribe = ClientRequest::UnsubscribeFromVehicle { plate: P1.to_string() }.to_json().unwrap();
    event_tx.send( ConnectionEvent::Msg { remote_addr: c1, text: unsubscribe }).await.unwrap();

    // data frames queued before the unsubscribe may still arrive, but the ack is final
    loop {
        match timeout( Duration::from_secs(5), cmd_rx.recv()).await.expect("no ack within timeout") {
            Some(GatewayCmd::SendWs { data, .. }) => {
                match ServerEvent::from_json( &data).unwrap() {
                    ServerEvent::Unsubscribed { plate } => { assert_eq!( plate, P1); break }
                    ServerEvent::VehicleData { .. } => continue,
                    other => panic!("unexpected frame {other:?}")
                }
            }
            _ => panic!("gateway command channel closed")
        }
    }

    // closing the event channel terminates the hub, nothing trickles in afterwards
    drop( event_tx);
    hub_task.await.unwrap().unwrap();
    for _ in 0..3 { tokio::task::yield_now().await; }
    assert!( cmd_rx.try_recv().is_err());
}
