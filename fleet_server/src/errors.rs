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

use thiserror::Error;

pub type FleetServerResult<T> = std::result::Result<T, FleetServerError>;

#[derive(Error,Debug)]
pub enum FleetServerError {

    #[error("IO error: {0}")]
    IoError( #[from] std::io::Error),

    #[error("websocket error: {0}")]
    WsError( #[from] axum::Error),

    #[error("connect error: {0}")]
    ConnectError(String),

    #[error("operation failed: {0}")]
    OpFailed( String ),
}

pub fn op_failed (msg: impl ToString)->FleetServerError {
    FleetServerError::OpFailed(msg.to_string())
}

pub fn connect_error (msg: impl ToString)->FleetServerError {
    FleetServerError::ConnectError(msg.to_string())
}
