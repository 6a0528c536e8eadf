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

pub type FleetSimResult<T> = std::result::Result<T, FleetSimError>;

#[derive(Error,Debug)]
pub enum FleetSimError {

    #[error("IO error: {0}")]
    IoError( #[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("RON deserialization error {0}")]
    RonDeError( #[from] ron::de::SpannedError),

    #[error("server error: {0}")]
    ServerError( #[from] fleet_server::FleetServerError),

    #[error("invalid track data: {0}")]
    InvalidData(String),

    #[error("unknown vehicle: {0}")]
    UnknownVehicle(String),

    #[error("operation failed: {0}")]
    OpFailed( String ),
}

pub fn invalid_data (msg: impl ToString)->FleetSimError {
    FleetSimError::InvalidData(msg.to_string())
}

pub fn unknown_vehicle (plate: impl ToString)->FleetSimError {
    FleetSimError::UnknownVehicle(plate.to_string())
}

pub fn op_failed (msg: impl ToString)->FleetSimError {
    FleetSimError::OpFailed(msg.to_string())
}
