// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use exo_env::{EnvError, Environment};

pub const EXO_LOG: &str = "EXO_LOG";

pub const EXO_CLIENT_IP_LOCAL: &str = "EXO_CLIENT_IP_LOCAL";

/// Local mode substitutes a loopback address for an unresolved client IP and logs each resolution.
pub fn is_local_mode(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(EXO_CLIENT_IP_LOCAL, false)
}
