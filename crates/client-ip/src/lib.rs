// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod context;
pub mod env_const;
pub mod http;
pub mod logging_tracing;
pub mod plugin;
pub mod request;
pub mod resolver;

pub use context::{ExecutionContext, IP_CONTEXT_FIELD, PluginContext};
pub use plugin::{ClientIpPlugin, LOCAL_FALLBACK_IP, OnExecuteDone, Plugin};
pub use request::{ConnectionInfo, RequestLike};
pub use resolver::{IpSource, ResolvedIp, UNKNOWN_IP, resolve, resolve_client_ip};
