// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use exo_env::{EnvError, Environment};
use serde_json::Value;

use crate::{
    context::{IP_CONTEXT_FIELD, PluginContext},
    env_const::is_local_mode,
    request::RequestLike,
    resolver::{ResolvedIp, resolve},
};

/// Substituted for an unresolved client IP in local mode
pub const LOCAL_FALLBACK_IP: &str = "127.0.0.1";

/// Invoked by the framework with the execution result once execution completes
pub type OnExecuteDone = Box<dyn FnOnce(&Value) + Send>;

/// A hook into request execution
pub trait Plugin: Send + Sync {
    /// Called when execution of a request starts. The returned callback, if any, must be called
    /// once execution completes.
    fn on_execute(&self, context: &mut dyn PluginContext) -> Option<OnExecuteDone>;
}

/// Adds the client IP to the execution context under [`IP_CONTEXT_FIELD`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpPlugin {
    is_local: bool,
}

impl ClientIpPlugin {
    pub fn new(is_local: bool) -> Self {
        Self { is_local }
    }

    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self::new(is_local_mode(env)?))
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Resolve the client IP of `request`, applying the local mode fallback
    pub fn client_ip(&self, request: Option<&RequestLike>) -> ResolvedIp {
        let resolved = request.map(resolve).unwrap_or_else(ResolvedIp::unknown);

        if self.is_local && resolved.is_unknown() {
            ResolvedIp::substitute(LOCAL_FALLBACK_IP)
        } else {
            resolved
        }
    }
}

impl Plugin for ClientIpPlugin {
    fn on_execute(&self, context: &mut dyn PluginContext) -> Option<OnExecuteDone> {
        let resolved = self.client_ip(context.request());

        if self.is_local {
            tracing::info!(
                client_ip = resolved.ip(),
                source = resolved.source().map(|source| source.name()),
                "Client IP"
            );
        }

        context.extend(IP_CONTEXT_FIELD, Value::String(resolved.into_ip()));

        if !self.is_local {
            return None;
        }

        let on_done: OnExecuteDone = Box::new(|_result: &Value| {
            tracing::info!("Client IP plugin: execution completed");
        });
        Some(on_done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{context::ExecutionContext, env_const::EXO_CLIENT_IP_LOCAL, resolver::UNKNOWN_IP};
    use exo_env::{MapEnvironment, SystemEnvironment};
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn local_mode_substitutes_loopback() {
        let local = ClientIpPlugin::new(true);
        let production = ClientIpPlugin::default();

        let request = RequestLike::default();

        assert_eq!(local.client_ip(Some(&request)).ip(), LOCAL_FALLBACK_IP);
        assert_eq!(local.client_ip(None).ip(), LOCAL_FALLBACK_IP);
        assert_eq!(production.client_ip(Some(&request)).ip(), UNKNOWN_IP);
        assert_eq!(production.client_ip(None).ip(), UNKNOWN_IP);
    }

    #[multiplatform_test]
    fn local_mode_keeps_resolved_ip() {
        let request = RequestLike::default().with_ip("203.0.113.9");

        assert_eq!(
            ClientIpPlugin::new(true).client_ip(Some(&request)).ip(),
            "203.0.113.9"
        );
    }

    #[multiplatform_test]
    fn production_mode_has_no_completion_hook() {
        let mut context = ExecutionContext::new();

        let on_done = ClientIpPlugin::new(false).on_execute(&mut context);

        assert!(on_done.is_none());
        assert_eq!(context.client_ip(), Some(UNKNOWN_IP));
    }

    #[multiplatform_test]
    fn local_mode_returns_completion_hook() {
        let mut context = ExecutionContext::new();

        let on_done = ClientIpPlugin::new(true).on_execute(&mut context);

        assert_eq!(context.client_ip(), Some(LOCAL_FALLBACK_IP));
        let on_done = on_done.expect("local mode should hook completion");
        on_done(&Value::Null);
    }

    #[multiplatform_test]
    fn configured_from_env() {
        let env = MapEnvironment::from([(EXO_CLIENT_IP_LOCAL, "yes")]);
        assert!(ClientIpPlugin::from_env(&env).unwrap().is_local());

        assert!(!ClientIpPlugin::from_env(&MapEnvironment::new()).unwrap().is_local());

        let env = MapEnvironment::from([(EXO_CLIENT_IP_LOCAL, "perhaps")]);
        assert!(matches!(
            ClientIpPlugin::from_env(&env),
            Err(EnvError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn configured_from_overrides_over_process_env() {
        let mut env = MapEnvironment::new_with_fallback(Arc::new(SystemEnvironment));
        env.set(EXO_CLIENT_IP_LOCAL, "on");

        assert!(ClientIpPlugin::from_env(&env).unwrap().is_local());
    }
}
