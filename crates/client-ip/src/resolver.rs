// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Client IP resolution.
//!
//! The client IP is taken from the first usable source in [`IpSource::ALL`]: well-known proxy
//! headers first, then whatever the server recorded about the connection. Values are not
//! validated, and headers are trusted as delivered.

use std::fmt;

use crate::request::RequestLike;

/// Returned when no source yields a usable value
pub const UNKNOWN_IP: &str = "unknown";

const IPV4_MAPPED_PREFIX: &str = "::ffff:";

/// A place the client IP may be found, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpSource {
    XForwardedFor,
    XRealIp,
    XClientIp,
    XForwarded,
    XClusterClientIp,
    ForwardedFor,
    Forwarded,
    /// Cloudflare
    CfConnectingIp,
    /// Cloudflare Enterprise, Akamai
    TrueClientIp,
    XOriginalForwardedFor,
    RequestIp,
    RequestIps,
    SocketRemoteAddress,
    ConnectionRemoteAddress,
}

impl IpSource {
    pub const ALL: [IpSource; 14] = [
        IpSource::XForwardedFor,
        IpSource::XRealIp,
        IpSource::XClientIp,
        IpSource::XForwarded,
        IpSource::XClusterClientIp,
        IpSource::ForwardedFor,
        IpSource::Forwarded,
        IpSource::CfConnectingIp,
        IpSource::TrueClientIp,
        IpSource::XOriginalForwardedFor,
        IpSource::RequestIp,
        IpSource::RequestIps,
        IpSource::SocketRemoteAddress,
        IpSource::ConnectionRemoteAddress,
    ];

    /// The header name for header sources, or the request field otherwise
    pub fn name(&self) -> &'static str {
        match self {
            IpSource::XForwardedFor => "x-forwarded-for",
            IpSource::XRealIp => "x-real-ip",
            IpSource::XClientIp => "x-client-ip",
            IpSource::XForwarded => "x-forwarded",
            IpSource::XClusterClientIp => "x-cluster-client-ip",
            IpSource::ForwardedFor => "forwarded-for",
            IpSource::Forwarded => "forwarded",
            IpSource::CfConnectingIp => "cf-connecting-ip",
            IpSource::TrueClientIp => "true-client-ip",
            IpSource::XOriginalForwardedFor => "x-original-forwarded-for",
            IpSource::RequestIp => "ip",
            IpSource::RequestIps => "ips",
            IpSource::SocketRemoteAddress => "socket.remoteAddress",
            IpSource::ConnectionRemoteAddress => "connection.remoteAddress",
        }
    }

    /// The raw candidate this source offers, before any usability check
    pub fn extract(&self, request: &RequestLike) -> Option<String> {
        match self {
            // The header holds `client, proxy1, proxy2, ...`
            IpSource::XForwardedFor => request
                .header(self.name())
                .and_then(|value| value.split(',').next().map(|ip| ip.trim().to_string())),
            IpSource::RequestIp => request.ip.clone(),
            IpSource::RequestIps => request.ips.as_ref().and_then(|ips| ips.first().cloned()),
            IpSource::SocketRemoteAddress => request
                .socket
                .as_ref()
                .and_then(|socket| socket.remote_address.clone()),
            IpSource::ConnectionRemoteAddress => request
                .connection
                .as_ref()
                .and_then(|connection| connection.remote_address.clone()),
            header => request.header(header.name()),
        }
    }
}

impl fmt::Display for IpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved client IP along with the source it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIp {
    ip: String,
    source: Option<IpSource>,
}

impl ResolvedIp {
    pub fn unknown() -> Self {
        Self {
            ip: UNKNOWN_IP.to_string(),
            source: None,
        }
    }

    /// An IP that did not come from the request, such as a configured default
    pub fn substitute(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            source: None,
        }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// `None` when no source resolved
    pub fn source(&self) -> Option<IpSource> {
        self.source
    }

    pub fn is_unknown(&self) -> bool {
        self.ip == UNKNOWN_IP
    }

    pub fn into_ip(self) -> String {
        self.ip
    }
}

impl fmt::Display for ResolvedIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ip)
    }
}

/// Resolve the client IP of a request, or [`UNKNOWN_IP`] if nothing usable is found.
pub fn resolve_client_ip(request: &RequestLike) -> String {
    resolve(request).into_ip()
}

/// Same as [`resolve_client_ip`], but also reports which source won.
pub fn resolve(request: &RequestLike) -> ResolvedIp {
    IpSource::ALL
        .iter()
        .find_map(|source| {
            source
                .extract(request)
                .filter(|candidate| is_usable(candidate))
                .map(|ip| ResolvedIp {
                    ip: strip_ipv4_mapped_prefix(&ip).to_string(),
                    source: Some(*source),
                })
        })
        .unwrap_or_else(ResolvedIp::unknown)
}

// A literal "unknown" (as some proxies send) is no better than nothing
fn is_usable(candidate: &str) -> bool {
    !candidate.is_empty() && candidate != UNKNOWN_IP
}

fn strip_ipv4_mapped_prefix(ip: &str) -> &str {
    ip.strip_prefix(IPV4_MAPPED_PREFIX).unwrap_or(ip)
}
