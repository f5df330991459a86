// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::http::{HeaderLookup, RequestHeaders};

/// Connection metadata attached to a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
}

impl ConnectionInfo {
    pub fn new(remote_address: impl Into<String>) -> Self {
        Self {
            remote_address: Some(remote_address.into()),
        }
    }
}

/// The parts of an incoming request that may identify the client
///
/// Servers fill in whatever they know: proxies show up as headers, some frameworks expose the
/// peer address on `socket` or `connection`, and others precompute `ip`/`ips` from a trusted
/// proxy list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestLike {
    #[serde(default)]
    pub headers: RequestHeaders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips: Option<Vec<String>>,
}

impl RequestLike {
    pub fn new(headers: impl Into<RequestHeaders>) -> Self {
        Self {
            headers: headers.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Capture the headers of an `http` request along with the peer address of its connection.
    pub fn from_http_request<B>(request: &http::Request<B>, remote_addr: Option<SocketAddr>) -> Self {
        Self {
            headers: RequestHeaders::Map(request.headers().clone()),
            socket: remote_addr.map(|addr| ConnectionInfo::new(addr.ip().to_string())),
            ..Default::default()
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_ips<I, S>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ips = Some(ips.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_socket(mut self, socket: ConnectionInfo) -> Self {
        self.socket = Some(socket);
        self
    }

    pub fn with_connection(mut self, connection: ConnectionInfo) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn decodes_js_style_request() {
        let request = RequestLike::from_json(
            r#"{
                "headers": {"X-Real-Ip": "203.0.113.195"},
                "socket": {"remoteAddress": "::ffff:10.0.0.1"},
                "connection": {},
                "ips": ["198.51.100.1", "198.51.100.2"]
            }"#,
        )
        .unwrap();

        assert_eq!(request.header("x-real-ip").as_deref(), Some("203.0.113.195"));
        assert_eq!(
            request.socket,
            Some(ConnectionInfo::new("::ffff:10.0.0.1"))
        );
        assert_eq!(request.connection, Some(ConnectionInfo::default()));
        assert_eq!(request.ip, None);
        assert_eq!(request.ips.as_ref().map(Vec::len), Some(2));
    }

    #[multiplatform_test]
    fn missing_headers_default_to_empty_record() {
        let request = RequestLike::from_json(r#"{"ip": "1.2.3.4"}"#).unwrap();

        assert!(matches!(&request.headers, RequestHeaders::Record(record) if record.is_empty()));
        assert_eq!(request.ip.as_deref(), Some("1.2.3.4"));
    }

    #[multiplatform_test]
    fn captures_http_request() {
        let request = http::Request::builder()
            .header("x-real-ip", "203.0.113.7")
            .body(())
            .unwrap();
        let peer = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)), 4000);

        let request = RequestLike::from_http_request(&request, Some(peer));

        assert!(matches!(request.headers, RequestHeaders::Map(_)));
        assert_eq!(request.header("x-real-ip").as_deref(), Some("203.0.113.7"));
        assert_eq!(request.socket, Some(ConnectionInfo::new("10.1.2.3")));
        assert_eq!(request.connection, None);
    }
}
