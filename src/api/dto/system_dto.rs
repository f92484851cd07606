//! Responses for the service-level endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// One ICE server entry in WebRTC `RTCConfiguration` shape.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IceServerDto {
    /// STUN/TURN URLs.
    pub urls: Vec<String>,
}

/// Response body for `GET /api/config`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IceConfigResponse {
    /// ICE servers, one entry per configured URL.
    #[serde(rename = "iceServers")]
    pub ice_servers: Vec<IceServerDto>,
}

impl IceConfigResponse {
    /// Builds the response from configured URLs.
    #[must_use]
    pub fn from_urls(urls: &[String]) -> Self {
        Self {
            ice_servers: urls
                .iter()
                .map(|url| IceServerDto {
                    urls: vec![url.clone()],
                })
                .collect(),
        }
    }
}

/// Response body for `GET /api/`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceInfoResponse {
    /// Service banner.
    pub message: String,
    /// Always `"online"`.
    pub status: String,
}
