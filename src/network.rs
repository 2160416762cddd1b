//! Local network identity - hostname and the address reported to clients

use parking_lot::RwLock;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use tracing::{debug, info};

/// Queryable "current address" used in the handshake greeting
pub trait AddressSource: Send + Sync {
    fn current_address(&self) -> String;
}

/// Hostname plus the address this device is reachable at
///
/// The address is either a configured override or the detected address of
/// the outbound interface. The override can be swapped at runtime (config
/// hot-reload).
pub struct NetworkInfo {
    hostname: String,
    detected: IpAddr,
    address_override: RwLock<Option<String>>,
}

impl NetworkInfo {
    pub fn new(hostname: impl Into<String>, address_override: Option<String>) -> Self {
        Self::with_detected(hostname, detect_local_ip(), address_override)
    }

    /// Build with a known interface address (no detection)
    pub fn with_detected(
        hostname: impl Into<String>,
        detected: IpAddr,
        address_override: Option<String>,
    ) -> Self {
        let info = Self {
            hostname: hostname.into(),
            detected,
            address_override: RwLock::new(address_override),
        };
        info!(
            "Network identity: hostname '{}', address {}",
            info.hostname,
            info.current_address()
        );
        info
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn detected_address(&self) -> IpAddr {
        self.detected
    }

    pub fn set_address_override(&self, address: Option<String>) {
        *self.address_override.write() = address;
        debug!("Reported address is now {}", self.current_address());
    }
}

impl AddressSource for NetworkInfo {
    fn current_address(&self) -> String {
        self.address_override
            .read()
            .clone()
            .unwrap_or_else(|| self.detected.to_string())
    }
}

/// Address of the interface that would route to the outside world
///
/// Connecting a UDP socket sends no packets; it only resolves the route.
/// Falls back to loopback when no route exists.
pub fn detect_local_ip() -> IpAddr {
    let probe = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9))?;
        Ok(socket.local_addr()?.ip())
    };

    match probe() {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Err(e) => {
            debug!("Local address detection failed: {}", e);
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        },
    }
}
