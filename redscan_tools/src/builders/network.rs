//! Network reconnaissance tools: nmap, ping, enum4linux.

use super::ToolCommand;
use crate::error::Result;
use crate::sanitize::{validate_extra_args, validate_ports, validate_target};
use schemars::JsonSchema;
use serde::Deserialize;

/// Largest payload `ping -s` accepts: 65535 minus IP and ICMP headers.
const MAX_PING_PACKET_SIZE: u32 = 65507;

/// Parameters for an nmap scan.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct NmapParams {
    /// Hostname, IP address, or CIDR range to scan.
    pub target: String,
    /// Scan type flags, e.g. "-sV" or "-sS". Defaults to "-sCV".
    pub scan_type: Option<String>,
    /// Port specification, e.g. "80,443" or "1-1024". All ports when unset.
    pub ports: Option<String>,
    /// Extra nmap flags appended verbatim. Defaults to "-T4 -Pn".
    pub additional_args: Option<String>,
}

impl ToolCommand for NmapParams {
    fn command_line(&self) -> Result<String> {
        validate_target("target", &self.target)?;

        let scan_type = self.scan_type.as_deref().unwrap_or("-sCV");
        validate_extra_args("scan_type", scan_type)?;
        let extra = self.additional_args.as_deref().unwrap_or("-T4 -Pn");
        validate_extra_args("additional_args", extra)?;

        let mut command = format!("nmap {scan_type}");
        if let Some(ports) = self.ports.as_deref() {
            validate_ports("ports", ports)?;
            command.push_str(" -p ");
            command.push_str(ports);
        }
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        command.push(' ');
        command.push_str(self.target.trim());
        Ok(command)
    }
}

/// Parameters for a connectivity check with ping.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PingParams {
    /// Hostname or IP address to probe.
    pub target: String,
    /// Number of echo requests to send. Defaults to 4.
    pub count: Option<u32>,
    /// ICMP payload size in bytes, at most 65507.
    pub packet_size: Option<u32>,
}

impl ToolCommand for PingParams {
    fn command_line(&self) -> Result<String> {
        validate_target("target", &self.target)?;

        let count = self.count.unwrap_or(4);
        if count == 0 {
            return Err(crate::error::ToolError::invalid(
                "count",
                "must be at least 1",
            ));
        }

        let mut command = format!("ping -c {count} -W 5");
        if let Some(size) = self.packet_size {
            if size > MAX_PING_PACKET_SIZE {
                return Err(crate::error::ToolError::invalid(
                    "packet_size",
                    format!("must be at most {MAX_PING_PACKET_SIZE}"),
                ));
            }
            command.push_str(&format!(" -s {size}"));
        }
        command.push(' ');
        command.push_str(self.target.trim());
        Ok(command)
    }
}

/// Parameters for SMB/Windows enumeration with enum4linux.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Enum4linuxParams {
    /// Hostname or IP address of the SMB host.
    pub target: String,
    /// Extra enum4linux flags. Defaults to "-a" (all simple enumeration).
    pub additional_args: Option<String>,
}

impl ToolCommand for Enum4linuxParams {
    fn command_line(&self) -> Result<String> {
        validate_target("target", &self.target)?;
        let extra = self.additional_args.as_deref().unwrap_or("-a");
        validate_extra_args("additional_args", extra)?;
        Ok(format!("enum4linux {extra} {}", self.target.trim()))
    }
}
