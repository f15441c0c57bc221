//! Web application tools: gobuster, dirb, nikto, wpscan, sqlmap, nuclei.

use super::ToolCommand;
use crate::error::{Result, ToolError};
use crate::sanitize::{
    escape_shell_arg, validate_extra_args, validate_file_path, validate_identifier,
    validate_target, validate_url,
};
use schemars::JsonSchema;
use serde::Deserialize;

const DEFAULT_WORDLIST: &str = "/usr/share/wordlists/dirb/common.txt";

/// Accepts either a plain host target or a full http(s) URL, as tools like
/// nikto and nuclei do.
fn validate_host_or_url(field: &'static str, value: &str) -> Result<()> {
    if value.trim_start().starts_with("http://") || value.trim_start().starts_with("https://") {
        validate_url(field, value)
    } else {
        validate_target(field, value)
    }
}

/// Gobuster enumeration modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GobusterMode {
    #[default]
    Dir,
    Dns,
    Fuzz,
    Vhost,
}

impl GobusterMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Dns => "dns",
            Self::Fuzz => "fuzz",
            Self::Vhost => "vhost",
        }
    }
}

/// Parameters for content/DNS enumeration with gobuster.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GobusterParams {
    /// Target URL (dir/fuzz/vhost modes) or domain name (dns mode).
    pub url: String,
    /// Enumeration mode. Defaults to "dir".
    pub mode: GobusterMode,
    /// Wordlist path. Defaults to the dirb common list.
    pub wordlist: Option<String>,
    /// Extra gobuster flags appended verbatim.
    pub additional_args: Option<String>,
}

impl ToolCommand for GobusterParams {
    fn command_line(&self) -> Result<String> {
        // dns mode takes a bare domain behind -d; the other modes take -u
        // with a full URL.
        let target_flag = match self.mode {
            GobusterMode::Dns => {
                validate_target("url", &self.url)?;
                "-d"
            }
            _ => {
                validate_url("url", &self.url)?;
                "-u"
            }
        };
        let wordlist = self.wordlist.as_deref().unwrap_or(DEFAULT_WORDLIST);
        validate_file_path("wordlist", wordlist)?;
        let extra = self.additional_args.as_deref().unwrap_or("");
        validate_extra_args("additional_args", extra)?;

        let mut command = format!(
            "gobuster {} {target_flag} {} -w {wordlist}",
            self.mode.as_str(),
            self.url.trim()
        );
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        Ok(command)
    }
}

/// Parameters for directory brute-forcing with dirb.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct DirbParams {
    /// Target URL to enumerate.
    pub url: String,
    /// Wordlist path. Defaults to the dirb common list.
    pub wordlist: Option<String>,
    /// Extra dirb flags appended verbatim.
    pub additional_args: Option<String>,
}

impl ToolCommand for DirbParams {
    fn command_line(&self) -> Result<String> {
        validate_url("url", &self.url)?;
        let wordlist = self.wordlist.as_deref().unwrap_or(DEFAULT_WORDLIST);
        validate_file_path("wordlist", wordlist)?;
        let extra = self.additional_args.as_deref().unwrap_or("");
        validate_extra_args("additional_args", extra)?;

        let mut command = format!("dirb {} {wordlist}", self.url.trim());
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        Ok(command)
    }
}

/// Parameters for a web server scan with nikto.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct NiktoParams {
    /// Target hostname, IP address, or full URL.
    pub target: String,
    /// Extra nikto flags appended verbatim.
    pub additional_args: Option<String>,
}

impl ToolCommand for NiktoParams {
    fn command_line(&self) -> Result<String> {
        validate_host_or_url("target", &self.target)?;
        let extra = self.additional_args.as_deref().unwrap_or("");
        validate_extra_args("additional_args", extra)?;

        let mut command = format!("nikto -h {}", self.target.trim());
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        Ok(command)
    }
}

/// Parameters for a WordPress audit with wpscan.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct WpscanParams {
    /// URL of the WordPress site.
    pub url: String,
    /// Extra wpscan flags appended verbatim.
    pub additional_args: Option<String>,
}

impl ToolCommand for WpscanParams {
    fn command_line(&self) -> Result<String> {
        validate_url("url", &self.url)?;
        let extra = self.additional_args.as_deref().unwrap_or("");
        validate_extra_args("additional_args", extra)?;

        let mut command = format!("wpscan --url {}", self.url.trim());
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        Ok(command)
    }
}

/// Parameters for SQL injection testing with sqlmap.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SqlmapParams {
    /// Target URL, typically including a parameterized query string.
    pub url: String,
    /// POST body to test. Single-quoted into the command, so it may contain
    /// arbitrary payload characters.
    pub data: Option<String>,
    /// Extra sqlmap flags appended verbatim.
    pub additional_args: Option<String>,
}

impl ToolCommand for SqlmapParams {
    fn command_line(&self) -> Result<String> {
        validate_url("url", &self.url)?;
        let extra = self.additional_args.as_deref().unwrap_or("");
        validate_extra_args("additional_args", extra)?;

        // --batch keeps sqlmap from stalling on interactive prompts under a
        // non-interactive executor.
        let mut command = format!("sqlmap -u {} --batch", escape_shell_arg(self.url.trim()));
        if let Some(data) = self.data.as_deref() {
            command.push_str(" --data=");
            command.push_str(&escape_shell_arg(data));
        }
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        Ok(command)
    }
}

/// Severity filters accepted by nuclei.
const NUCLEI_SEVERITIES: &[&str] = &["info", "low", "medium", "high", "critical"];

/// Parameters for template-based vulnerability scanning with nuclei.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct NucleiParams {
    /// Target host or URL.
    pub target: String,
    /// Template file or directory to run. All defaults when unset.
    pub templates: Option<String>,
    /// Severity filter: comma-separated values from
    /// info, low, medium, high, critical.
    pub severity: Option<String>,
    /// Comma-separated template tags to select.
    pub tags: Option<String>,
}

impl ToolCommand for NucleiParams {
    fn command_line(&self) -> Result<String> {
        validate_host_or_url("target", &self.target)?;

        let mut command = format!("nuclei -u {}", self.target.trim());
        if let Some(templates) = self.templates.as_deref() {
            validate_file_path("templates", templates)?;
            command.push_str(" -t ");
            command.push_str(templates);
        }
        if let Some(severity) = self.severity.as_deref() {
            let mut levels = Vec::new();
            for level in severity.split(',') {
                let level = level.trim();
                if !NUCLEI_SEVERITIES.contains(&level) {
                    return Err(ToolError::invalid(
                        "severity",
                        format!("unknown severity '{level}'"),
                    ));
                }
                levels.push(level);
            }
            command.push_str(" -s ");
            command.push_str(&levels.join(","));
        }
        if let Some(tags) = self.tags.as_deref() {
            validate_identifier("tags", tags)?;
            command.push_str(" -tags ");
            command.push_str(tags.trim());
        }
        // -silent keeps the stream to findings; interactsh callbacks need
        // outbound infrastructure this server does not manage.
        command.push_str(" -silent -no-interactsh");
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gobuster_dir_defaults() {
        let params = GobusterParams {
            url: "http://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "gobuster dir -u http://example.com -w /usr/share/wordlists/dirb/common.txt"
        );
    }

    #[test]
    fn gobuster_dns_takes_a_bare_domain() {
        let params = GobusterParams {
            url: "example.com".to_string(),
            mode: GobusterMode::Dns,
            wordlist: Some("/opt/lists/subdomains.txt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "gobuster dns -d example.com -w /opt/lists/subdomains.txt"
        );
    }

    #[test]
    fn gobuster_dir_requires_a_url() {
        let params = GobusterParams {
            url: "example.com".to_string(),
            ..Default::default()
        };
        assert!(params.command_line().is_err());
    }

    #[test]
    fn dirb_positional_arguments() {
        let params = DirbParams {
            url: "http://example.com/".to_string(),
            wordlist: None,
            additional_args: Some("-N 404".to_string()),
        };
        assert_eq!(
            params.command_line().unwrap(),
            "dirb http://example.com/ /usr/share/wordlists/dirb/common.txt -N 404"
        );
    }

    #[test]
    fn nikto_accepts_host_or_url() {
        let host = NiktoParams {
            target: "10.0.0.8".to_string(),
            ..Default::default()
        };
        assert_eq!(host.command_line().unwrap(), "nikto -h 10.0.0.8");

        let url = NiktoParams {
            target: "https://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(url.command_line().unwrap(), "nikto -h https://example.com");
    }

    #[test]
    fn sqlmap_quotes_url_and_data() {
        let params = SqlmapParams {
            url: "http://example.com/item?id=1".to_string(),
            data: Some("user=admin&pass=' OR 1=1--".to_string()),
            ..Default::default()
        };
        let command = params.command_line().unwrap();
        assert!(command.starts_with("sqlmap -u 'http://example.com/item?id=1' --batch"));
        assert!(command.contains(r"--data='user=admin&pass='\'' OR 1=1--'"));
    }

    #[test]
    fn wpscan_url_flag() {
        let params = WpscanParams {
            url: "https://blog.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "wpscan --url https://blog.example.com"
        );
    }

    #[test]
    fn nuclei_full_invocation() {
        let params = NucleiParams {
            target: "example.com".to_string(),
            templates: Some("/opt/nuclei-templates/cves/".to_string()),
            severity: Some("high,critical".to_string()),
            tags: Some("cve,rce".to_string()),
        };
        assert_eq!(
            params.command_line().unwrap(),
            "nuclei -u example.com -t /opt/nuclei-templates/cves/ -s high,critical -tags cve,rce -silent -no-interactsh"
        );
    }

    #[test]
    fn nuclei_severity_list_is_normalized() {
        let params = NucleiParams {
            target: "example.com".to_string(),
            severity: Some("high, critical".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "nuclei -u example.com -s high,critical -silent -no-interactsh"
        );
    }

    #[test]
    fn nuclei_rejects_unknown_severity() {
        let params = NucleiParams {
            target: "example.com".to_string(),
            severity: Some("urgent".to_string()),
            ..Default::default()
        };
        assert!(params.command_line().is_err());
    }
}
