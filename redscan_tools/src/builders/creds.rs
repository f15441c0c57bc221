//! Credential attack tools: hydra, john.

use super::ToolCommand;
use crate::error::{Result, ToolError};
use crate::sanitize::{
    escape_shell_arg, validate_extra_args, validate_file_path, validate_identifier,
    validate_target,
};
use schemars::JsonSchema;
use serde::Deserialize;

const DEFAULT_JOHN_WORDLIST: &str = "/usr/share/wordlists/rockyou.txt";

/// Parameters for an online password attack with hydra.
///
/// Exactly one of `username`/`username_file` and one of
/// `password`/`password_file` must be supplied.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct HydraParams {
    /// Hostname or IP address of the service under attack.
    pub target: String,
    /// Protocol/service module, e.g. "ssh", "ftp", "http-post-form".
    pub service: String,
    /// Single username to try.
    pub username: Option<String>,
    /// Path to a file of usernames, one per line.
    pub username_file: Option<String>,
    /// Single password to try.
    pub password: Option<String>,
    /// Path to a file of passwords, one per line.
    pub password_file: Option<String>,
    /// Extra hydra flags appended verbatim.
    pub additional_args: Option<String>,
}

impl ToolCommand for HydraParams {
    fn command_line(&self) -> Result<String> {
        validate_target("target", &self.target)?;
        if self.service.trim().is_empty() {
            return Err(ToolError::MissingParameter("service"));
        }
        validate_identifier("service", &self.service)?;

        let user_part = match (self.username.as_deref(), self.username_file.as_deref()) {
            (Some(user), None) => {
                validate_identifier("username", user)?;
                format!("-l {}", user.trim())
            }
            (None, Some(file)) => {
                validate_file_path("username_file", file)?;
                format!("-L {}", file.trim())
            }
            (Some(_), Some(_)) => {
                return Err(ToolError::invalid(
                    "username",
                    "supply either username or username_file, not both",
                ));
            }
            (None, None) => return Err(ToolError::MissingParameter("username")),
        };

        let pass_part = match (self.password.as_deref(), self.password_file.as_deref()) {
            (Some(pass), None) => format!("-p {}", escape_shell_arg(pass)),
            (None, Some(file)) => {
                validate_file_path("password_file", file)?;
                format!("-P {}", file.trim())
            }
            (Some(_), Some(_)) => {
                return Err(ToolError::invalid(
                    "password",
                    "supply either password or password_file, not both",
                ));
            }
            (None, None) => return Err(ToolError::MissingParameter("password")),
        };

        let extra = self.additional_args.as_deref().unwrap_or("");
        validate_extra_args("additional_args", extra)?;

        // -t 4 keeps parallelism polite; several services lock accounts or
        // drop connections above that.
        let mut command = format!("hydra -t 4 {user_part} {pass_part}");
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        command.push(' ');
        command.push_str(self.target.trim());
        command.push(' ');
        command.push_str(self.service.trim());
        Ok(command)
    }
}

/// Parameters for offline hash cracking with john.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct JohnParams {
    /// Path to the file of hashes to crack.
    pub hash_file: String,
    /// Wordlist path. Defaults to rockyou.
    pub wordlist: Option<String>,
    /// Hash format name, e.g. "md5crypt" or "sha512crypt". Auto-detected
    /// when unset.
    pub hash_format: Option<String>,
    /// Extra john flags appended verbatim.
    pub additional_args: Option<String>,
}

impl ToolCommand for JohnParams {
    fn command_line(&self) -> Result<String> {
        validate_file_path("hash_file", &self.hash_file)?;
        let wordlist = self.wordlist.as_deref().unwrap_or(DEFAULT_JOHN_WORDLIST);
        validate_file_path("wordlist", wordlist)?;
        let extra = self.additional_args.as_deref().unwrap_or("");
        validate_extra_args("additional_args", extra)?;

        let mut command = String::from("john");
        if let Some(format) = self.hash_format.as_deref() {
            validate_identifier("hash_format", format)?;
            command.push_str(&format!(" --format={}", format.trim()));
        }
        command.push_str(&format!(" --wordlist={wordlist}"));
        if !extra.is_empty() {
            command.push(' ');
            command.push_str(extra);
        }
        command.push(' ');
        command.push_str(self.hash_file.trim());
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydra_single_credentials() {
        let params = HydraParams {
            target: "10.0.0.9".to_string(),
            service: "ssh".to_string(),
            username: Some("root".to_string()),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "hydra -t 4 -l root -p 'hunter2' 10.0.0.9 ssh"
        );
    }

    #[test]
    fn hydra_credential_files() {
        let params = HydraParams {
            target: "ftp.example.com".to_string(),
            service: "ftp".to_string(),
            username_file: Some("/opt/lists/users.txt".to_string()),
            password_file: Some("/opt/lists/passwords.txt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "hydra -t 4 -L /opt/lists/users.txt -P /opt/lists/passwords.txt ftp.example.com ftp"
        );
    }

    #[test]
    fn hydra_requires_some_credential_source() {
        let params = HydraParams {
            target: "10.0.0.9".to_string(),
            service: "ssh".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            params.command_line().unwrap_err(),
            ToolError::MissingParameter("username")
        ));
    }

    #[test]
    fn hydra_rejects_ambiguous_username_sources() {
        let params = HydraParams {
            target: "10.0.0.9".to_string(),
            service: "ssh".to_string(),
            username: Some("root".to_string()),
            username_file: Some("/opt/users.txt".to_string()),
            password: Some("x".to_string()),
            ..Default::default()
        };
        assert!(params.command_line().is_err());
    }

    #[test]
    fn hydra_escapes_password_payloads() {
        let params = HydraParams {
            target: "10.0.0.9".to_string(),
            service: "ssh".to_string(),
            username: Some("root".to_string()),
            password: Some("p'; id".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            r"hydra -t 4 -l root -p 'p'\''; id' 10.0.0.9 ssh"
        );
    }

    #[test]
    fn john_defaults_to_rockyou() {
        let params = JohnParams {
            hash_file: "/tmp/hashes.txt".to_string(),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "john --wordlist=/usr/share/wordlists/rockyou.txt /tmp/hashes.txt"
        );
    }

    #[test]
    fn john_with_format() {
        let params = JohnParams {
            hash_file: "/tmp/shadow".to_string(),
            hash_format: Some("sha512crypt".to_string()),
            wordlist: Some("/opt/lists/top1000.txt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.command_line().unwrap(),
            "john --format=sha512crypt --wordlist=/opt/lists/top1000.txt /tmp/shadow"
        );
    }
}
