//! Parameter gathering shared by `plan` and `outputs`.
//!
//! Sources are applied in order: params file, `HNET_*` environment
//! variables, then `--param` flags. A later source overwrites an earlier one.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use hybridnet_common::config::AssemblerConfig;
use hybridnet_common::constants::{LOG_ENV, PARAM_ENV_PREFIX};
use hybridnet_topology::params::ParameterSet;
use hybridnet_topology::pipeline::{Assembler, Assembly};
use hybridnet_topology::zone::{StaticZones, ZoneId};

use crate::output::Format;

/// Flags shared by every command that runs an assembly.
#[derive(Args, Debug)]
pub struct AssemblyArgs {
    /// Env-style file of `KEY=VALUE` lines, dotenv syntax.
    #[arg(long, value_name = "FILE")]
    pub params_file: Option<PathBuf>,

    /// Sets one parameter. May be repeated.
    #[arg(short, long, value_name = "KEY=VALUE")]
    pub param: Vec<String>,

    /// Reject malformed optional values instead of falling back to defaults.
    #[arg(long)]
    pub strict: bool,

    /// Hosted zone ID for the configured `domain`.
    #[arg(long, value_name = "ID")]
    pub zone_id: Option<String>,

    /// Output format.
    #[arg(short = 'F', long, value_enum, default_value_t = Format::Yaml)]
    pub format: Format,
}

impl AssemblyArgs {
    /// Gathers parameters from every source and runs the assembly.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the assembly fails.
    pub fn assemble(&self) -> anyhow::Result<Assembly> {
        let params = self.gather(std::env::vars())?;
        tracing::info!(count = params.len(), "gathered parameters");

        let config = if self.strict {
            AssemblerConfig::strict()
        } else {
            AssemblerConfig::default()
        };
        let assembler = Assembler::new(config, self.zones(&params));
        Ok(assembler.assemble(&params)?)
    }

    fn gather(
        &self,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> anyhow::Result<ParameterSet> {
        let mut params = ParameterSet::new();
        if let Some(path) = &self.params_file {
            for (key, value) in read_params_file(path)? {
                params.insert(key, value);
            }
        }
        for (key, value) in from_env(env) {
            params.insert(key, value);
        }
        for assignment in &self.param {
            let (key, value) = parse_assignment(assignment)
                .with_context(|| format!("invalid --param `{assignment}`"))?;
            params.insert(key, value);
        }
        Ok(params)
    }

    fn zones(&self, params: &ParameterSet) -> StaticZones {
        match (params.get("domain"), &self.zone_id) {
            (Some(domain), Some(id)) => StaticZones::new().with_zone(domain, ZoneId::new(id)),
            _ => StaticZones::new(),
        }
    }
}

/// Splits `KEY=VALUE` at the first `=`. The name is trimmed, the value is
/// taken verbatim and may be empty or contain `=`.
fn parse_assignment(s: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = s.split_once('=').context("expected KEY=VALUE")?;
    let key = key.trim();
    anyhow::ensure!(!key.is_empty(), "empty parameter name");
    Ok((key.to_owned(), value.to_owned()))
}

/// Reads an env-style file without touching the process environment.
fn read_params_file(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let entries = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    collect_entries(entries).with_context(|| format!("in {}", path.display()))
}

/// Parses env-style content: quoting, `export` prefixes and `#` comments.
fn parse_params(content: &str) -> anyhow::Result<Vec<(String, String)>> {
    collect_entries(dotenvy::from_read_iter(content.as_bytes()))
}

fn collect_entries(
    entries: impl IntoIterator<Item = dotenvy::Result<(String, String)>>,
) -> anyhow::Result<Vec<(String, String)>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(n, entry)| entry.with_context(|| format!("entry {}", n + 1)))
        .collect()
}

/// `HNET_SSH_IP=…` becomes `ssh_ip`. The log filter variable is skipped.
fn from_env(vars: impl IntoIterator<Item = (String, String)>) -> Vec<(String, String)> {
    let mut found: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(key, _)| key != LOG_ENV)
        .filter_map(|(key, value)| {
            key.strip_prefix(PARAM_ENV_PREFIX)
                .filter(|name| !name.is_empty())
                .map(|name| (name.to_ascii_lowercase(), value))
        })
        .collect();
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(param: &[&str]) -> AssemblyArgs {
        AssemblyArgs {
            params_file: None,
            param: param.iter().map(|s| (*s).to_owned()).collect(),
            strict: false,
            zone_id: None,
            format: Format::Yaml,
        }
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn assignment_keeps_equals_in_value() {
        let (k, v) = parse_assignment("psk=a=b").expect("parses");
        assert_eq!(k, "psk");
        assert_eq!(v, "a=b");
    }

    #[test]
    fn assignment_allows_empty_value() {
        let (_, v) = parse_assignment("sap_api_host=").expect("parses");
        assert!(v.is_empty());
    }

    #[test]
    fn assignment_keeps_value_whitespace() {
        let (k, v) = parse_assignment(" psk = padded secret ").expect("parses");
        assert_eq!(k, "psk");
        assert_eq!(v, " padded secret ");
    }

    #[test]
    fn assignment_rejects_missing_equals() {
        assert!(parse_assignment("ssh_ip").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn params_file_skips_comments_and_blanks() {
        let parsed = parse_params("# site\n\nkey_pair=k1\n  # indented\npeer_ip=198.51.100.20\n")
            .expect("parses");
        assert_eq!(
            parsed,
            vec![
                ("key_pair".to_owned(), "k1".to_owned()),
                ("peer_ip".to_owned(), "198.51.100.20".to_owned()),
            ]
        );
    }

    #[test]
    fn params_file_unquotes_values_and_accepts_export() {
        let parsed = parse_params("psk=\"a b # c\"\nexport key_pair=k1\nremote_cidr='10.1.0.0/16'\n")
            .expect("parses");
        assert_eq!(
            parsed,
            vec![
                ("psk".to_owned(), "a b # c".to_owned()),
                ("key_pair".to_owned(), "k1".to_owned()),
                ("remote_cidr".to_owned(), "10.1.0.0/16".to_owned()),
            ]
        );
    }

    #[test]
    fn params_file_reports_bad_line() {
        let err = parse_params("ok=1\nbroken\n").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("entry 2"), "{message}");
        assert!(message.contains("broken"), "{message}");
    }

    #[test]
    fn env_vars_are_lowercased_and_filtered() {
        let found = from_env(env(&[
            ("HNET_SSH_IP", "203.0.113.10/32"),
            ("HNET_LOG", "debug"),
            ("HNET_", "x"),
            ("PATH", "/usr/bin"),
        ]));
        assert_eq!(found, vec![("ssh_ip".to_owned(), "203.0.113.10/32".to_owned())]);
    }

    #[test]
    fn later_sources_win() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "key_pair=from-file\npsk=from-file").expect("write");

        let mut a = args(&["psk=from-flag"]);
        a.params_file = Some(file.path().to_path_buf());
        let params = a
            .gather(env(&[("HNET_KEY_PAIR", "from-env")]))
            .expect("gathers");

        assert_eq!(params.get("key_pair"), Some("from-env"));
        assert_eq!(params.get("psk"), Some("from-flag"));
    }

    #[test]
    fn missing_params_file_is_an_error() {
        let mut a = args(&[]);
        a.params_file = Some(PathBuf::from("/nonexistent/hnet.env"));
        assert!(a.gather(Vec::new()).is_err());
    }

    #[test]
    fn zone_id_binds_to_configured_domain() {
        let mut a = args(&[]);
        a.zone_id = Some("Z123".into());
        let params = ParameterSet::new().with("domain", "example.com");
        let zones = a.zones(&params);
        let result = Assembler::new(AssemblerConfig::default(), zones)
            .assemble(
                &params
                    .clone()
                    .with("enable_naming", "true")
                    .with("ssh_ip", "203.0.113.10/32")
                    .with("key_pair", "k1")
                    .with("peer_ip", "198.51.100.20")
                    .with("psk", "s")
                    .with("remote_cidr", "10.1.0.0/16"),
            );
        assert!(result.is_ok());
    }

    #[test]
    fn without_zone_id_naming_fails_lookup() {
        let a = args(&[
            "enable_naming=true",
            "domain=example.com",
            "ssh_ip=203.0.113.10/32",
            "key_pair=k1",
            "peer_ip=198.51.100.20",
            "psk=s",
            "remote_cidr=10.1.0.0/16",
        ]);
        let params = a.gather(Vec::new()).expect("gathers");
        let result = Assembler::new(AssemblerConfig::default(), a.zones(&params)).assemble(&params);
        assert!(result.is_err());
    }
}
