//! System-wide constants and fixed topology values.

/// Application name used in labels and CLI output.
pub const APP_NAME: &str = "hybridnet";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "hnet";

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "HNET_LOG";

/// Prefix for parameters read from the process environment.
pub const PARAM_ENV_PREFIX: &str = "HNET_";

/// SHA-256 digest length in hex characters.
pub const SHA256_HEX_LENGTH: usize = 64;

/// Source/destination meaning "anywhere".
pub const ANY_IPV4: &str = "0.0.0.0/0";

/// Lower-cased tokens that resolve a boolean parameter to `true`.
pub const TRUTHY_TOKENS: [&str; 4] = ["true", "1", "yes", "on"];

/// Separator between family and size in a shape descriptor.
pub const SHAPE_DELIMITER: char = '.';

/// Shape used when the descriptor cannot be understood.
pub const DEFAULT_SHAPE: &str = "t3.micro";

/// Database listener port opened to the compute firewall.
pub const DATABASE_PORT: u16 = 5432;

/// Backup window applied when storage is retained on teardown.
pub const RETAINED_BACKUP_DAYS: u32 = 7;

/// Value bound to the database secret output when no secret is reported.
pub const SECRET_SENTINEL: &str = "N/A";

/// Time-to-live of every address record, in seconds.
pub const DNS_RECORD_TTL: u32 = 300;

/// Subdomain of the secondary address record.
pub const WWW_SUBDOMAIN: &str = "www";

/// Number of channels composing one site-to-site tunnel.
pub const TUNNEL_CHANNELS: u8 = 2;

/// Upper bound for the availability-domain and NAT gateway counts.
pub const MAX_AVAILABILITY_DOMAINS: u32 = 6;
