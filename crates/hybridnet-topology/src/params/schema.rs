//! The fixed set of recognized parameters.

use hybridnet_common::constants::DEFAULT_SHAPE;

/// When a string parameter must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Always required; absent or empty fails the run.
    Required,
    /// Required only when the named bool flag resolves to `true`.
    /// Enforced by the validator, not the resolver.
    RequiredWhen(&'static str),
    /// Optional, with an optional default.
    Optional(Option<&'static str>),
}

/// A string parameter.
#[derive(Debug, Clone, Copy)]
pub struct StringOption {
    /// Parameter name.
    pub name: &'static str,
    /// Requirement and default.
    pub requirement: Requirement,
    /// One-line description.
    pub summary: &'static str,
}

/// A bool parameter.
#[derive(Debug, Clone, Copy)]
pub struct BoolOption {
    /// Parameter name.
    pub name: &'static str,
    /// Value used when absent.
    pub default: bool,
    /// One-line description.
    pub summary: &'static str,
}

/// An integer parameter.
#[derive(Debug, Clone, Copy)]
pub struct IntOption {
    /// Parameter name.
    pub name: &'static str,
    /// Value used when absent or unparsable.
    pub default: i64,
    /// One-line description.
    pub summary: &'static str,
}

/// A `family.size` shape parameter. Falls back to [`DEFAULT_SHAPE`].
#[derive(Debug, Clone, Copy)]
pub struct ShapeOption {
    /// Parameter name.
    pub name: &'static str,
    /// One-line description.
    pub summary: &'static str,
}

/// Any recognized parameter.
#[derive(Debug, Clone, Copy)]
pub enum OptionSpec {
    /// String-valued.
    String(StringOption),
    /// Bool-valued.
    Bool(BoolOption),
    /// Integer-valued.
    Int(IntOption),
    /// Shape descriptor.
    Shape(ShapeOption),
}

impl OptionSpec {
    /// Parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String(o) => o.name,
            Self::Bool(o) => o.name,
            Self::Int(o) => o.name,
            Self::Shape(o) => o.name,
        }
    }

    /// Type name as shown to operators.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Shape(_) => "shape",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::String(o) => o.summary,
            Self::Bool(o) => o.summary,
            Self::Int(o) => o.summary,
            Self::Shape(o) => o.summary,
        }
    }

    /// Human-readable requirement and default, e.g. `optional (default: 1)`.
    #[must_use]
    pub fn requirement_label(&self) -> String {
        match self {
            Self::String(o) => match o.requirement {
                Requirement::Required => "required".to_owned(),
                Requirement::RequiredWhen(flag) => format!("required when {flag}=true"),
                Requirement::Optional(Some(default)) => format!("optional (default: {default})"),
                Requirement::Optional(None) => "optional".to_owned(),
            },
            Self::Bool(o) => format!("optional (default: {})", o.default),
            Self::Int(o) => format!("optional (default: {})", o.default),
            Self::Shape(_) => format!("optional (default: {DEFAULT_SHAPE})"),
        }
    }
}

/// Network CIDR.
pub const VPC_CIDR: StringOption = StringOption {
    name: "vpc_cidr",
    requirement: Requirement::Optional(Some("10.0.0.0/16")),
    summary: "address range of the virtual network",
};
/// Availability-domain count.
pub const AZ_COUNT: IntOption = IntOption {
    name: "az_count",
    default: 1,
    summary: "availability domains to spread subnets across (1 to 6)",
};
/// NAT gateway count.
pub const NAT_COUNT: IntOption = IntOption {
    name: "nat_count",
    default: 1,
    summary: "NAT gateways (floor 1, at most one per availability domain)",
};
/// Compute shape.
pub const INSTANCE_TYPE: ShapeOption = ShapeOption {
    name: "instance_type",
    summary: "compute shape as family.size",
};
/// Machine image.
pub const MACHINE_IMAGE: StringOption = StringOption {
    name: "machine_image",
    requirement: Requirement::Optional(Some("ubuntu-22.04")),
    summary: "machine image booted on the compute node",
};
/// Operator SSH source.
pub const SSH_IP: StringOption = StringOption {
    name: "ssh_ip",
    requirement: Requirement::Required,
    summary: "operator address allowed to reach SSH (CIDR)",
};
/// Key pair.
pub const KEY_PAIR: StringOption = StringOption {
    name: "key_pair",
    requirement: Requirement::Required,
    summary: "key pair installed on the compute node",
};
/// Internal API host.
pub const SAP_API_HOST: StringOption = StringOption {
    name: "sap_api_host",
    requirement: Requirement::Optional(None),
    summary: "internal API host reachable from the compute node",
};
/// Internal API port.
pub const SAP_API_PORT: IntOption = IntOption {
    name: "sap_api_port",
    default: 50000,
    summary: "internal API port",
};
/// Peer gateway address.
pub const PEER_IP: StringOption = StringOption {
    name: "peer_ip",
    requirement: Requirement::Required,
    summary: "public address of the remote tunnel endpoint",
};
/// Peer routing number.
pub const PEER_ASN: IntOption = IntOption {
    name: "peer_asn",
    default: 65000,
    summary: "routing number of the remote tunnel endpoint",
};
/// Tunnel secret.
pub const PSK: StringOption = StringOption {
    name: "psk",
    requirement: Requirement::Required,
    summary: "pre-shared key for both tunnel channels",
};
/// Remote prefix.
pub const REMOTE_CIDR: StringOption = StringOption {
    name: "remote_cidr",
    requirement: Requirement::Required,
    summary: "remote network prefix routed through the tunnel",
};
/// Storage toggle.
pub const ENABLE_STORAGE: BoolOption = BoolOption {
    name: "enable_storage",
    default: true,
    summary: "create the managed database",
};
/// Database name.
pub const DB_NAME: StringOption = StringOption {
    name: "db_name",
    requirement: Requirement::Optional(Some("appdb")),
    summary: "name of the initial database",
};
/// Database admin identity.
pub const DB_ADMIN: StringOption = StringOption {
    name: "db_admin",
    requirement: Requirement::Optional(Some("dbadmin")),
    summary: "database administrator user name",
};
/// Storage retention.
pub const RETAIN_STORAGE: BoolOption = BoolOption {
    name: "retain_storage",
    default: false,
    summary: "keep the database and its backups on teardown",
};
/// Naming toggle.
pub const ENABLE_NAMING: BoolOption = BoolOption {
    name: "enable_naming",
    default: false,
    summary: "create DNS address records",
};
/// Root domain.
pub const DOMAIN: StringOption = StringOption {
    name: "domain",
    requirement: Requirement::RequiredWhen(ENABLE_NAMING.name),
    summary: "root domain whose zone receives the records",
};
/// Apex record toggle.
pub const CREATE_APEX_RECORD: BoolOption = BoolOption {
    name: "create_apex_record",
    default: true,
    summary: "create the apex address record",
};
/// `www` record toggle.
pub const CREATE_WWW_RECORD: BoolOption = BoolOption {
    name: "create_www_record",
    default: true,
    summary: "create the www address record",
};
/// Project label.
pub const PROJECT: StringOption = StringOption {
    name: "project",
    requirement: Requirement::Optional(Some("hybrid-network")),
    summary: "project label and resource name prefix",
};
/// Environment label.
pub const ENVIRONMENT: StringOption = StringOption {
    name: "environment",
    requirement: Requirement::Optional(Some("dev")),
    summary: "environment label",
};

/// Every recognized parameter, in documentation order.
pub static SCHEMA: [OptionSpec; 23] = [
    OptionSpec::String(PROJECT),
    OptionSpec::String(ENVIRONMENT),
    OptionSpec::String(VPC_CIDR),
    OptionSpec::Int(AZ_COUNT),
    OptionSpec::Int(NAT_COUNT),
    OptionSpec::Shape(INSTANCE_TYPE),
    OptionSpec::String(MACHINE_IMAGE),
    OptionSpec::String(SSH_IP),
    OptionSpec::String(KEY_PAIR),
    OptionSpec::String(SAP_API_HOST),
    OptionSpec::Int(SAP_API_PORT),
    OptionSpec::String(PEER_IP),
    OptionSpec::Int(PEER_ASN),
    OptionSpec::String(PSK),
    OptionSpec::String(REMOTE_CIDR),
    OptionSpec::Bool(ENABLE_STORAGE),
    OptionSpec::String(DB_NAME),
    OptionSpec::String(DB_ADMIN),
    OptionSpec::Bool(RETAIN_STORAGE),
    OptionSpec::Bool(ENABLE_NAMING),
    OptionSpec::String(DOMAIN),
    OptionSpec::Bool(CREATE_APEX_RECORD),
    OptionSpec::Bool(CREATE_WWW_RECORD),
];

/// Looks up a recognized parameter by name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static OptionSpec> {
    SCHEMA.iter().find(|spec| spec.name() == name)
}
