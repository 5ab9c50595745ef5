use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "aghctl")]
#[command(version)]
#[command(about = "Control AdGuard Home servers from the command line", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server to target, or "all" for every configured server
    #[arg(short, long, global = true, default_value = "all")]
    pub server: String,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show protection status
    Status,

    /// Turn ad blocking on
    Enable,

    /// Turn ad blocking off, optionally for a limited time
    Disable {
        /// How long to keep protection off (e.g. "30s", "10m", "1h30m")
        duration: Option<String>,
    },

    /// Flip protection to the opposite state
    Toggle,

    /// Inspect or change blocked services
    #[command(subcommand)]
    Service(ServiceCommand),

    /// Query the filtering engine
    #[command(subcommand)]
    Filter(FilterCommand),

    /// Manage DNS rewrite rules
    #[command(subcommand)]
    Rewrite(RewriteCommand),

    /// Manage the built-in DHCP server
    #[command(subcommand)]
    Dhcp(DhcpCommand),

    /// Manage configured servers
    #[command(subcommand)]
    Server(ServerCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Service Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// List services
    #[command(subcommand)]
    List(ServiceListCommand),

    /// Block or unblock services
    Update {
        /// Service IDs to block (repeat or comma-separate)
        #[arg(short, long, value_delimiter = ',')]
        block: Vec<String>,

        /// Service IDs to permit again ("all" clears the blocked set)
        #[arg(short, long, value_delimiter = ',')]
        permit: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ServiceListCommand {
    /// Every service the server knows how to block
    All,

    /// Services currently blocked
    Blocked,
}

// ============================================================================
// Filter Commands
// ============================================================================

#[derive(Subcommand)]
pub enum FilterCommand {
    /// Ask how filtering treats a hostname
    Check {
        /// Hostname to check
        host: String,
    },
}

// ============================================================================
// Rewrite Commands
// ============================================================================

#[derive(Subcommand)]
pub enum RewriteCommand {
    /// List DNS rewrite rules
    List,

    /// Add a DNS rewrite rule
    Add {
        /// Domain or wildcard the rule matches
        #[arg(short, long)]
        domain: String,

        /// IP address or hostname to answer with
        #[arg(short, long)]
        answer: String,
    },

    /// Delete a DNS rewrite rule
    Delete {
        /// Domain or wildcard of the rule
        #[arg(short, long)]
        domain: String,

        /// Answer of the rule
        #[arg(short, long)]
        answer: String,
    },
}

// ============================================================================
// DHCP Commands
// ============================================================================

#[derive(Subcommand)]
pub enum DhcpCommand {
    /// Show DHCP server status and configuration
    Status,

    /// List active DHCP leases
    Leases,

    /// Search a network interface for other DHCP servers
    Check {
        /// Interface to search (e.g. "eth0")
        interface: String,
    },

    /// Change DHCP server configuration, keeping unset fields as they are
    Config(DhcpConfigArgs),

    /// Clear the entire DHCP configuration
    Reset,

    /// Manage static leases
    #[command(subcommand)]
    StaticLease(StaticLeaseCommand),
}

#[derive(Args)]
pub struct DhcpConfigArgs {
    /// Turn the DHCP server on or off
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Interface to serve leases on
    #[arg(long)]
    pub interface: Option<String>,

    /// IPv4 gateway address
    #[arg(long)]
    pub gateway: Option<String>,

    /// IPv4 subnet mask
    #[arg(long)]
    pub subnet_mask: Option<String>,

    /// First address of the IPv4 range
    #[arg(long)]
    pub range_start: Option<String>,

    /// Last address of the IPv4 range
    #[arg(long)]
    pub range_end: Option<String>,

    /// IPv4 lease duration in seconds
    #[arg(long)]
    pub lease_duration: Option<u64>,

    /// First address of the IPv6 range
    #[arg(long)]
    pub v6_range_start: Option<String>,

    /// IPv6 lease duration in seconds
    #[arg(long)]
    pub v6_lease_duration: Option<u64>,
}

#[derive(Subcommand)]
pub enum StaticLeaseCommand {
    /// List static leases
    List,

    /// Add a static lease
    Add {
        /// IP address to assign
        #[arg(long)]
        ip: String,

        /// MAC address of the client
        #[arg(long)]
        mac: String,

        /// Hostname to record for the client
        #[arg(long)]
        hostname: String,
    },

    /// Remove a static lease by IP or MAC
    Remove {
        /// IP address of the lease
        #[arg(long)]
        ip: Option<String>,

        /// MAC address of the lease
        #[arg(long)]
        mac: Option<String>,
    },

    /// Update the static lease for an IP
    Update {
        /// IP address of the lease to change
        #[arg(long)]
        ip: String,

        /// New MAC address
        #[arg(long)]
        mac: Option<String>,

        /// New hostname
        #[arg(long)]
        hostname: Option<String>,
    },
}

// ============================================================================
// Server Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ServerCommand {
    /// Interactively add a server to the config
    Add,

    /// List configured servers
    List,

    /// Remove a server from the config
    Remove {
        /// Name of the server to remove
        name: String,
    },
}
