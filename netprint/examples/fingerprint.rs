//! Device Fingerprinting Example
//!
//! Logs into one or more devices over SSH, identifies each one against a
//! directory of TextFSM templates, and prints the results as JSON.
//!
//! # Prerequisites
//!
//! - A directory of `*.textfsm` templates named by command, such as the
//!   `templates/` directory of ntc-templates
//! - Network devices reachable via SSH, with valid credentials
//!
//! # Usage
//!
//! ```bash
//! cargo run --example fingerprint -- --templates ./ntc-templates/templates \
//!     --user admin --password secret 10.0.0.1 10.0.0.2
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use netprint::transport::{HostKeyVerification, SshConnector};
use netprint::{FingerprinterBuilder, Target, TemplateRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.hosts.is_empty() {
        eprintln!("Error: at least one host is required");
        Args::print_help();
        std::process::exit(1);
    }

    println!("=== netprint Device Fingerprinting ===\n");

    let repository = TemplateRepository::from_dir(&args.templates)?;
    println!(
        "Loaded {} templates from {}",
        repository.len(),
        args.templates.display()
    );

    let fingerprinter = FingerprinterBuilder::new()
        .repository(repository)
        .connect_timeout(Duration::from_secs(args.timeout))
        .neighbor_discovery(!args.no_neighbors)
        .build()?;

    let mut connector = SshConnector::new().host_key_verification(if args.strict {
        HostKeyVerification::AcceptNew
    } else {
        HostKeyVerification::Disabled
    });
    if let Some(key) = &args.key {
        connector = connector.private_key(key);
    }

    let secret = args.password.clone().unwrap_or_default();
    let targets: Vec<Target> = args
        .hosts
        .iter()
        .map(|host| Target::new(host, &args.user, secret.as_str()).with_port(args.port))
        .collect();

    println!("Fingerprinting {} device(s)...\n", targets.len());
    let results = fingerprinter
        .fingerprint_all(Arc::new(connector), targets)
        .await;

    let mut failures = 0;
    for (host, result) in results {
        println!("{}", "=".repeat(60));
        println!("Host: {}", host);
        println!("{}", "=".repeat(60));

        match result {
            Ok(result) => {
                println!("Vendor:      {}", result.vendor.map(|v| v.name()).unwrap_or("unknown"));
                println!("Device type: {}", result.device_type);
                println!("Template:    {}", result.template_id);
                println!("Confidence:  {:.1}", result.confidence);
                println!("Prompt:      {}", result.detected_prompt);
                println!("Elapsed:     {:?}", result.processing_time);
                if !result.neighbors.is_empty() {
                    println!("Neighbors:   {}", result.neighbors.len());
                }
                println!("\n{}\n", serde_json::to_string_pretty(&result)?);
            }
            Err(e) => {
                failures += 1;
                eprintln!("Failed: {}\n", e);
            }
        }
    }

    if failures > 0 {
        std::process::exit(2);
    }
    Ok(())
}

/// Simple argument parser
struct Args {
    hosts: Vec<String>,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    templates: PathBuf,
    timeout: u64,
    no_neighbors: bool,
    strict: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut hosts = Vec::new();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut templates = PathBuf::from("templates");
        let mut timeout = 30u64;
        let mut no_neighbors = false;
        let mut strict = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--templates" | "-T" => {
                    i += 1;
                    if i < args.len() {
                        templates = PathBuf::from(&args[i]);
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--no-neighbors" => no_neighbors = true,
                "--strict-host-keys" => strict = true,
                "--help" | "-h" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other if !other.starts_with('-') => hosts.push(other.to_string()),
                _ => {}
            }
            i += 1;
        }

        Self {
            hosts,
            port,
            user,
            password,
            key,
            templates,
            timeout,
            no_neighbors,
            strict,
        }
    }

    fn print_help() {
        println!(
            r#"netprint device fingerprinting example

Identifies network devices by probing their CLI over SSH and matching the
output against a directory of TextFSM templates.

USAGE:
    cargo run --example fingerprint -- [OPTIONS] <HOST>...

OPTIONS:
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password (or key passphrase with --key)
    -k, --key <PATH>         Path to SSH private key
    -T, --templates <DIR>    Template directory [default: templates]
    -t, --timeout <SECS>     Connection timeout [default: 30]
    --no-neighbors           Skip CDP/LLDP neighbor discovery
    --strict-host-keys       Check and record host keys in known_hosts
    -h, --help               Print this help message

EXAMPLES:
    # Fingerprint two switches
    cargo run --example fingerprint -- \
        -T ./ntc-templates/templates -u admin -P secret 10.0.0.1 10.0.0.2

    # With debug logging
    RUST_LOG=netprint=debug cargo run --example fingerprint -- \
        -T ./templates -u admin -P secret core-sw1
"#
        );
    }
}
