//! Startup banner and URL display

use super::config::{AppConfig, is_all_interfaces};
use super::constants::APP_NAME;
use crate::utils::terminal::{dim, terminal_link};

/// Print the startup banner with URLs
pub fn print_banner(config: &AppConfig) {
    let host = config.server.host.as_str();
    let port = config.server.port;

    // Use localhost for display when binding to all interfaces
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m {}",
        APP_NAME,
        dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    println!();

    // Label width: "Dashboard data:" is 15 chars, pad to 17 for alignment
    const W: usize = 17;

    let base_url = format!("http://{}:{}", display_host, port);
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "Dashboard data:",
        terminal_link(&format!("{}/api/dashboard-data", base_url))
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "Flow:",
        terminal_link(&format!("{}/api/flow", base_url))
    );
    println!(
        "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "OpenAPI:",
        terminal_link(&format!("{}/api/openapi.json", base_url))
    );

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  {}",
            dim(&format!("➜  {:<W$} use --host 0.0.0.0 to expose", "Network:"))
        );
    } else if is_all_interfaces(host) {
        if let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                let network_url = format!("http://{}:{}", ip, port);
                println!(
                    "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
                    "Network:",
                    terminal_link(&network_url)
                );
            }
        }
    } else {
        let network_url = format!("http://{}:{}", host, port);
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
            "Network:",
            terminal_link(&network_url)
        );
    }

    println!(
        "  {}",
        dim(&format!("➜  {:<W$} {}", "Upstream:", config.upstream.url))
    );
    println!(
        "  {}",
        dim(&format!(
            "➜  {:<W$} {}",
            "Fallback:",
            config.fallback.path.display()
        ))
    );

    println!();
}
