use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // DPA_REDIS_URL may carry a password, so it is left out
    const DISPLAY_ENVS: [&str; 11] = [
        "RUST_LOG",
        "DPA_HOST",
        "DPA_PORT",
        "DPA_DATABASE_URL",
        "DPA_COLLISION_TOLERANCE",
        "DPA_MAX_PROBES",
        "DPA_REFRESH_ON_STARTUP",
        "DPA_POOL_REFRESH_INTERVAL",
        "DPA_PLACEHOLDER_LIFETIME",
        "DPA_JANITOR_INTERVAL",
        "DPA_ORDER_STATUS_URL",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
