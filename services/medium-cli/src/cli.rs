//! Command-line parsing
//!
//! `medium [--config <path>] [authorize | whoami | refresh <refresh-token>]`
//! with `authorize` as the default command.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the browser authorization flow, then list publications
    Authorize,
    /// Show the user behind the configured access token
    Whoami,
    /// Trade a refresh token for a new access token
    Refresh { refresh_token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config_path: Option<String>,
    pub command: Command,
}

pub const USAGE: &str = "usage: medium [--config <path>] [authorize | whoami | refresh <refresh-token>]";

/// Parse arguments, excluding the program name.
pub fn parse(args: &[String]) -> Result<Args, String> {
    let mut config_path = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                config_path = Some(path.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            _ => positional.push(arg.as_str()),
        }
    }

    let command = match positional.as_slice() {
        [] | ["authorize"] => Command::Authorize,
        ["whoami"] => Command::Whoami,
        ["refresh", token] => Command::Refresh {
            refresh_token: token.to_string(),
        },
        ["refresh"] => return Err("refresh requires a refresh token".into()),
        other => return Err(format!("unexpected arguments: {}", other.join(" "))),
    };

    Ok(Args {
        config_path,
        command,
    })
}
