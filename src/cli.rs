//! Command-line interface definitions using clap

use clap::Parser;

/// Shortcoder - JSON:API shortcode service
#[derive(Parser, Debug)]
#[command(name = "shortcoder")]
#[command(version)]
#[command(about = "Serve the shortcode API over HTTP", long_about = None)]
pub struct Cli {
    /// Path of the TOML configuration file
    #[arg(long, short = 'c', default_value = "config.toml")]
    pub config: String,

    /// Override `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Override `server.port`
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Write a sample configuration file and exit
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "config.example.toml"
    )]
    pub generate_config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["shortcoder"]).unwrap();
        assert_eq!(cli.config, "config.toml");
        assert!(cli.host.is_none());
        assert!(cli.generate_config.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli =
            Cli::try_parse_from(["shortcoder", "-c", "prod.toml", "--host", "0.0.0.0", "-p", "9000"])
                .unwrap();
        assert_eq!(cli.config, "prod.toml");
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(9000));
    }

    #[test]
    fn test_generate_config_default_path() {
        let cli = Cli::try_parse_from(["shortcoder", "--generate-config"]).unwrap();
        assert_eq!(cli.generate_config.as_deref(), Some("config.example.toml"));
    }
}
