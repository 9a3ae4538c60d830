use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Interactive GPU graph viewer.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ViewerConfig {
    /// JSON graph file (`{ nodes, edges }`). A Sierpinski graph is generated when omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Subdivision depth of the generated Sierpinski graph
    #[arg(long, default_value_t = 4)]
    pub depth: u32,

    /// Initial camera zoom, in device pixels per world unit
    #[arg(long, default_value_t = 2.5)]
    pub zoom: f64,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,

    /// Seconds an idle pooled GPU buffer may live before it is destroyed
    #[arg(long, default_value_t = 10)]
    pub pool_max_age: u64,

    /// Use an sRGB surface format when available
    #[arg(long)]
    pub srgb: bool,

    /// Log filter in `env_logger` syntax (overrides RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,
}

impl ViewerConfig {
    pub fn pool_max_age(&self) -> Duration {
        Duration::from_secs(self.pool_max_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_generate_a_graph() {
        let cfg = ViewerConfig::try_parse_from(["graphview"]).unwrap();
        assert!(cfg.input.is_none());
        assert_eq!(cfg.depth, 4);
        assert_eq!(cfg.zoom, 2.5);
        assert_eq!(cfg.pool_max_age(), Duration::from_secs(10));
    }

    #[test]
    fn flags_are_parsed() {
        let cfg = ViewerConfig::try_parse_from([
            "graphview",
            "--input",
            "graph.json",
            "--zoom",
            "1.5",
            "--srgb",
            "--log",
            "debug",
        ])
        .unwrap();
        assert_eq!(cfg.input.as_deref(), Some(std::path::Path::new("graph.json")));
        assert_eq!(cfg.zoom, 1.5);
        assert!(cfg.srgb);
        assert_eq!(cfg.log.as_deref(), Some("debug"));
    }
}
