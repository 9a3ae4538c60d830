mod app;
mod config;
mod sierpinski;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use graphview_engine::device::GpuInit;
use graphview_engine::graph::{encode, GraphData, MemoryGraph};
use graphview_engine::logging::{init_logging, LoggingConfig};
use graphview_engine::window::{Runtime, RuntimeConfig};

use crate::app::ViewerApp;
use crate::config::ViewerConfig;

fn main() -> Result<()> {
    let config = ViewerConfig::parse();

    init_logging(LoggingConfig {
        env_filter: config.log.clone(),
        ..LoggingConfig::default()
    });

    let data = load_graph(&config)?;
    let graph = MemoryGraph::from_flat(&encode(&data)).context("encoded graph failed validation")?;

    let runtime = RuntimeConfig {
        title: match &config.input {
            Some(path) => format!("graphview · {}", path.display()),
            None => format!("graphview · sierpinski depth {}", config.depth),
        },
        initial_size: LogicalSize::new(config.width, config.height),
    };
    let gpu = GpuInit {
        prefer_srgb: config.srgb,
        ..GpuInit::default()
    };

    Runtime::run(runtime, gpu, ViewerApp::new(graph, &config))
}

fn load_graph(config: &ViewerConfig) -> Result<GraphData> {
    let Some(path) = &config.input else {
        log::info!("generating sierpinski graph (depth {})", config.depth);
        return Ok(sierpinski::generate(config.depth));
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let data: GraphData = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid graph file", path.display()))?;
    log::info!("loaded {} ({} nodes, {} edges)", path.display(), data.nodes.len(), data.edges.len());
    Ok(data)
}
