// File: crates/demo/src/main.rs
// Summary: Demo CLI; renders the Pokemon or student dashboards (or any JSON dashboard config)
// to a directory of SVG charts plus an index page.

mod presets;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tabula_core::config::RenderedChart;
use tabula_core::DashboardConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::presets::StudentEvents;

#[derive(Parser, Debug)]
#[command(name = "tabula-demo", about = "Render linked chart dashboards from CSV data", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Type heatmap, weight/total scatter and stat radar over a Pokemon CSV.
    Pokemon {
        #[arg(long, default_value = "crates/demo/data/pokemon.csv")]
        data: PathBuf,
        #[arg(long, default_value = "out/pokemon")]
        out: PathBuf,
    },
    /// Alcohol vs. grades scatter, study-time bars and parallel coordinates over a student CSV.
    Students {
        #[arg(long, default_value = "crates/demo/data/student-mat.csv")]
        data: PathBuf,
        #[arg(long, default_value = "out/students")]
        out: PathBuf,
        /// Scatter x variable (Walc or Dalc).
        #[arg(long)]
        x_variable: Option<String>,
        /// Record id of the scatter point to select.
        #[arg(long)]
        select: Option<String>,
        /// Minimum final grade shown in the parallel coordinates.
        #[arg(long)]
        min_grade: Option<f64>,
        /// Restrict the bar chart to one gender (F or M).
        #[arg(long)]
        gender: Option<String>,
        /// Swap a parallel-coordinates axis, as INDEX=FIELD. Repeatable.
        #[arg(long = "dimension", value_parser = parse_dimension)]
        dimensions: Vec<(usize, String)>,
    },
    /// Render a dashboard described by a JSON config file.
    Render {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value = "out/dashboard")]
        out: PathBuf,
    },
}

fn parse_dimension(raw: &str) -> Result<(usize, String), String> {
    let (index, field) = raw.split_once('=').ok_or_else(|| format!("expected INDEX=FIELD, got '{raw}'"))?;
    let index = index.trim().parse::<usize>().map_err(|e| format!("bad index '{index}': {e}"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field in '{raw}'"));
    }
    Ok((index, field.to_string()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let (config, out) = match cli.command {
        Command::Pokemon { data, out } => (presets::pokemon(data), out),
        Command::Students { data, out, x_variable, select, min_grade, gender, dimensions } => {
            let events = StudentEvents { x_variable, select, gender, min_grade, dimensions };
            (presets::students(data, &events), out)
        }
        Command::Render { config, out } => {
            let loaded = DashboardConfig::from_path(&config)
                .with_context(|| format!("failed to read dashboard config '{}'", config.display()))?;
            (loaded, out)
        }
    };

    let charts = config.render();
    for chart in &charts {
        match &chart.error {
            Some(message) => warn!(chart = %chart.name, %message, "chart rendered as an error"),
            None => info!(chart = %chart.name, marks = chart.canvas.mark_count(), "chart rendered"),
        }
    }

    let index = config
        .page(&charts)
        .write(&out)
        .with_context(|| format!("failed to write page to '{}'", out.display()))?;
    write_rasters(&charts, &out)?;
    println!("Wrote {}", index.display());
    Ok(())
}

#[cfg(feature = "png")]
fn write_rasters(charts: &[RenderedChart], out: &Path) -> Result<()> {
    for chart in charts {
        let path = out.join(format!("{}.png", chart.name));
        tabula_render_skia::write_png(&chart.canvas, &path)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!(path = %path.display(), "png written");
    }
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_rasters(_charts: &[RenderedChart], _out: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_flag_parses_index_and_field() {
        assert_eq!(parse_dimension("2=absences"), Ok((2, "absences".to_string())));
        assert!(parse_dimension("absences").is_err());
        assert!(parse_dimension("x=G1").is_err());
        assert!(parse_dimension("1=").is_err());
    }

    #[test]
    fn cli_accepts_repeated_dimensions() {
        let cli = Cli::try_parse_from([
            "tabula-demo", "students", "--dimension", "0=G1", "--dimension", "5=absences", "--gender", "F",
        ])
        .unwrap();
        match cli.command {
            Command::Students { dimensions, gender, .. } => {
                assert_eq!(dimensions, vec![(0, "G1".to_string()), (5, "absences".to_string())]);
                assert_eq!(gender.as_deref(), Some("F"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
