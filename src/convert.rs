use std::path::PathBuf;
use std::time::Instant;

use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

use crate::algorithms::GraphalyticsAlgorithms;
use crate::config::ConvertConfig;
use crate::emit::{self, Encoding, GraphDescription, Outputs};
use crate::error::{ConvertError, Result};
use crate::properties;
use crate::reader::GraphalyticsReader;
use crate::remap;
use crate::sorting;

/// What a successful conversion produced.
#[derive(Clone, Debug)]
pub struct ConvertSummary {
    pub num_vertices: u64,
    pub num_edges: u64,
    pub properties_path: PathBuf,
    pub vertex_path: PathBuf,
    pub edge_path: PathBuf,
    pub algorithms: GraphalyticsAlgorithms,
}

/// Convert the graph `config.input` into the dense graph at `config.output`.
pub fn run(config: &ConvertConfig) -> Result<ConvertSummary> {
    let mut reader = GraphalyticsReader::open(&config.input, config.seed)?;
    reader.set_max_weight(config.max_weight)?;
    let mut algorithms = GraphalyticsAlgorithms::from_properties(reader.properties())?;
    info!(%algorithms, "algorithm parameters");

    let mut graph = remap::ingest(&mut reader, &mut algorithms, config.vertex_order())?;

    info!("sorting the list of edges ...");
    let start = Instant::now();
    sorting::sort_edges(&mut graph.segments);
    info!(elapsed = ?start.elapsed(), "edges sorted");

    let prefix = config.output_prefix();
    let description = GraphDescription {
        name: emit::file_name(&prefix),
        vertex_file: format!("{}{}", emit::file_name(&prefix), config.vertex_suffix()),
        edge_file: format!("{}{}", emit::file_name(&prefix), config.edge_suffix()),
        num_vertices: graph.num_vertices,
        num_edges: graph.num_edges,
        hostname: current_hostname()?,
        stable_map: config.sorted_order,
        input_graph: emit::file_name(&config.input),
        compressed: config.compress,
        directed: reader.is_directed(),
        weighted: reader.is_weighted(),
        algorithm_list: reader.property(properties::ALGORITHMS).to_string(),
        algorithms: algorithms.clone(),
        created: current_datetime()?,
    };

    let summary = ConvertSummary {
        num_vertices: graph.num_vertices,
        num_edges: graph.num_edges,
        properties_path: config.properties_path(),
        vertex_path: config.vertex_path(),
        edge_path: config.edge_path(),
        algorithms,
    };

    let encoding = Encoding::from_compress(config.compress);
    let mut outputs = Outputs::default();
    let saved = emit::save_properties(&mut outputs, &summary.properties_path, &description)
        .and_then(|()| emit::save_vertices(&mut outputs, &summary.vertex_path, graph.num_vertices, encoding))
        .and_then(|()| emit::save_edges(&mut outputs, &summary.edge_path, graph.edges(), reader.is_weighted(), encoding));

    if let Err(err) = saved {
        outputs.remove_all();
        return Err(err);
    }

    Ok(summary)
}

fn current_hostname() -> Result<String> {
    let name = hostname::get().map_err(|e| ConvertError::config(format!("cannot fetch the hostname: {}", e)))?;
    Ok(name.to_string_lossy().into_owned())
}

fn current_datetime() -> Result<String> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description!("[day]/[month]/[year] [hour]:[minute]:[second]");
    now.format(format)
        .map_err(|e| ConvertError::config(format!("cannot format the creation date: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_date_is_day_month_year() {
        let created = current_datetime().unwrap();
        let (date, clock) = created.split_once(' ').unwrap();
        let date: Vec<&str> = date.split('/').collect();
        assert_eq!(date.iter().map(|part| part.len()).collect::<Vec<_>>(), vec![2, 2, 4]);
        assert_eq!(clock.split(':').count(), 3);
    }
}
