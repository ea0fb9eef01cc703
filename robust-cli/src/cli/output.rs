//! Writers for the thresholded module.
//!
//! The destination extension picks the format: an occurrence table for
//! `.csv`, GraphML for `.graphml`, and a space-separated edge list
//! otherwise.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    sync::Arc,
};

use robust_core::{ModuleGraph, OccurrenceRow, SolutionSet};
use serde::Serialize;
use tracing::{Span, field, instrument};

use super::CliError;

/// File formats the module can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Per-vertex occurrence table.
    Csv,
    /// Module graph with node attributes.
    GraphMl,
    /// One `source target` pair per line.
    EdgeList,
}

impl OutputFormat {
    /// Chooses the format from the extension of `path`, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    ///
    /// use robust_cli::cli::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path(Path::new("out.CSV")), OutputFormat::Csv);
    /// assert_eq!(OutputFormat::from_path(Path::new("out.graphml")), OutputFormat::GraphMl);
    /// assert_eq!(OutputFormat::from_path(Path::new("out.txt")), OutputFormat::EdgeList);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|value| value.to_str());
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            Some(ext) if ext.eq_ignore_ascii_case("graphml") => Self::GraphMl,
            _ => Self::EdgeList,
        }
    }

    /// Returns the lowercase name used in summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::GraphMl => "graphml",
            Self::EdgeList => "edgelist",
        }
    }
}

/// Counts of what was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Written {
    /// Vertices (or table rows) written.
    pub vertices: usize,
    /// Edges written.
    pub edges: usize,
}

/// Writes the vertices of `solutions` occurring in at least `threshold` of
/// the trees to `path` in `format`.
///
/// # Errors
/// Returns [`CliError::Core`] for an empty solution set or an invalid
/// threshold and [`CliError::Output`] when the file cannot be written.
#[instrument(
    name = "cli.write_output",
    err,
    skip(path, solutions),
    fields(path = %path.display(), rows = field::Empty),
)]
pub fn write_output(
    path: &Path,
    format: OutputFormat,
    solutions: &SolutionSet,
    threshold: f64,
) -> Result<Written, CliError> {
    let to_output_error = |source| CliError::Output {
        path: path.to_path_buf(),
        source,
    };
    let payload = match format {
        OutputFormat::Csv => Payload::Rows(
            solutions
                .occurrences(true, None)?
                .into_iter()
                .filter(|row| row.fraction >= threshold)
                .collect(),
        ),
        OutputFormat::GraphMl | OutputFormat::EdgeList => {
            Payload::Module(solutions.subgraph(threshold)?)
        }
    };
    let written = payload.counts();
    Span::current().record("rows", written.vertices);

    let file = File::create(path).map_err(to_output_error)?;
    let mut out = BufWriter::new(file);
    let rendered = match (&payload, format) {
        (Payload::Rows(rows), _) => write_occurrences(rows, &mut out),
        (Payload::Module(module), OutputFormat::GraphMl) => write_graphml(module, &mut out),
        (Payload::Module(module), _) => write_edge_list(module, &mut out),
    };
    rendered.map_err(to_output_error)?;
    out.flush().map_err(to_output_error)?;
    Ok(written)
}

enum Payload {
    Rows(Vec<OccurrenceRow>),
    Module(ModuleGraph),
}

impl Payload {
    fn counts(&self) -> Written {
        match self {
            Self::Rows(rows) => Written {
                vertices: rows.len(),
                edges: 0,
            },
            Self::Module(module) => Written {
                vertices: module.nodes().len(),
                edges: module.edge_count(),
            },
        }
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}

/// Writes occurrence rows as CSV with a header.
///
/// # Errors
/// Propagates write failures.
pub fn write_occurrences(rows: &[OccurrenceRow], mut out: impl Write) -> io::Result<()> {
    writeln!(out, "vertex,occurrences,%occurrences,terminal")?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{}",
            csv_field(&row.label),
            row.count,
            row.fraction,
            row.is_terminal
        )?;
    }
    Ok(())
}

fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const GRAPHML_KEYS: &[(&str, &str, &str)] = &[
    ("d0", "occurrences", "int"),
    ("d1", "fraction", "double"),
    ("d2", "is_terminal", "boolean"),
    ("d3", "connected_components_id", "int"),
];

/// Writes `module` as undirected GraphML.
///
/// Every node carries its occurrence count and fraction, its terminal flag,
/// and `connected_components_id`, where component `0` is the largest.
///
/// # Errors
/// Propagates write failures.
pub fn write_graphml(module: &ModuleGraph, mut out: impl Write) -> io::Result<()> {
    let component_of: HashMap<Arc<str>, usize> = module
        .connected_components()
        .into_iter()
        .enumerate()
        .flat_map(|(id, members)| members.into_iter().map(move |label| (label, id)))
        .collect();

    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        out,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
    )?;
    for (id, name, kind) in GRAPHML_KEYS {
        writeln!(
            out,
            r#"  <key id="{id}" for="node" attr.name="{name}" attr.type="{kind}"/>"#
        )?;
    }
    writeln!(out, r#"  <graph edgedefault="undirected">"#)?;
    for node in module.nodes() {
        let component = component_of.get(&node.label).copied().unwrap_or(0);
        writeln!(out, r#"    <node id="{}">"#, xml_escape(&node.label))?;
        writeln!(out, r#"      <data key="d0">{}</data>"#, node.count)?;
        writeln!(out, r#"      <data key="d1">{}</data>"#, node.fraction)?;
        writeln!(out, r#"      <data key="d2">{}</data>"#, node.is_terminal)?;
        writeln!(out, r#"      <data key="d3">{component}</data>"#)?;
        writeln!(out, "    </node>")?;
    }
    for (left, right) in module.edges() {
        writeln!(
            out,
            r#"    <edge source="{}" target="{}"/>"#,
            xml_escape(left),
            xml_escape(right)
        )?;
    }
    writeln!(out, "  </graph>")?;
    writeln!(out, "</graphml>")
}

/// Writes the edges of `module`, one space-separated pair per line.
///
/// # Errors
/// Propagates write failures.
pub fn write_edge_list(module: &ModuleGraph, mut out: impl Write) -> io::Result<()> {
    for (left, right) in module.edges() {
        writeln!(out, "{left} {right}")?;
    }
    Ok(())
}
