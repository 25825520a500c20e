use crate::cli::OutputFormat;
use anyhow::Result;
use std::io::Write;
use wsc_registry::WorkspaceCluster;

const HEADERS: [&str; 8] = [
    "NAME",
    "APPLICATION CLUSTER",
    "URL",
    "STATE",
    "SCORE",
    "MAX SCORE",
    "GOVERN",
    "ADMISSION CONSTRAINTS",
];

/// Print records as an aligned table or a JSON array.
///
/// TLS material is never printed in list output.
pub fn write_clusters(
    out: &mut impl Write,
    format: OutputFormat,
    clusters: &[WorkspaceCluster],
) -> Result<()> {
    let clusters: Vec<WorkspaceCluster> = clusters
        .iter()
        .cloned()
        .map(|cluster| WorkspaceCluster {
            tls: None,
            ..cluster
        })
        .collect();

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &clusters)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            let rows: Vec<[String; 8]> = clusters.iter().map(table_row).collect();
            write_table(out, &rows)?;
        }
    }

    Ok(())
}

/// Print a single record, including TLS material in JSON form.
pub fn write_cluster(
    out: &mut impl Write,
    format: OutputFormat,
    cluster: &WorkspaceCluster,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, cluster)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            write_table(out, &[table_row(cluster)])?;
            if cluster.tls.is_some() {
                writeln!(out, "TLS: configured")?;
            }
        }
    }

    Ok(())
}

fn table_row(cluster: &WorkspaceCluster) -> [String; 8] {
    let constraints = if cluster.admission_constraints.is_empty() {
        "-".to_string()
    } else {
        cluster
            .admission_constraints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    };

    [
        cluster.name.clone(),
        cluster.application_cluster.clone(),
        cluster.url.clone(),
        cluster.state.to_string(),
        cluster.score.to_string(),
        cluster.max_score.to_string(),
        cluster.govern.to_string(),
        constraints,
    ]
}

fn write_table(out: &mut impl Write, rows: &[[String; 8]]) -> Result<()> {
    // Padding in `format!` counts chars, so widths must too.
    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    write_line(out, &widths, &header)?;
    for row in rows {
        write_line(out, &widths, row)?;
    }

    Ok(())
}

fn write_line(out: &mut impl Write, widths: &[usize; 8], cells: &[String]) -> Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}
