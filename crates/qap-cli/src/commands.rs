use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use qap_cli::pipeline::{Pipeline, RunReport};
use qap_ingest::read_records;
use qap_model::SchemaId;
use qap_xnat::{Credentials, DirectorySink, FixedScanType, XnatClient};

use crate::cli::{RenderArgs, UploadArgs};
use crate::summary::apply_table_style;

pub fn run_schemas() {
    let mut table = Table::new();
    table.set_header(vec!["Schema", "Description", "Root", "Nested", "Groups"]);
    apply_table_style(&mut table);
    for schema in SchemaId::ALL {
        let definition = schema.definition();
        table.add_row(vec![
            schema.as_str().to_string(),
            schema.description().to_string(),
            definition.root_measures.len().to_string(),
            definition.nested_measures.len().to_string(),
            definition.nested_elements().join(", "),
        ]);
    }
    println!("{table}");
}

pub fn run_upload(args: &UploadArgs) -> Result<RunReport> {
    let schema = args.selection.resolve().context("select assessment schema")?;
    let span = info_span!("upload", project = %args.project, schema = %schema);
    let _guard = span.enter();

    let credentials: Credentials = args.auth.parse()?;
    let client = XnatClient::new(&args.host, credentials)
        .with_context(|| format!("connect to {}", args.host))?;
    let records = read_records(&args.csv)
        .with_context(|| format!("read results table {}", args.csv.display()))?;
    info!(records = records.len(), host = %client.base_url(), "loaded results table");

    let pipeline = Pipeline::new(&client, &client, args.project.as_str(), schema)
        .with_dry_run(args.dry_run);
    Ok(pipeline.run(&args.csv, &records))
}

pub fn run_render(args: &RenderArgs) -> Result<RunReport> {
    let schema = args.selection.resolve().context("select assessment schema")?;
    let span = info_span!("render", schema = %schema, output_dir = %args.output_dir.display());
    let _guard = span.enter();

    let records = read_records(&args.csv)
        .with_context(|| format!("read results table {}", args.csv.display()))?;
    info!(records = records.len(), "loaded results table");

    let resolver = FixedScanType(args.scan_type.clone());
    let sink = DirectorySink::new(&args.output_dir);
    let pipeline = Pipeline::new(&resolver, &sink, args.project.as_str(), schema);
    Ok(pipeline.run(&args.csv, &records))
}
