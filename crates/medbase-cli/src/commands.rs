use anyhow::{Result, anyhow};

use medbase_cli::pipeline::{RunOptions, RunSummary, run};
use medbase_ingest::{ExtractOptions, PricingColumns, SourceEncoding};

use crate::cli::{EncodingArg, RunArgs};

pub fn run_pipeline(args: &RunArgs) -> Result<RunSummary> {
    let options = RunOptions {
        registry_path: args.registry.clone(),
        pricing_path: args.pricing.clone(),
        db_path: args.db.clone(),
        registry_read: ExtractOptions {
            delimiter: delimiter_byte(args.registry_delimiter)?,
            encoding: encoding(args.registry_encoding),
        },
        pricing_read: ExtractOptions {
            delimiter: delimiter_byte(args.pricing_delimiter)?,
            encoding: encoding(args.pricing_encoding),
        },
        pricing_columns: pricing_columns(args),
        dry_run: args.dry_run,
    };
    run(&options)
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .map_err(|_| anyhow!("delimiter '{delimiter}' is not a single-byte character"))
}

fn encoding(arg: EncodingArg) -> SourceEncoding {
    match arg {
        EncodingArg::Utf8 => SourceEncoding::Utf8,
        EncodingArg::Latin1 => SourceEncoding::Latin1,
    }
}

fn pricing_columns(args: &RunArgs) -> PricingColumns {
    let mut columns = PricingColumns::default();
    if let Some(name) = &args.registration_column {
        columns.registration = name.clone();
    }
    if let Some(name) = &args.presentation_column {
        columns.presentation = name.clone();
    }
    columns
}
