//! Command implementations behind the CLI subcommands

use crate::cli::args::{CleanArgs, CombineArgs, CombineMode, Commands, ReadArgs};
use anyhow::{Context, Result};
use std::path::Path;
use table_cleaner::combine::COMBINED_NAME;
use table_cleaner::{
    concat_tables, export_table, format_results, load_table, merge_tables, render_text,
    sheet_names, CleanRecipe, CleaningPipeline, ConcatOptions, ExportOptions, FileFormat,
    LoadedTable, MergeSpec, PivotSpec, ResultFormat, RowFilter, Table,
};

pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Inspect { file, read, preview } => inspect(&file, &read, preview),
        Commands::Clean(args) => clean(args),
        Commands::Combine(args) => combine(args),
    }
}

fn inspect(file: &Path, read: &ReadArgs, preview: usize) -> Result<()> {
    let options = read.apply(Default::default());
    if !FileFormat::from_path(file)?.is_text() {
        let sheets = sheet_names(file)?;
        println!("Sheets: {}", sheets.join(", "));
    }

    let loaded = load_table(file, &options)?;
    let (rows, cols) = loaded.table.shape();
    println!("{}: {} rows x {} columns", loaded.name, rows, cols);
    if let Some(delimiter) = loaded.delimiter {
        println!("Delimiter: {:?}", delimiter as char);
    }
    println!();

    for summary in loaded.table.column_summaries() {
        let bounds = summary
            .bounds
            .map(|(lo, hi)| format!("  [{} .. {}]", lo, hi))
            .unwrap_or_default();
        println!(
            "  {:<24} {:<6} nulls={}{}",
            summary.name, summary.data_type, summary.null_count, bounds
        );
    }
    println!();
    print_preview(&loaded.table, preview);
    Ok(())
}

/// Recipe from `--recipe` (or defaults) with command-line flags laid over it
fn build_recipe(args: &CleanArgs) -> Result<CleanRecipe> {
    let mut recipe = match &args.recipe {
        Some(path) => CleanRecipe::from_path(path)
            .with_context(|| format!("loading recipe {}", path.display()))?,
        None => CleanRecipe::default(),
    };
    recipe.read = args.read.apply(recipe.read);

    if !args.select.is_empty() {
        recipe.select = args.select.clone();
    }
    if !args.sort.is_empty() {
        recipe.sort = args.sort.clone();
    }

    let mut filters = args
        .ranges
        .iter()
        .map(|spec| RowFilter::parse_range(spec))
        .collect::<Result<Vec<_>, _>>()?;
    for spec in &args.contains {
        filters.push(RowFilter::parse_text(spec, !args.literal, !args.ignore_case)?);
    }
    if !filters.is_empty() {
        recipe.filters = filters;
    }

    if args.rows.is_some() {
        recipe.rows = args.rows;
    }

    if let Some(values) = &args.pivot_values {
        recipe.pivot = Some(PivotSpec {
            index: args.pivot_index.clone(),
            columns: args.pivot_columns.clone(),
            values: values.clone(),
            aggfunc: args.agg.unwrap_or_default(),
            fill_value: args.fill_value,
        });
    } else if !args.pivot_index.is_empty() {
        anyhow::bail!("--pivot-index needs --pivot-values");
    }

    recipe.export = args.output.apply(recipe.export);
    Ok(recipe)
}

fn clean(args: CleanArgs) -> Result<()> {
    let recipe = build_recipe(&args)?;
    let loaded = load_table(&args.file, &recipe.read)?;
    let source = loaded.name.clone();

    let pipeline = CleaningPipeline::new(recipe);
    let outcome = pipeline.run(loaded)?;
    println!("{}", outcome.summary());
    for step in &outcome.steps {
        println!(
            "  {:<20} {} -> {} rows, {} columns",
            step.step, step.rows_before, step.rows_after, step.columns
        );
    }

    print_preview(&outcome.table, args.output.preview);
    write_outputs(&outcome.table, &source, &pipeline.recipe().export)
}

fn combine(args: CombineArgs) -> Result<()> {
    let options = args.read.apply(Default::default());
    let inputs = args
        .files
        .iter()
        .map(|file| load_table(file, &options))
        .collect::<Result<Vec<LoadedTable>, _>>()?;

    let table = match args.mode {
        CombineMode::Concat => concat_tables(
            &inputs,
            &ConcatOptions {
                source_column: args.source_column.clone(),
            },
        )?,
        CombineMode::Merge => {
            if args.source_column.is_some() {
                tracing::warn!("--source-column only applies to concat, ignoring");
            }
            let spec = MergeSpec {
                keys: args.key_lists(),
                how: args.how,
                key_case: args.key_case,
                trim_keys: args.trim_keys,
                suffixes: None,
            };
            merge_tables(&inputs, &spec)?
        }
    };

    let (rows, cols) = table.shape();
    println!("combined {} files: {} rows x {} columns", inputs.len(), rows, cols);
    print_preview(&table, args.output.preview);
    write_outputs(&table, COMBINED_NAME, &args.output.apply(ExportOptions::default()))
}

fn print_preview(table: &Table, rows: usize) {
    if rows == 0 {
        return;
    }
    let formatted = format_results(table, ResultFormat::Sample(rows));
    print!("{}", render_text(&formatted));
}

fn write_outputs(table: &Table, source: &str, options: &ExportOptions) -> Result<()> {
    for path in export_table(table, source, options)? {
        println!("wrote {}", path.display());
    }
    Ok(())
}
