//! Cleaning pipeline - runs a recipe's steps over one loaded file

use crate::config::CleanRecipe;
use crate::error::CleanerResult;
use crate::ingestion::LoadedTable;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What one step did to the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
}

/// Result of running a pipeline
#[derive(Clone, Debug)]
pub struct CleaningOutcome {
    /// Source file name
    pub name: String,
    pub table: Table,
    pub steps: Vec<StepReport>,
    /// (rows, columns) before cleaning
    pub original_shape: (usize, usize),
}

impl CleaningOutcome {
    /// One-line description, e.g. `sales.csv: 120x6 -> 48x3`
    pub fn summary(&self) -> String {
        let (r0, c0) = self.original_shape;
        let (r1, c1) = self.table.shape();
        format!("{}: {}x{} -> {}x{}", self.name, r0, c0, r1, c1)
    }
}

/// Applies a recipe in a fixed order: select, sort, filters, row slice, pivot
pub struct CleaningPipeline {
    recipe: CleanRecipe,
}

impl CleaningPipeline {
    pub fn new(recipe: CleanRecipe) -> Self {
        Self { recipe }
    }

    pub fn recipe(&self) -> &CleanRecipe {
        &self.recipe
    }

    pub fn run(&self, loaded: LoadedTable) -> CleanerResult<CleaningOutcome> {
        let original_shape = loaded.table.shape();
        let mut table = loaded.table;
        let mut steps = Vec::new();
        let recipe = &self.recipe;

        if !recipe.select.is_empty() {
            table = record(&mut steps, "select", table, |t| t.select(&recipe.select))?;
        }
        if !recipe.sort.is_empty() {
            table = record(&mut steps, "sort", table, |t| t.sort_by(&recipe.sort))?;
        }
        for filter in &recipe.filters {
            let step = format!("filter {}", filter.column());
            table = record(&mut steps, &step, table, |t| t.apply_filter(filter))?;
        }
        if let Some(rows) = &recipe.rows {
            table = record(&mut steps, "rows", table, |t| Ok(t.slice_rows(rows)))?;
        }
        if let Some(pivot) = &recipe.pivot {
            table = record(&mut steps, "pivot", table, |t| t.pivot(pivot))?;
        }

        let outcome = CleaningOutcome {
            name: loaded.name,
            table,
            steps,
            original_shape,
        };
        info!("{}", outcome.summary());
        Ok(outcome)
    }
}

fn record(
    steps: &mut Vec<StepReport>,
    step: &str,
    table: Table,
    apply: impl FnOnce(&Table) -> CleanerResult<Table>,
) -> CleanerResult<Table> {
    let rows_before = table.num_rows();
    let next = apply(&table).map_err(|e| e.with_context(format!("step '{}'", step)))?;
    let report = StepReport {
        step: step.to_string(),
        rows_before,
        rows_after: next.num_rows(),
        columns: next.num_columns(),
    };
    debug!(
        step,
        rows_before = report.rows_before,
        rows_after = report.rows_after,
        columns = report.columns,
        "pipeline step"
    );
    steps.push(report);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AggFunc, PivotSpec, RowFilter, RowRange, SortKey};
    use crate::ingestion::FileFormat;
    use crate::table::Scalar;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use std::sync::Arc;

    fn loaded() -> LoadedTable {
        let table = Table::from_columns(vec![
            (
                "city".to_string(),
                Arc::new(StringArray::from(vec!["b", "a", "b", "c", "a"])) as ArrayRef,
            ),
            (
                "units".to_string(),
                Arc::new(Int64Array::from(vec![5, 1, 7, 3, 9])) as ArrayRef,
            ),
            (
                "extra".to_string(),
                Arc::new(Int64Array::from(vec![0, 0, 0, 0, 0])) as ArrayRef,
            ),
        ])
        .unwrap();
        LoadedTable::new("sales.csv", FileFormat::Csv, table)
    }

    #[test]
    fn test_empty_recipe_is_identity() {
        let outcome = CleaningPipeline::new(CleanRecipe::default()).run(loaded()).unwrap();
        assert!(outcome.steps.is_empty());
        assert_eq!(outcome.summary(), "sales.csv: 5x3 -> 5x3");
    }

    #[test]
    fn test_steps_run_in_order() {
        let recipe = CleanRecipe {
            select: vec!["city".into(), "units".into()],
            sort: vec![SortKey::desc("units")],
            filters: vec![RowFilter::Range { column: "units".into(), min: Some(2.0), max: None }],
            rows: Some(RowRange { start: 0, end: Some(3) }),
            ..CleanRecipe::default()
        };
        let outcome = CleaningPipeline::new(recipe).run(loaded()).unwrap();
        let names: Vec<&str> = outcome.steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(names, vec!["select", "sort", "filter units", "rows"]);
        assert_eq!(outcome.steps[2].rows_before, 5);
        assert_eq!(outcome.steps[2].rows_after, 4);
        assert_eq!(outcome.summary(), "sales.csv: 5x3 -> 3x2");
        assert_eq!(outcome.table.scalar(0, 1), Scalar::Int(9));
    }

    #[test]
    fn test_pivot_step() {
        let recipe = CleanRecipe {
            pivot: Some(PivotSpec {
                index: vec!["city".into()],
                columns: None,
                values: "units".into(),
                aggfunc: AggFunc::Sum,
                fill_value: None,
            }),
            ..CleanRecipe::default()
        };
        let outcome = CleaningPipeline::new(recipe).run(loaded()).unwrap();
        assert_eq!(outcome.table.shape(), (3, 2));
        assert_eq!(outcome.table.row(1), vec![Scalar::Text("b".into()), Scalar::Int(12)]);
    }

    #[test]
    fn test_failing_step_propagates() {
        let recipe = CleanRecipe {
            select: vec!["missing".into()],
            ..CleanRecipe::default()
        };
        assert!(CleaningPipeline::new(recipe).run(loaded()).is_err());
    }
}
