/// Table model: Arrow-backed columns, scalar cells and column inference
pub mod column;
pub mod frame;
pub mod scalar;

pub use column::{build_scalar_column, coerce_column, infer_text_column, unify_types};
pub use frame::{ColumnSummary, Table};
pub use scalar::Scalar;
