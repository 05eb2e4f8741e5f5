pub mod columns;
pub mod position;
pub mod rows;

pub use columns::assign_columns;
pub use position::compute_positions;
pub use rows::assign_rows;
