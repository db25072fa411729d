pub mod board;
pub mod row;

pub use board::{MarketBoard, RowView};
pub use row::BoardRow;
