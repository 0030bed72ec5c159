//! Domain rules that do not touch the database: order arithmetic, board
//! positions, mockup transforms and sequence scheduling.

pub mod board;
pub mod mockup;
pub mod order_totals;
pub mod sequence_schedule;
