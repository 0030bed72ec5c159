//! SeaORM entities, one module per table.

pub mod activity;
pub mod artwork_card;
pub mod artwork_column;
pub mod artwork_file;
pub mod attachment;
pub mod communication;
pub mod company;
pub mod contact;
pub mod lead;
pub mod mockup;
pub mod notification;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_category;
pub mod sequence;
pub mod sequence_enrollment;
pub mod sequence_step;
pub mod supplier;
pub mod user;
