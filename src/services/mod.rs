// Order lifecycle
pub mod order_records;
pub mod orders;
pub mod reconciliation;

// CRM
pub mod companies;
pub mod contacts;
pub mod leads;
pub mod suppliers;
pub mod users;

// Catalog
pub mod products;

// Production tools
pub mod artwork;
pub mod mockups;
pub mod sequences;

// Cross-cutting records
pub mod activities;
pub mod notifications;

// Reporting and external systems
pub mod dashboard;
pub mod integrations;
