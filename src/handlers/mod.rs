pub mod activities;
pub mod artwork;
pub mod common;
pub mod companies;
pub mod contacts;
pub mod dashboard;
pub mod leads;
pub mod mockups;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod sequences;
pub mod suppliers;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    events::EventSender,
    services::{
        activities::ActivityService, artwork::ArtworkBoardService, companies::CompanyService,
        contacts::ContactService, dashboard::DashboardService, leads::LeadService,
        mockups::MockupService, notifications::NotificationService,
        order_records::OrderRecordService, orders::OrderService,
        products::ProductService, reconciliation::ReconciliationService,
        sequences::SequenceService, suppliers::SupplierService, users::UserService,
    },
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub order_records: Arc<OrderRecordService>,
    pub reconciliation: Arc<ReconciliationService>,
    pub companies: Arc<CompanyService>,
    pub contacts: Arc<ContactService>,
    pub leads: Arc<LeadService>,
    pub suppliers: Arc<SupplierService>,
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
    pub artwork: Arc<ArtworkBoardService>,
    pub mockups: Arc<MockupService>,
    pub sequences: Arc<SequenceService>,
    pub activities: Arc<ActivityService>,
    pub notifications: Arc<NotificationService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        config: &AppConfig,
    ) -> Self {
        Self {
            orders: Arc::new(OrderService::new(
                db_pool.clone(),
                event_sender.clone(),
                config.tax_rate(),
            )),
            order_records: Arc::new(OrderRecordService::new(db_pool.clone())),
            reconciliation: Arc::new(ReconciliationService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            companies: Arc::new(CompanyService::new(db_pool.clone(), event_sender.clone())),
            contacts: Arc::new(ContactService::new(db_pool.clone())),
            leads: Arc::new(LeadService::new(db_pool.clone(), event_sender.clone())),
            suppliers: Arc::new(SupplierService::new(db_pool.clone())),
            users: Arc::new(UserService::new(db_pool.clone())),
            products: Arc::new(ProductService::new(db_pool.clone())),
            artwork: Arc::new(ArtworkBoardService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            mockups: Arc::new(MockupService::new(db_pool.clone())),
            sequences: Arc::new(SequenceService::new(db_pool.clone(), event_sender)),
            activities: Arc::new(ActivityService::new(db_pool.clone())),
            notifications: Arc::new(NotificationService::new(db_pool.clone())),
            dashboard: Arc::new(DashboardService::new(db_pool)),
        }
    }
}
