use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    activities, artwork, companies, contacts, dashboard, leads, mockups, notifications, orders,
    products, sequences, suppliers, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SwagSuite API",
        version = "1.0.0",
        description = r#"
# SwagSuite

Back office for a promotional-products distributor: orders and their line
items, the customer CRM, the product catalog, the artwork kanban board,
mockups, email sequences and the dashboard.

Every successful response is wrapped as `{ "success": true, "data": ..., "meta": ... }`.
Failures return an error body with the request id echoed from `x-request-id`.

Send `x-user-id` to attribute changes to a user. Notification endpoints
require it.
"#
    ),
    servers((url = "/", description = "This server")),
    tags(
        (name = "system", description = "Health and status"),
        (name = "orders", description = "Orders, line items and totals"),
        (name = "order-records", description = "Artwork files, attachments and communications of an order"),
        (name = "companies", description = "Customer companies"),
        (name = "contacts", description = "People at companies and suppliers"),
        (name = "leads", description = "Sales leads and conversion"),
        (name = "suppliers", description = "Product suppliers"),
        (name = "users", description = "Team members"),
        (name = "products", description = "Catalog and categories"),
        (name = "artwork", description = "Artwork kanban board"),
        (name = "mockups", description = "Product mockups and logo placement"),
        (name = "sequences", description = "Email sequences and enrollments"),
        (name = "notifications", description = "Per-user notifications"),
        (name = "activities", description = "Activity log"),
        (name = "dashboard", description = "Reporting and integration status"),
    ),
    paths(
        crate::health_check,
        crate::api_status,
        orders::list_orders,
        orders::get_order,
        orders::get_order_by_number,
        orders::create_order,
        orders::update_order,
        orders::update_order_status,
        orders::delete_order,
        orders::add_order_item,
        orders::update_order_item,
        orders::remove_order_item,
        orders::list_order_activities,
        orders::reconcile_totals,
        orders::list_order_artwork,
        orders::add_order_artwork,
        orders::delete_order_artwork,
        orders::list_order_attachments,
        orders::add_order_attachment,
        orders::delete_order_attachment,
        orders::list_order_communications,
        orders::log_order_communication,
        companies::list_companies,
        companies::get_company,
        companies::create_company,
        companies::update_company,
        companies::delete_company,
        companies::list_company_contacts,
        companies::list_company_artwork,
        companies::list_company_activities,
        contacts::list_contacts,
        contacts::get_contact,
        contacts::create_contact,
        contacts::update_contact,
        contacts::delete_contact,
        leads::list_leads,
        leads::get_lead,
        leads::create_lead,
        leads::update_lead,
        leads::delete_lead,
        leads::convert_lead,
        suppliers::list_suppliers,
        suppliers::get_supplier,
        suppliers::create_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier,
        users::list_users,
        users::get_user,
        users::create_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::list_categories,
        products::create_category,
        artwork::get_board,
        artwork::create_column,
        artwork::update_column,
        artwork::delete_column,
        artwork::reorder_columns,
        artwork::get_card,
        artwork::create_card,
        artwork::update_card,
        artwork::move_card,
        artwork::delete_card,
        mockups::list_mockups,
        mockups::get_mockup,
        mockups::create_mockup,
        mockups::update_mockup,
        mockups::delete_mockup,
        mockups::add_logo,
        mockups::update_logo,
        mockups::remove_logo,
        mockups::remove_background,
        mockups::apply_color,
        sequences::list_sequences,
        sequences::get_sequence,
        sequences::create_sequence,
        sequences::update_sequence,
        sequences::delete_sequence,
        sequences::replace_steps,
        sequences::sequence_analytics,
        sequences::list_enrollments,
        sequences::enroll_contact,
        sequences::due_enrollments,
        sequences::advance_enrollment,
        sequences::stop_enrollment,
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
        activities::recent_activities,
        activities::entity_activities,
        dashboard::dashboard_stats,
        dashboard::team_performance,
        dashboard::recent_orders,
        dashboard::integration_status,
    ),
    components(schemas(crate::errors::ErrorResponse))
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_main_routes() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("SwagSuite API"));
        assert!(json.contains("/api/orders/{id}/status"));
        assert!(json.contains("/api/artwork/cards/{id}/move"));
        assert!(json.contains("/api/dashboard/stats"));
        assert!(json.contains("ErrorResponse"));
    }
}
