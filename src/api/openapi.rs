use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{AddMemberRequest, CreateExpenseRequest, CreateGroupRequest, ErrorResponse, SplitInput},
    core::models::{AppLog, Expense, Group, GroupEvent, SettlementStatus, SettlementTransfer, Split, SplitMode},
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_group,
        super::handlers::list_groups,
        super::handlers::get_group,
        super::handlers::add_member,
        super::handlers::create_expense,
        super::handlers::list_expenses,
        super::handlers::get_settlements,
        super::handlers::mark_settlement_paid,
        super::handlers::get_app_logs,
        super::ws::group_events
    ),
    components(schemas(
        CreateGroupRequest,
        AddMemberRequest,
        CreateExpenseRequest,
        SplitInput,
        ErrorResponse,
        Group,
        Expense,
        Split,
        SplitMode,
        SettlementTransfer,
        SettlementStatus,
        GroupEvent,
        AppLog
    )),
    modifiers(&BearerAuth),
    info(
        title = "Billsplit API",
        description = "Group expense splitting with debt netting and live settlement updates",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
