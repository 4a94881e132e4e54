use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    analytics::{
        CancellationStats, CustomerStat, Dashboard, DateRange, GeoPoint, HourBucket, ItemStat,
        RangeSummary, SegmentBreakdown, TimeBucket,
    },
    dto::{
        customers::{CustomerDto, CustomerList},
        marketing::{CustomerSegment, EmailCampaignRequest, EmailPayload},
        menu::{MenuCategoryInput, MenuItemInput, MenuResponse, SaveMenuRequest},
        orders::{
            CartLineInput, CouponDto, CouponList, OrderList, OrderWithItems, PlaceOrderRequest,
            QuoteRequest, TrackOrderResponse,
        },
        reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
    },
    models::{CustomerInfo, MenuCategory, MenuItem, Order, OrderLine, PriceOption, Reservation, User},
    pricing::Bill,
    response::{ApiResponse, Meta},
    routes::{admin, auth, coupons, health, menu, orders, params, reservations},
    status::{Notification, OrderStatus, OrderType},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        menu::get_menu,
        menu::save_menu,
        coupons::list_coupons,
        orders::quote,
        orders::place_order,
        orders::track_order,
        orders::ack_notification,
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::update_reservation,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::mark_seen,
        admin::update_order_status,
        admin::decline_order,
        admin::purge_orders,
        admin::list_customers,
        admin::dashboard,
        admin::assemble_email,
        admin::get_setting,
        admin::put_setting
    ),
    components(
        schemas(
            User,
            CustomerInfo,
            Order,
            OrderLine,
            OrderStatus,
            OrderType,
            Notification,
            Reservation,
            MenuCategory,
            MenuItem,
            PriceOption,
            Bill,
            CartLineInput,
            QuoteRequest,
            PlaceOrderRequest,
            OrderWithItems,
            OrderList,
            TrackOrderResponse,
            CouponDto,
            CouponList,
            SaveMenuRequest,
            MenuCategoryInput,
            MenuItemInput,
            MenuResponse,
            CreateReservationRequest,
            UpdateReservationRequest,
            ReservationList,
            CustomerDto,
            CustomerList,
            CustomerSegment,
            EmailCampaignRequest,
            EmailPayload,
            DateRange,
            Dashboard,
            RangeSummary,
            SegmentBreakdown,
            CancellationStats,
            TimeBucket,
            HourBucket,
            ItemStat,
            CustomerStat,
            GeoPoint,
            admin::UpdateOrderStatusRequest,
            admin::PurgeOrdersRequest,
            params::Pagination,
            params::OrderListQuery,
            params::ReservationListQuery,
            params::AnalyticsQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<Bill>,
            ApiResponse<MenuResponse>,
            ApiResponse<Dashboard>,
            ApiResponse<CustomerList>,
            ApiResponse<ReservationList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Menu endpoints"),
        (name = "Coupons", description = "Coupon endpoints"),
        (name = "Orders", description = "Customer order endpoints"),
        (name = "Reservations", description = "Table reservation endpoints"),
        (name = "Admin", description = "Operations dashboard endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
