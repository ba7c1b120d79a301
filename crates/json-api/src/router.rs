//! App Router

use salvo::Router;

use crate::{
    auth::{self, admin::require_admin},
    categories, dashboard, healthcheck, orders, products, users,
};

/// Routes under `/api`.
///
/// Public and gated handlers sharing a path live in sibling routers so the
/// auth gate only runs for the gated methods.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(auth_router())
        .push(products_router())
        .push(orders_router())
        .push(admin_router())
}

fn auth_router() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(auth::register::handler))
        .push(Router::with_path("login").post(auth::login::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .get(auth::current::handler),
        )
}

fn products_router() -> Router {
    Router::with_path("products")
        .get(products::index::handler)
        .push(Router::with_path("{id}").get(products::get::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .hoop(require_admin)
                .post(products::create::handler)
                .push(
                    Router::with_path("{id}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}

fn orders_router() -> Router {
    Router::with_path("orders")
        .hoop(auth::middleware::handler)
        .post(orders::create::handler)
        .push(Router::with_path("my").get(orders::mine::handler))
        .push(Router::with_path("{id}").get(orders::get::handler))
        .push(
            Router::with_path("{id}")
                .hoop(require_admin)
                .put(orders::update::handler),
        )
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .hoop(auth::middleware::handler)
        .hoop(require_admin)
        .push(Router::with_path("stats").get(dashboard::handler))
        .push(
            Router::with_path("users")
                .get(users::index::handler)
                .push(
                    Router::with_path("{id}")
                        .delete(users::delete::handler)
                        .push(Router::with_path("role").put(users::role::handler)),
                ),
        )
        .push(
            Router::with_path("categories")
                .get(categories::index::handler)
                .post(categories::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(categories::get::handler)
                        .put(categories::update::handler)
                        .delete(categories::delete::handler),
                ),
        )
        .push(Router::with_path("products").get(products::admin_index::handler))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use storefront_app::{
        auth::{AuthServiceError, MockAuthService},
        domain::{
            dashboard::{
                MockDashboardService,
                records::{Dashboard, DashboardStats},
            },
            orders::{MockOrdersService, records::OrderUuid},
            pagination::Page,
            products::{MockProductsService, records::ProductUuid},
            users::records::Role,
        },
    };
    use testresult::TestResult;

    use crate::{
        auth::{admin::NOT_AN_ADMIN, middleware::REJECTED},
        envelope::ErrorEnvelope,
        test_helpers::{Mocks, TEST_USER_UUID, make_user, service},
    };

    use super::*;

    /// Accepts `user-token` and `admin-token`.
    fn make_auth() -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().returning(|token| match token {
            "user-token" => Ok(make_user(TEST_USER_UUID, Role::User)),
            "admin-token" => Ok(make_user(TEST_USER_UUID, Role::Admin)),
            _ => Err(AuthServiceError::UnknownIdentity),
        });

        auth
    }

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, api_router())
    }

    #[tokio::test]
    async fn health_is_public() -> TestResult {
        let res = TestClient::get("http://example.com/api/health")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_return_404_envelope() -> TestResult {
        let mut res = TestClient::get("http://example.com/api/nowhere")
            .send(&make_service(Mocks::default()))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Route /api/nowhere not found");

        Ok(())
    }

    #[tokio::test]
    async fn catalog_reads_need_no_token() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|query| Ok(Page::new(Vec::new(), 0, query.pagination)));

        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com/api/products")
            .send(&make_service(Mocks {
                auth,
                products,
                ..Mocks::default()
            }))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn catalog_writes_need_a_token() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_create_product().never();

        let mut res = TestClient::post("http://example.com/api/products")
            .json(&json!({ "name": "Dune" }))
            .send(&make_service(Mocks {
                products,
                ..Mocks::default()
            }))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.message, REJECTED);

        Ok(())
    }

    #[tokio::test]
    async fn catalog_deletes_need_an_admin() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_delete_product().never();

        let mut res = TestClient::delete(format!(
            "http://example.com/api/products/{}",
            ProductUuid::new()
        ))
        .add_header(AUTHORIZATION, "Bearer user-token", true)
        .send(&make_service(Mocks {
            auth: make_auth(),
            products,
            ..Mocks::default()
        }))
        .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.message, NOT_AN_ADMIN);

        Ok(())
    }

    #[tokio::test]
    async fn my_orders_is_not_treated_as_an_order_id() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();
        orders
            .expect_list_user_orders()
            .once()
            .return_once(|_, pagination| Ok(Page::new(Vec::new(), 0, pagination)));

        let res = TestClient::get("http://example.com/api/orders/my")
            .add_header(AUTHORIZATION, "Bearer user-token", true)
            .send(&make_service(Mocks {
                auth: make_auth(),
                orders,
                ..Mocks::default()
            }))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn order_status_changes_need_an_admin() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_update_order_status().never();

        let res = TestClient::put(format!("http://example.com/api/orders/{}", OrderUuid::new()))
        .add_header(AUTHORIZATION, "Bearer user-token", true)
        .json(&json!({ "status": "shipped" }))
        .send(&make_service(Mocks {
            auth: make_auth(),
            orders,
            ..Mocks::default()
        }))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn admin_routes_reject_users() -> TestResult {
        let mut dashboard = MockDashboardService::new();

        dashboard.expect_dashboard().never();

        let mut res = TestClient::get("http://example.com/api/admin/stats")
            .add_header(AUTHORIZATION, "Bearer user-token", true)
            .send(&make_service(Mocks {
                auth: make_auth(),
                dashboard,
                ..Mocks::default()
            }))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.message, NOT_AN_ADMIN);

        Ok(())
    }

    #[tokio::test]
    async fn admin_routes_admit_admins() -> TestResult {
        let mut dashboard = MockDashboardService::new();

        dashboard.expect_dashboard().once().return_once(|| {
            Ok(Dashboard {
                stats: DashboardStats::default(),
                recent_products: Vec::new(),
                recent_users: Vec::new(),
            })
        });

        let res = TestClient::get("http://example.com/api/admin/stats")
            .add_header(AUTHORIZATION, "Bearer admin-token", true)
            .send(&make_service(Mocks {
                auth: make_auth(),
                dashboard,
                ..Mocks::default()
            }))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
