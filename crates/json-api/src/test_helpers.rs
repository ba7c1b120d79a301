//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, catcher::Catcher, prelude::*};
use storefront_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        categories::{
            MockCategoriesService,
            records::{CategoryRecord, CategoryUuid},
        },
        dashboard::MockDashboardService,
        orders::{
            MockOrdersService,
            records::{
                OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid,
                ProductSummary, ResolvedOrder, ResolvedOrderItem, ShippingAddress,
            },
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductStatus, ProductUuid, ResolvedProduct},
        },
        users::{
            MockUsersService,
            records::{Role, UserRecord, UserUuid},
        },
    },
};
use uuid::Uuid;

use crate::{envelope::EnvelopeCatcher, extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Service mocks with no expectations, so any unexpected call fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) users: MockUsersService,
    pub(crate) auth: MockAuthService,
    pub(crate) categories: MockCategoriesService,
    pub(crate) products: MockProductsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) dashboard: MockDashboardService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            users: Arc::new(self.users),
            auth: Arc::new(self.auth),
            categories: Arc::new(self.categories),
            products: Arc::new(self.products),
            orders: Arc::new(self.orders),
            dashboard: Arc::new(self.dashboard),
        })
    }
}

pub(crate) fn make_user(uuid: UserUuid, role: Role) -> UserRecord {
    UserRecord {
        uuid,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        role,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(make_user(TEST_USER_UUID, Role::User));
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(make_user(TEST_USER_UUID, Role::Admin));
    ctrl.call_next(req, depot, res).await;
}

/// Wrap `route` the way the server does: injected state plus the envelope catcher.
pub(crate) fn service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
        .catcher(Catcher::default().hoop(EnvelopeCatcher::new(false)))
}

/// Like [`service`], with a signed-in `User` in the depot.
pub(crate) fn user_service(mocks: Mocks, route: Router) -> Service {
    service(mocks, Router::new().hoop(inject_user).push(route))
}

/// Like [`service`], with a signed-in `Admin` in the depot.
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    service(mocks, Router::new().hoop(inject_admin).push(route))
}

pub(crate) fn make_category(uuid: CategoryUuid) -> CategoryRecord {
    CategoryRecord {
        uuid,
        name: "Books".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ResolvedProduct {
    let category = make_category(CategoryUuid::from_uuid(Uuid::nil()));

    ResolvedProduct {
        product: ProductRecord {
            uuid,
            name: "Dune".to_string(),
            description: "Desert planet".to_string(),
            price: 1_299,
            category_uuid: category.uuid,
            images: vec!["dune.jpg".to_string()],
            stock: 5,
            status: ProductStatus::Active,
            created_by: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        category: Some(category),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, owner: UserUuid, product: ProductUuid) -> ResolvedOrder {
    ResolvedOrder {
        order: OrderRecord {
            uuid,
            user_uuid: owner,
            total: 2_598,
            status: OrderStatus::Pending,
            shipping: ShippingAddress::default(),
            payment_method: "card".to_string(),
            notes: String::new(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        items: vec![ResolvedOrderItem {
            item: OrderItemRecord {
                uuid: OrderItemUuid::from_uuid(Uuid::nil()),
                order_uuid: uuid,
                position: 0,
                product_uuid: product,
                quantity: 2,
                unit_price: 1_299,
            },
            product: Some(ProductSummary {
                uuid: product,
                name: "Dune".to_string(),
                price: 1_299,
                images: Vec::new(),
            }),
        }],
    }
}
