//! Unit of Work over mockall repositories for service unit tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    CartRepository, MockCartRepository, MockOrderRepository, MockProductRepository,
    MockUserRepository, OrderRepository, ProductRepository, TransactionContext, UnitOfWork,
    UserRepository,
};

/// Repositories without expectations panic when called.
#[derive(Default)]
pub(crate) struct MockedUnitOfWork {
    pub users: MockUserRepository,
    pub products: MockProductRepository,
    pub carts: MockCartRepository,
    pub orders: MockOrderRepository,
}

impl MockedUnitOfWork {
    pub fn build(self) -> Arc<TestUnitOfWork> {
        Arc::new(TestUnitOfWork {
            users: Arc::new(self.users),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
        })
    }
}

pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    products: Arc<MockProductRepository>,
    carts: Arc<MockCartRepository>,
    orders: Arc<MockOrderRepository>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transactional paths are covered by the SQLite integration tests
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
