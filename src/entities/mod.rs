//! Persisted models and the filter sets over them

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerFilter, NewCustomer};
pub use order::{NewOrder, Order, OrderFilter};
pub use product::{LOW_STOCK_THRESHOLD, NewProduct, PRICE_SCALE, Product, ProductFilter, round_price};
