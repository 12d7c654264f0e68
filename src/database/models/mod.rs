pub mod catalog;
pub mod customer;
pub mod order;
pub mod seller;
pub mod store;

pub use catalog::{Category, Product, ProductQuery, ProductSort, ProductStatus};
pub use customer::{NewCustomer, StoreCustomer};
pub use order::{Order, OrderStatus};
pub use seller::{NewSeller, Role, SellerProfile, SellerUser};
pub use store::{NewStore, Store};
