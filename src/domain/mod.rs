pub mod money;
pub mod customer;
pub mod product;
pub mod order;
pub mod cart;

pub use money::*;
pub use customer::*;
pub use product::*;
pub use order::*;
pub use cart::*;
