pub mod categories;
pub mod products;

pub use categories::CategoriesPage;
pub use products::ProductsPage;
