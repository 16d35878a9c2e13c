//! SeaORM entities for the marketplace schema created by `crate::migrator`.

pub mod category;
pub mod coating;
pub mod factory;
pub mod factory_article_sequence;
pub mod favorite;
pub mod favorite_list;
pub mod insert_type;
pub mod material;
pub mod metal_color;
pub mod product;
pub mod product_coating;
pub mod product_image;
pub mod product_insert_type;
pub mod purity;
pub mod style;
pub mod theme;
pub mod user;

pub use category::{Entity as Category, Model as CategoryModel};
pub use factory::{Entity as Factory, Model as FactoryModel};
pub use favorite::{Entity as Favorite, Model as FavoriteModel};
pub use favorite_list::{Entity as FavoriteList, Model as FavoriteListModel};
pub use material::MaterialType;
pub use product::{Entity as Product, Model as ProductModel};
pub use theme::{Entity as Theme, Model as ThemeModel};
pub use user::{Entity as User, Model as UserModel};
