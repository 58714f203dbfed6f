//! # Default Menu
//!
//! Catalog written on first start, before the owner has touched the admin
//! panel. Ids are small fixed integers so that the defaults never collide
//! with timestamp ids allocated later.

use chrono::{Datelike, NaiveDate};

use tcb_core::{Money, Product, ProductCategory, Promotion};

fn food(id: i64, name: &str, pesos: i64, subcategory: &str, image: &str, description: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: Money::from_pesos(pesos),
        category: ProductCategory::Food,
        subcategory: Some(subcategory.to_string()),
        image: image.to_string(),
        description: description.to_string(),
        specifications: String::new(),
    }
}

fn drink(id: i64, name: &str, pesos: i64, image: &str, description: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: Money::from_pesos(pesos),
        category: ProductCategory::Drinks,
        subcategory: None,
        image: image.to_string(),
        description: description.to_string(),
        specifications: String::new(),
    }
}

/// The starter menu: burgers, hot dogs and drinks.
pub fn default_menu() -> Vec<Product> {
    vec![
        food(
            1,
            "Hamburguesa Clásica",
            15_000,
            "hamburguesas",
            "/classic-beef-burger.png",
            "Carne de res, queso, lechuga, tomate y salsas de la casa",
        ),
        food(
            2,
            "Hamburguesa Doble Queso",
            21_000,
            "hamburguesas",
            "/classic-beef-burger.png",
            "Doble carne, doble queso cheddar y tocineta",
        ),
        food(
            3,
            "Hamburguesa de Pollo",
            17_000,
            "hamburguesas",
            "/chicken-burger.png",
            "Pechuga apanada, queso, lechuga y salsa de ajo",
        ),
        food(
            4,
            "Perro Sencillo",
            10_000,
            "perros",
            "/hot-dog.png",
            "Salchicha americana, papa ripio y salsas",
        ),
        food(
            5,
            "Perro Especial",
            14_000,
            "perros",
            "/hot-dog.png",
            "Salchicha americana, tocineta, queso gratinado y papa ripio",
        ),
        food(
            6,
            "Papas Francesas",
            6_000,
            "acompañamientos",
            "/french-fries.png",
            "Porción de papas francesas",
        ),
        drink(7, "Gaseosa 400 ml", 4_000, "/soda.png", "Coca-Cola, Sprite o Quatro"),
        drink(8, "Jugo Natural", 6_000, "/juice.png", "Mora, mango o maracuyá en agua o leche"),
        drink(9, "Agua", 3_000, "/water.png", "Agua sin gas 600 ml"),
    ]
}

/// The starter promotion banners, valid until the end of `today`'s year.
pub fn default_promotions(today: NaiveDate) -> Vec<Promotion> {
    let valid_until = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);

    vec![
        Promotion {
            id: 1,
            title: "Hamburguesa Maxi Queso".to_string(),
            description:
                "Hamburguesa doble carne con queso derretido, lechuga, tomate y papas francesas"
                    .to_string(),
            discount: "30% OFF".to_string(),
            valid_until,
            image: "/classic-beef-burger.png".to_string(),
            is_active: true,
        },
        Promotion {
            id: 2,
            title: "Pizza Maxi Queso".to_string(),
            description:
                "Pizza familiar con extra queso mozzarella, pepperoni y bordes rellenos de queso"
                    .to_string(),
            discount: "25% OFF".to_string(),
            valid_until,
            image: "/delicious-pizza.png".to_string(),
            is_active: true,
        },
    ]
}
