//! Hardcoded product data shown by the advisor.

use serde::Serialize;

/// Scores out of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ratings {
    pub performance: u8,
    pub battery: u8,
    pub build: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub verdict: &'static str,
    pub specs: &'static str,
    pub description: &'static str,
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
    pub ratings: Ratings,
}

const MACBOOK_AIR_M1: Product = Product {
    id: "macbook-air-m1",
    name: "MacBook Air M1",
    price: "₹72,990",
    verdict: "Perfect Match",
    specs: "M1 Chip, 8GB RAM, 256GB SSD, 13.3\" Retina Display",
    description: "The MacBook Air M1 is perfect for your coding and video editing needs. \
                  The M1 chip provides exceptional performance while maintaining excellent battery life.",
    pros: &[
        "Outstanding battery life (15-18 hours)",
        "Silent fanless design",
        "Excellent performance for video editing",
        "Premium build quality",
        "Great display",
    ],
    cons: &[
        "Limited to 8GB RAM",
        "Only 256GB storage",
        "macOS only",
        "Limited ports (2x USB-C)",
    ],
    ratings: Ratings {
        performance: 92,
        battery: 95,
        build: 90,
        value: 88,
    },
};

const DELL_XPS_13: Product = Product {
    id: "dell-xps-13",
    name: "Dell XPS 13",
    price: "₹79,990",
    verdict: "Good Value",
    specs: "Intel i7-1165G7, 16GB RAM, 512GB SSD, 13.4\" FHD+",
    description: "The Dell XPS 13 offers excellent Windows compatibility with more RAM and storage, \
                  perfect for development work.",
    pros: &[
        "More RAM (16GB)",
        "Larger storage (512GB)",
        "Windows ecosystem",
        "Good performance",
        "Premium build",
    ],
    cons: &[
        "Lower battery life (10-12 hours)",
        "Gets warm under load",
        "More expensive",
        "Webcam placement",
    ],
    ratings: Ratings {
        performance: 88,
        battery: 82,
        build: 90,
        value: 85,
    },
};

const LENOVO_IDEAPAD_SLIM_5: Product = Product {
    id: "lenovo-ideapad-slim-5",
    name: "Lenovo IdeaPad Slim 5",
    price: "₹65,990",
    verdict: "Budget Pick",
    specs: "AMD Ryzen 7 5700U, 16GB RAM, 512GB SSD, 14\" FHD",
    description: "Great budget option with solid specs. Best value for money if you want to save some cash.",
    pros: &[
        "Most affordable",
        "Good specs for price",
        "16GB RAM",
        "512GB storage",
        "Decent performance",
    ],
    cons: &[
        "Build quality not premium",
        "Average display",
        "Battery life not as good",
        "Heavier",
    ],
    ratings: Ratings {
        performance: 82,
        battery: 78,
        build: 75,
        value: 92,
    },
};

/// Laptops recommended in the sample conversation, best match first.
pub fn featured_products() -> Vec<Product> {
    vec![MACBOOK_AIR_M1, DELL_XPS_13, LENOVO_IDEAPAD_SLIM_5]
}

pub fn find(id: &str) -> Option<Product> {
    featured_products().into_iter().find(|p| p.id == id)
}

/// Product recommended for long battery life.
pub(crate) fn battery_pick() -> Product {
    MACBOOK_AIR_M1
}
