//! A small bundled set of listings, so the CLI can search without a data
//! file.

use crate::model::{CategoryPath, ListingRow};
use chrono::{Duration, Utc};
use serde_json::json;

struct Seed {
    title: &'static str,
    description: &'static str,
    price: f64,
    location: &'static str,
    path: &'static [&'static str],
    promoted: bool,
    age_hours: i64,
    views: u64,
    likes: u64,
    attributes: Option<serde_json::Value>,
}

fn seeds() -> Vec<Seed> {
    vec![
        Seed {
            title: "Skoda Octavia 2.0 TDI",
            description: "Bezwypadkowa, serwisowana w ASO, drugi właściciel.",
            price: 42000.0,
            location: "Warszawa, Mokotów",
            path: &["Motoryzacja", "Samochody osobowe", "Kombi"],
            promoted: true,
            age_hours: 5,
            views: 812,
            likes: 31,
            attributes: Some(json!({
                "brand": "Skoda", "model": "Octavia", "year": 2017,
                "mileage": 184000, "fuel_type": "Diesel", "gearbox": "Manualna",
                "damaged": false
            })),
        },
        Seed {
            title: "Toyota Yaris hybryda",
            description: "Idealna do miasta, niskie spalanie.",
            price: 56900.0,
            location: "Kraków",
            path: &["Motoryzacja", "Samochody osobowe", "Hatchback"],
            promoted: false,
            age_hours: 30,
            views: 455,
            likes: 12,
            attributes: Some(json!({
                "brand": "Toyota", "model": "Yaris", "year": 2020,
                "mileage": 61000, "fuel_type": "Hybryda", "gearbox": "Automatyczna",
                "damaged": false
            })),
        },
        Seed {
            title: "BMW X3 xDrive20d",
            description: "Pełna historia serwisowa, hak, panorama.",
            price: 89000.0,
            location: "Warszawa, Wola",
            path: &["Motoryzacja", "Samochody osobowe", "SUV"],
            promoted: false,
            age_hours: 52,
            views: 1290,
            likes: 64,
            attributes: Some(json!({
                "brand": "BMW", "model": "X3", "year": 2016,
                "mileage": 201000, "fuel_type": "Diesel", "gearbox": "Automatyczna",
                "damaged": false
            })),
        },
        Seed {
            title: "Opel Astra na części",
            description: "Uszkodzony przód, silnik sprawny.",
            price: 3500.0,
            location: "Radom",
            path: &["Motoryzacja", "Samochody osobowe"],
            promoted: false,
            age_hours: 200,
            views: 98,
            likes: 1,
            attributes: Some(json!({
                "brand": "Opel", "model": "Astra", "year": 2008,
                "fuel_type": "Benzyna", "damaged": true
            })),
        },
        Seed {
            title: "Opony zimowe 205/55 R16",
            description: "Komplet 4 sztuk, bieżnik 6 mm.",
            price: 800.0,
            location: "Poznań",
            path: &["Motoryzacja", "Części samochodowe", "Opony i felgi"],
            promoted: false,
            age_hours: 12,
            views: 140,
            likes: 4,
            attributes: Some(json!({"type": "Opony", "diameter": 16, "season": "Zimowe"})),
        },
        Seed {
            title: "iPhone 13 128 GB",
            description: "Bateria 89%, zawsze w etui.",
            price: 2100.0,
            location: "Warszawa, Praga",
            path: &["Elektronika", "Telefony i Akcesoria", "Smartfony"],
            promoted: true,
            age_hours: 2,
            views: 640,
            likes: 40,
            attributes: Some(json!({
                "brand": "Apple", "model": "iPhone 13", "storage": "128 GB",
                "condition": "Używany", "dual_sim": false
            })),
        },
        Seed {
            title: "Samsung Galaxy S23",
            description: "Nowy, nieotwierany, gwarancja producenta.",
            price: 3299.0,
            location: "Gdańsk",
            path: &["Elektronika", "Telefony i Akcesoria", "Smartfony"],
            promoted: false,
            age_hours: 8,
            views: 300,
            likes: 22,
            attributes: Some(json!({
                "brand": "Samsung", "model": "Galaxy S23", "storage": "256 GB",
                "condition": "Nowy", "dual_sim": true
            })),
        },
        Seed {
            title: "Etui skórzane do iPhone",
            description: "Brązowe, z klapką.",
            price: 49.0,
            location: "Łódź",
            path: &["Elektronika", "Telefony i Akcesoria", "Etui i pokrowce"],
            promoted: false,
            age_hours: 70,
            views: 25,
            likes: 0,
            attributes: Some(json!({"brand": "Apple", "condition": "Nowy"})),
        },
        Seed {
            title: "Laptop Lenovo ThinkPad T14",
            description: "i5, 16 GB RAM, ekran 14 cali, stan bardzo dobry.",
            price: 2400.0,
            location: "Wrocław",
            path: &["Elektronika", "Komputery", "Laptopy"],
            promoted: false,
            age_hours: 20,
            views: 210,
            likes: 9,
            attributes: Some(json!({
                "brand": "Lenovo", "processor": "Intel Core i5", "ram": 16,
                "screen_size": 14, "condition": "Używany"
            })),
        },
        Seed {
            title: "PlayStation 5 z dwoma padami",
            description: "Wersja z napędem.",
            price: 1900.0,
            location: "Warszawa, Ursynów",
            path: &["Elektronika", "Konsole/Gry", "Konsole"],
            promoted: false,
            age_hours: 4,
            views: 530,
            likes: 35,
            attributes: Some(json!({"platform": "PlayStation", "condition": "Używany"})),
        },
        Seed {
            title: "Telewizor 55 cali 4K",
            description: "Smart TV, pilot w zestawie.",
            price: 1200.0,
            location: "Katowice",
            path: &["Elektronika", "RTV", "Telewizory"],
            promoted: false,
            age_hours: 96,
            views: 180,
            likes: 3,
            attributes: Some(json!("nieprawidłowe dane")),
        },
        Seed {
            title: "Kawalerka przy metrze",
            description: "28 m², umeblowana, dostępna od zaraz.",
            price: 2600.0,
            location: "Warszawa, Centrum",
            path: &["Nieruchomości", "Mieszkania", "Wynajem"],
            promoted: true,
            age_hours: 10,
            views: 950,
            likes: 70,
            attributes: Some(json!({
                "area": 28, "rooms": 1, "furnished": true, "pets_allowed": false
            })),
        },
        Seed {
            title: "Działka budowlana 1000 m²",
            description: "Media w drodze, spokojna okolica.",
            price: 150000.0,
            location: "Piaseczno",
            path: &["Nieruchomości", "Działki"],
            promoted: false,
            age_hours: 400,
            views: 75,
            likes: 2,
            attributes: None,
        },
        Seed {
            title: "Sofa rozkładana",
            description: "Szara, z funkcją spania, stan dobry.",
            price: 700.0,
            location: "Kraków",
            path: &["Dom i Ogród", "Meble"],
            promoted: false,
            age_hours: 36,
            views: 120,
            likes: 8,
            attributes: None,
        },
        Seed {
            title: "Kurtka zimowa damska",
            description: "Rozmiar M, puchowa.",
            price: 250.0,
            location: "Lublin",
            path: &["Moda", "Ubrania damskie"],
            promoted: false,
            age_hours: 15,
            views: 60,
            likes: 5,
            attributes: None,
        },
        Seed {
            title: "Rower elektryczny trekkingowy",
            description: "Zasięg do 100 km, bateria 500 Wh.",
            price: 5200.0,
            location: "Warszawa, Bemowo",
            path: &["Sport i Hobby", "Rowery", "Elektryczne"],
            promoted: false,
            age_hours: 6,
            views: 330,
            likes: 27,
            attributes: Some(json!({
                "brand": "Kross", "battery_wh": 500, "range_km": 100, "condition": "Używany"
            })),
        },
    ]
}

/// The bundled listings. Timestamps are relative to now.
pub fn sample_listings() -> Vec<ListingRow> {
    let now = Utc::now();
    seeds()
        .into_iter()
        .map(|seed| {
            let path = CategoryPath::from_segments(seed.path.iter().copied());
            let mut row = ListingRow::new(seed.title, seed.price, &path);
            row.description = seed.description.to_string();
            row.location = seed.location.to_string();
            row.promoted = seed.promoted;
            row.created_at = now - Duration::hours(seed.age_hours);
            row.views = seed.views;
            row.likes = seed.likes;
            row.attributes = seed.attributes.map(|v| v.to_string());
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::marketplace;

    #[test]
    fn test_every_sample_sits_in_the_catalog() {
        for row in sample_listings() {
            assert!(marketplace().contains(&row.path()), "{}", row.title);
        }
    }
}
