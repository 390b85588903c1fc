//! The built-in marketplace taxonomy.
//!
//! Constructed lazily on first use and shared for the rest of the process.

use super::{TaxonomyNode, TaxonomyTree};
use crate::attributes::AttributeField;
use once_cell::sync::Lazy;
use std::sync::Arc;

static MARKETPLACE: Lazy<Arc<TaxonomyTree>> =
    Lazy::new(|| Arc::new(TaxonomyTree::new_unchecked(nodes())));

/// The built-in marketplace tree.
pub fn marketplace() -> &'static TaxonomyTree {
    &MARKETPLACE
}

/// A shared handle to the built-in tree, for owners that may also hold a
/// tree loaded from disk.
pub fn shared_marketplace() -> Arc<TaxonomyTree> {
    Arc::clone(&MARKETPLACE)
}

const CONDITIONS: &[&str] = &["Nowy", "Używany", "Uszkodzony"];

const CAR_BRANDS: &[&str] = &[
    "Audi",
    "BMW",
    "Ford",
    "Honda",
    "Hyundai",
    "Kia",
    "Mercedes-Benz",
    "Opel",
    "Peugeot",
    "Renault",
    "Skoda",
    "Toyota",
    "Volkswagen",
    "Volvo",
    "Inna",
];

const PHONE_BRANDS: &[&str] = &[
    "Apple", "Samsung", "Xiaomi", "Motorola", "OnePlus", "Google", "Nokia", "Inna",
];

fn nodes() -> Vec<TaxonomyNode> {
    vec![
        motoryzacja(),
        elektronika(),
        nieruchomosci(),
        dom_i_ogrod(),
        moda(),
        sport_i_hobby(),
    ]
}

fn motoryzacja() -> TaxonomyNode {
    TaxonomyNode::category(
        "Motoryzacja",
        vec![
            TaxonomyNode::subcategory(
                "Samochody osobowe",
                vec![
                    TaxonomyNode::subsubcategory("Sedan"),
                    TaxonomyNode::subsubcategory("Kombi"),
                    TaxonomyNode::subsubcategory("SUV"),
                    TaxonomyNode::subsubcategory("Hatchback"),
                ],
            )
            .with_schema(vec![
                AttributeField::select("brand", "Marka", CAR_BRANDS).required(),
                AttributeField::text("model", "Model"),
                AttributeField::number("year", "Rok produkcji").required(),
                AttributeField::number("mileage", "Przebieg (km)").required(),
                AttributeField::select(
                    "fuel_type",
                    "Rodzaj paliwa",
                    &["Benzyna", "Diesel", "LPG", "Hybryda", "Elektryczny"],
                )
                .required(),
                AttributeField::select("gearbox", "Skrzynia biegów", &["Manualna", "Automatyczna"]),
                AttributeField::checkbox("damaged", "Uszkodzony"),
            ]),
            TaxonomyNode::subcategory(
                "Motocykle i skutery",
                vec![
                    TaxonomyNode::subsubcategory("Motocykle"),
                    TaxonomyNode::subsubcategory("Skutery"),
                    TaxonomyNode::subsubcategory("Quady"),
                ],
            )
            .with_schema(vec![
                AttributeField::text("brand", "Marka").required(),
                AttributeField::number("engine_capacity", "Pojemność (cm³)"),
                AttributeField::number("year", "Rok produkcji").required(),
                AttributeField::number("mileage", "Przebieg (km)"),
            ]),
            TaxonomyNode::subcategory(
                "Części samochodowe",
                vec![
                    TaxonomyNode::subsubcategory("Opony i felgi").with_schema(vec![
                        AttributeField::select("type", "Rodzaj", &["Opony", "Felgi", "Koła"])
                            .required(),
                        AttributeField::number("diameter", "Średnica (cale)").required(),
                        AttributeField::select(
                            "season",
                            "Sezon",
                            &["Letnie", "Zimowe", "Całoroczne"],
                        ),
                    ]),
                    TaxonomyNode::subsubcategory("Silnik i osprzęt"),
                    TaxonomyNode::subsubcategory("Oświetlenie"),
                ],
            )
            .with_schema(vec![
                AttributeField::select("condition", "Stan", CONDITIONS).required(),
                AttributeField::text("part_number", "Numer katalogowy"),
            ]),
        ],
    )
}

fn elektronika() -> TaxonomyNode {
    TaxonomyNode::category(
        "Elektronika",
        vec![
            TaxonomyNode::subcategory(
                "Telefony i Akcesoria",
                vec![
                    TaxonomyNode::subsubcategory("Smartfony").with_schema(vec![
                        AttributeField::select("brand", "Marka", PHONE_BRANDS).required(),
                        AttributeField::text("model", "Model").required(),
                        AttributeField::select(
                            "storage",
                            "Pamięć wbudowana",
                            &["64 GB", "128 GB", "256 GB", "512 GB", "1 TB"],
                        ),
                        AttributeField::select("condition", "Stan", CONDITIONS).required(),
                        AttributeField::checkbox("dual_sim", "Dual SIM"),
                    ]),
                    TaxonomyNode::subsubcategory("Etui i pokrowce"),
                    TaxonomyNode::subsubcategory("Ładowarki i kable"),
                ],
            )
            .with_schema(vec![
                AttributeField::select("brand", "Marka", PHONE_BRANDS),
                AttributeField::select("condition", "Stan", CONDITIONS).required(),
            ]),
            TaxonomyNode::subcategory(
                "Komputery",
                vec![
                    TaxonomyNode::subsubcategory("Laptopy").with_schema(vec![
                        AttributeField::text("brand", "Marka").required(),
                        AttributeField::text("processor", "Procesor"),
                        AttributeField::number("ram", "Pamięć RAM (GB)"),
                        AttributeField::number("screen_size", "Przekątna ekranu (cale)"),
                        AttributeField::select("condition", "Stan", CONDITIONS).required(),
                    ]),
                    TaxonomyNode::subsubcategory("Komputery stacjonarne"),
                    TaxonomyNode::subsubcategory("Podzespoły"),
                ],
            )
            .with_schema(vec![
                AttributeField::select("condition", "Stan", CONDITIONS).required(),
            ]),
            TaxonomyNode::subcategory(
                "Konsole/Gry",
                vec![
                    TaxonomyNode::subsubcategory("Konsole"),
                    TaxonomyNode::subsubcategory("Gry"),
                ],
            )
            .with_schema(vec![
                AttributeField::select(
                    "platform",
                    "Platforma",
                    &["PlayStation", "Xbox", "Nintendo", "PC"],
                )
                .required(),
                AttributeField::select("condition", "Stan", CONDITIONS),
            ]),
            TaxonomyNode::subcategory(
                "RTV",
                vec![
                    TaxonomyNode::subsubcategory("Telewizory"),
                    TaxonomyNode::subsubcategory("Audio"),
                ],
            ),
        ],
    )
}

fn nieruchomosci() -> TaxonomyNode {
    TaxonomyNode::category(
        "Nieruchomości",
        vec![
            TaxonomyNode::subcategory(
                "Mieszkania",
                vec![
                    TaxonomyNode::subsubcategory("Sprzedaż"),
                    TaxonomyNode::subsubcategory("Wynajem").with_schema(vec![
                        AttributeField::number("area", "Powierzchnia (m²)").required(),
                        AttributeField::number("rooms", "Liczba pokoi").required(),
                        AttributeField::number("rent_extra", "Czynsz dodatkowy (zł)"),
                        AttributeField::checkbox("furnished", "Umeblowane"),
                        AttributeField::checkbox("pets_allowed", "Zwierzęta dozwolone"),
                    ]),
                ],
            )
            .with_schema(vec![
                AttributeField::number("area", "Powierzchnia (m²)").required(),
                AttributeField::number("rooms", "Liczba pokoi").required(),
                AttributeField::number("floor", "Piętro"),
                AttributeField::select("market", "Rynek", &["Pierwotny", "Wtórny"]),
                AttributeField::checkbox("furnished", "Umeblowane"),
            ]),
            TaxonomyNode::subcategory(
                "Domy",
                vec![
                    TaxonomyNode::subsubcategory("Sprzedaż"),
                    TaxonomyNode::subsubcategory("Wynajem"),
                ],
            )
            .with_schema(vec![
                AttributeField::number("area", "Powierzchnia (m²)").required(),
                AttributeField::number("plot_area", "Powierzchnia działki (m²)"),
                AttributeField::number("rooms", "Liczba pokoi"),
            ]),
            TaxonomyNode::subcategory("Działki", vec![]).with_schema(vec![
                AttributeField::number("plot_area", "Powierzchnia działki (m²)").required(),
                AttributeField::select(
                    "plot_type",
                    "Rodzaj działki",
                    &["Budowlana", "Rolna", "Rekreacyjna", "Inwestycyjna"],
                ),
            ]),
        ],
    )
}

fn dom_i_ogrod() -> TaxonomyNode {
    TaxonomyNode::category(
        "Dom i Ogród",
        vec![
            TaxonomyNode::subcategory(
                "Meble",
                vec![
                    TaxonomyNode::subsubcategory("Sofy i fotele"),
                    TaxonomyNode::subsubcategory("Stoły i krzesła"),
                    TaxonomyNode::subsubcategory("Szafy i komody"),
                ],
            )
            .with_schema(vec![AttributeField::select("condition", "Stan", CONDITIONS)]),
            TaxonomyNode::subcategory(
                "Ogród",
                vec![
                    TaxonomyNode::subsubcategory("Narzędzia ogrodowe"),
                    TaxonomyNode::subsubcategory("Rośliny"),
                ],
            ),
            TaxonomyNode::subcategory("AGD", vec![]).with_schema(vec![
                AttributeField::text("brand", "Marka"),
                AttributeField::select("energy_class", "Klasa energetyczna", &["A", "B", "C", "D", "E", "F", "G"]),
                AttributeField::select("condition", "Stan", CONDITIONS).required(),
            ]),
        ],
    )
}

fn moda() -> TaxonomyNode {
    let clothing = || {
        vec![
            AttributeField::select("size", "Rozmiar", &["XS", "S", "M", "L", "XL", "XXL"])
                .required(),
            AttributeField::text("brand", "Marka"),
            AttributeField::select("condition", "Stan", CONDITIONS).required(),
        ]
    };

    TaxonomyNode::category(
        "Moda",
        vec![
            TaxonomyNode::subcategory(
                "Ubrania damskie",
                vec![
                    TaxonomyNode::subsubcategory("Sukienki"),
                    TaxonomyNode::subsubcategory("Kurtki i płaszcze"),
                ],
            )
            .with_schema(clothing()),
            TaxonomyNode::subcategory(
                "Ubrania męskie",
                vec![
                    TaxonomyNode::subsubcategory("Koszule"),
                    TaxonomyNode::subsubcategory("Kurtki i płaszcze"),
                ],
            )
            .with_schema(clothing()),
            TaxonomyNode::subcategory("Obuwie", vec![]).with_schema(vec![
                AttributeField::number("shoe_size", "Rozmiar buta").required(),
                AttributeField::select("condition", "Stan", CONDITIONS).required(),
            ]),
        ],
    )
}

fn sport_i_hobby() -> TaxonomyNode {
    TaxonomyNode::category(
        "Sport i Hobby",
        vec![
            TaxonomyNode::subcategory(
                "Rowery",
                vec![
                    TaxonomyNode::subsubcategory("Górskie"),
                    TaxonomyNode::subsubcategory("Szosowe"),
                    TaxonomyNode::subsubcategory("Elektryczne").with_schema(vec![
                        AttributeField::text("brand", "Marka"),
                        AttributeField::number("battery_wh", "Pojemność baterii (Wh)").required(),
                        AttributeField::number("range_km", "Zasięg (km)"),
                        AttributeField::select("condition", "Stan", CONDITIONS).required(),
                    ]),
                ],
            )
            .with_schema(vec![
                AttributeField::text("brand", "Marka"),
                AttributeField::text("frame_size", "Rozmiar ramy"),
                AttributeField::number("wheel_size", "Rozmiar koła (cale)"),
                AttributeField::select("condition", "Stan", CONDITIONS).required(),
            ]),
            TaxonomyNode::subcategory(
                "Instrumenty",
                vec![
                    TaxonomyNode::subsubcategory("Gitary"),
                    TaxonomyNode::subsubcategory("Klawisze"),
                ],
            ),
            TaxonomyNode::subcategory("Kolekcje", vec![]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryPath;

    #[test]
    fn test_built_in_tree_passes_validation() {
        let validated = TaxonomyTree::new(nodes()).unwrap();
        assert_eq!(&validated, marketplace());
    }

    #[test]
    fn test_marketplace_is_shared() {
        assert!(std::ptr::eq(marketplace(), marketplace()));
        assert!(std::ptr::eq(&*shared_marketplace(), marketplace()));
    }

    #[test]
    fn test_contains_a_name_with_a_slash() {
        let path = CategoryPath::from_segments(["Elektronika", "Konsole/Gry", "Konsole"]);
        assert!(marketplace().contains(&path));
    }

    #[test]
    fn test_duplicate_names_are_fine_across_parents() {
        let tree = marketplace();
        assert!(tree
            .find_subsubcategory("Nieruchomości", "Domy", "Wynajem")
            .is_some());
        assert!(tree
            .find_subsubcategory("Nieruchomości", "Mieszkania", "Wynajem")
            .is_some());
    }
}
